//! volscope TUI: full-screen chart view for a finished analysis.
//!
//! Two charts, switchable with Tab:
//! 1. Rolling annualized volatility, one line per ticker
//! 2. Annualized volatility bars in ranking order

pub mod app;
pub mod charts;
pub mod theme;

pub use app::{ChartApp, ChartLayout};
pub use charts::{ChartData, RollingVolChart, VolBarChart};
pub use theme::Theme;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor::Show;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use volscope_runner::AnalysisReport;

/// Show the charts for `report` until the user quits. Blocks.
pub fn show_charts(report: &AnalysisReport) -> Result<()> {
    // Restore the terminal before printing a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut app = ChartApp::new(ChartData::from_report(report));

    // Dropped last: covers setup errors as well as the normal exit.
    let _guard = TerminalGuard::new(restore_terminal);
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    run_app(&mut terminal, &mut app)
}

/// Runs `restore` when dropped, whichever way the caller leaves.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn new(restore: fn()) -> Self {
        Self { restore }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    // Later panics print normally again. take_hook panics mid-unwind.
    if !std::thread::panicking() {
        let _ = std::panic::take_hook();
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChartApp,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| app.draw(f))?;

        // 50ms poll keeps resizes responsive
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
