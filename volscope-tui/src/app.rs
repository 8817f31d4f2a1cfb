//! Chart view state and key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::charts::{ChartData, RollingVolChart, VolBarChart};
use crate::theme::Theme;

/// Which charts are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartLayout {
    /// Rolling lines on top, bars below.
    #[default]
    Split,
    RollingOnly,
    BarsOnly,
}

impl ChartLayout {
    pub fn next(self) -> Self {
        match self {
            ChartLayout::Split => ChartLayout::RollingOnly,
            ChartLayout::RollingOnly => ChartLayout::BarsOnly,
            ChartLayout::BarsOnly => ChartLayout::Split,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartLayout::Split => "Both",
            ChartLayout::RollingOnly => "Rolling",
            ChartLayout::BarsOnly => "Bars",
        }
    }
}

pub struct ChartApp {
    pub data: ChartData,
    pub theme: Theme,
    pub layout: ChartLayout,
    pub running: bool,
}

impl ChartApp {
    pub fn new(data: ChartData) -> Self {
        Self {
            data,
            theme: Theme::default(),
            layout: ChartLayout::default(),
            running: true,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle key press events (Windows sends both Press and Release).
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false
            }
            KeyCode::Tab => self.layout = self.layout.next(),
            KeyCode::Char('1') => self.layout = ChartLayout::RollingOnly,
            KeyCode::Char('2') => self.layout = ChartLayout::BarsOnly,
            KeyCode::Char('3') => self.layout = ChartLayout::Split,
            _ => {}
        }
    }

    /// Draw the whole screen: charts plus a one-line hint bar.
    pub fn draw(&self, f: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(f.area());

        match self.layout {
            ChartLayout::Split => {
                let [top, bottom] =
                    Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                        .areas(main);
                f.render_widget(RollingVolChart::new(&self.data, &self.theme), top);
                f.render_widget(VolBarChart::new(&self.data, &self.theme), bottom);
            }
            ChartLayout::RollingOnly => {
                f.render_widget(RollingVolChart::new(&self.data, &self.theme), main)
            }
            ChartLayout::BarsOnly => {
                f.render_widget(VolBarChart::new(&self.data, &self.theme), main)
            }
        }

        self.draw_status(f, status);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let muted = self.theme.axis();
        let line = Line::from(vec![
            Span::styled(" Tab:layout 1:rolling 2:bars 3:both q:quit", muted),
            Span::raw(" | "),
            Span::styled(self.layout.label(), Style::default().fg(self.theme.accent)),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }
}
