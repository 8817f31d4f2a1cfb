//! volscope CLI: volatility analysis over daily closes.
//!
//! Commands:
//! - `analyze`: fetch tickers, compute volatility/return/risk statistics, print a ranked table
//! - `prices`: fetch one ticker and print its closes as CSV
//! - `config`: print the effective configuration as TOML

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use volscope_core::data::{CsvProvider, DataProvider, SyntheticProvider, YahooProvider};
use volscope_runner::{
    render_table, run_analysis, write_csv, write_json, AnalysisConfig, AnalysisProgress,
    RankingMetric, SilentProgress, SortOrder, StdoutProgress,
};

#[derive(Parser)]
#[command(
    name = "volscope",
    version,
    about = "volscope: rank tickers by volatility, return and drawdown"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Source {
    /// Yahoo Finance chart API.
    Yahoo,
    /// `<TICKER>.csv` files from --csv-dir.
    Csv,
    /// Deterministic random walk, no network.
    Synthetic,
}

/// Flags shared by every command that fetches prices.
#[derive(clap::Args)]
struct SourceArgs {
    /// Where prices come from.
    #[arg(long, value_enum, default_value_t = Source::Yahoo)]
    source: Source,

    /// Directory of `<TICKER>.csv` files for --source csv.
    #[arg(long, default_value = "data")]
    csv_dir: PathBuf,

    /// Use raw closes instead of split/dividend-adjusted closes.
    #[arg(long, default_value_t = false)]
    raw_close: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse tickers and print a ranked volatility table.
    Analyze {
        /// Tickers (e.g., AAPL MSFT TSLA). Defaults to the config file or AAPL MSFT JPM WMT TSLA GOOG.
        tickers: Vec<String>,

        /// TOML config file. Flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start date (YYYY-MM-DD), inclusive. Defaults to two years before --end.
        #[arg(long)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD), exclusive. Defaults to today.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Ranking metric: annualized-volatility, daily-volatility, total-return, sharpe, max-drawdown, ticker.
        #[arg(long)]
        sort: Option<RankingMetric>,

        /// Smallest first instead of largest first.
        #[arg(long, default_value_t = false)]
        ascending: bool,

        /// Rolling volatility window, in trading days.
        #[arg(long)]
        window: Option<usize>,

        /// Annual risk-free rate for the Sharpe ratio (e.g., 0.04).
        #[arg(long)]
        risk_free: Option<f64>,

        #[command(flatten)]
        fetch: SourceArgs,

        /// Write the ranked summary to a CSV file.
        #[arg(long)]
        export_csv: Option<PathBuf>,

        /// Write the ranked summary and skipped tickers to a JSON file.
        #[arg(long)]
        export_json: Option<PathBuf>,

        /// Open the terminal charts after printing the table.
        #[arg(long, default_value_t = false)]
        plot: bool,

        /// No per-ticker progress lines.
        #[arg(long, short, default_value_t = false)]
        quiet: bool,
    },
    /// Fetch one ticker and print `date,close` rows.
    Prices {
        ticker: String,

        /// Start date (YYYY-MM-DD), inclusive. Defaults to two years before --end.
        #[arg(long)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD), exclusive. Defaults to today.
        #[arg(long)]
        end: Option<NaiveDate>,

        #[command(flatten)]
        fetch: SourceArgs,
    },
    /// Print the effective configuration as TOML.
    Config {
        /// TOML config file to load and normalise.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            tickers,
            config,
            start,
            end,
            sort,
            ascending,
            window,
            risk_free,
            fetch,
            export_csv,
            export_json,
            plot,
            quiet,
        } => {
            let mut cfg = load_config(config.as_ref())?;
            apply_overrides(
                &mut cfg,
                Overrides {
                    tickers,
                    start,
                    end,
                    sort,
                    ascending,
                    window,
                    risk_free,
                    raw_close: fetch.raw_close,
                },
            );
            run_analyze(cfg, &fetch, export_csv, export_json, plot, quiet)
        }
        Commands::Prices {
            ticker,
            start,
            end,
            fetch,
        } => {
            let mut cfg = AnalysisConfig {
                tickers: vec![ticker],
                start,
                end,
                adjusted_close: !fetch.raw_close,
                ..Default::default()
            };
            cfg.validate(today())?;
            run_prices(&cfg, &fetch)
        }
        Commands::Config { config } => {
            let mut cfg = load_config(config.as_ref())?;
            cfg.validate(today())?;
            print!("{}", cfg.to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "volscope=warn",
        1 => "volscope=info",
        _ => "volscope=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn load_config(path: Option<&PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::from_file(p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Values given on the `analyze` command line. Unset flags leave the config untouched.
#[derive(Debug)]
struct Overrides {
    tickers: Vec<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    sort: Option<RankingMetric>,
    ascending: bool,
    window: Option<usize>,
    risk_free: Option<f64>,
    raw_close: bool,
}

/// Layer flags over file values, which are already layered over defaults.
fn apply_overrides(cfg: &mut AnalysisConfig, flags: Overrides) {
    if !flags.tickers.is_empty() {
        cfg.tickers = flags.tickers;
    }
    cfg.start = flags.start.or(cfg.start);
    cfg.end = flags.end.or(cfg.end);
    if let Some(metric) = flags.sort {
        cfg.sort_by = metric;
    }
    if flags.ascending {
        cfg.order = SortOrder::Ascending;
    }
    if let Some(w) = flags.window {
        cfg.rolling_window = w;
    }
    if let Some(rf) = flags.risk_free {
        cfg.risk_free_rate = rf;
    }
    if flags.raw_close {
        cfg.adjusted_close = false;
    }
}

fn make_provider(args: &SourceArgs, adjusted: bool) -> Result<Box<dyn DataProvider>> {
    Ok(match args.source {
        Source::Yahoo => Box::new(YahooProvider::new()?.adjusted(adjusted)),
        Source::Csv => Box::new(CsvProvider::new(args.csv_dir.clone()).adjusted(adjusted)),
        Source::Synthetic => Box::new(SyntheticProvider::default()),
    })
}

fn run_analyze(
    mut cfg: AnalysisConfig,
    source: &SourceArgs,
    export_csv: Option<PathBuf>,
    export_json: Option<PathBuf>,
    plot: bool,
    quiet: bool,
) -> Result<()> {
    cfg.validate(today())?;
    let (start, end) = cfg.date_range(today())?;
    let provider = make_provider(source, cfg.adjusted_close)?;

    let progress: &dyn AnalysisProgress = if quiet {
        &SilentProgress
    } else {
        &StdoutProgress
    };
    let report = run_analysis(provider.as_ref(), &cfg, start, end, progress);

    println!();
    print!("{}", render_table(&report));

    if let Some(path) = export_csv {
        write_csv(&path, &report)?;
        println!("\nSummary CSV written to {}", path.display());
    }
    if let Some(path) = export_json {
        write_json(&path, &report)?;
        println!("Summary JSON written to {}", path.display());
    }

    if report.is_empty() {
        eprintln!("No ticker could be analysed.");
        std::process::exit(1);
    }

    if plot {
        volscope_tui::show_charts(&report)?;
    }

    Ok(())
}

fn run_prices(cfg: &AnalysisConfig, source: &SourceArgs) -> Result<()> {
    let (start, end) = cfg.date_range(today())?;
    let provider = make_provider(source, cfg.adjusted_close)?;
    let Some(ticker) = cfg.tickers.first() else {
        anyhow::bail!("no ticker given");
    };

    let series = provider
        .fetch(ticker, start, end)
        .with_context(|| format!("fetching {ticker} from {}", provider.name()))?;

    println!("date,close");
    for p in series.points() {
        println!("{},{}", p.date, p.close);
    }
    eprintln!(
        "{} rows for {} from {} ({} to {})",
        series.len(),
        series.ticker,
        provider.source().label(),
        start,
        end
    );
    Ok(())
}
