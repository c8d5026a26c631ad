//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvPriceSource;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::chart::ChartOptions;
use crate::domain::config::{IndicatorConfig, IndicesConfig, SourceConfig, parse_periods};
use crate::domain::engine::IndicatorEngine;
use crate::domain::error::IndicesError;
use crate::domain::indicator::bollinger::{self, LowerBand};
use crate::domain::indicator::{ema, macd, rsi, sma, volatility};
use crate::domain::price::PricePoint;
use crate::domain::table::IndicatorTable;
use crate::ports::price_port::PriceSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "price-indices",
    about = "Technical indicators for daily cryptocurrency prices"
)]
pub struct Cli {
    /// INI file with [source], [indices] and [plot] sections
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

/// Where prices come from and where results go. Shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Price CSV file; its stem is used as the coin id
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Coin id, read from <data_dir>/<coin>.csv
    #[arg(long)]
    pub coin: Option<String>,
    #[arg(long)]
    pub start: Option<NaiveDate>,
    #[arg(long)]
    pub end: Option<NaiveDate>,
    /// Write the indicator table here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub plot: bool,
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,
    #[arg(long)]
    pub show: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Annualised volatility index
    Vola {
        #[command(flatten)]
        args: RunArgs,
        #[arg(long)]
        window: Option<usize>,
    },
    /// 14-day relative strength index
    Rsi {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Bollinger bands around a simple moving average
    Bollinger {
        #[command(flatten)]
        args: RunArgs,
        #[arg(long)]
        days: Option<usize>,
        /// Lower band as SMA - 2*SMA
        #[arg(long)]
        legacy_lower_band: bool,
    },
    /// Moving average convergence divergence (EMA fast - EMA slow)
    Macd {
        #[command(flatten)]
        args: RunArgs,
        #[arg(long)]
        fast: Option<usize>,
        #[arg(long)]
        slow: Option<usize>,
    },
    /// Simple moving average
    Sma {
        #[command(flatten)]
        args: RunArgs,
        #[arg(long)]
        days: Option<usize>,
    },
    /// Exponential moving averages, one column per period
    Ema {
        #[command(flatten)]
        args: RunArgs,
        /// Comma separated, e.g. 20,70
        #[arg(long)]
        periods: Option<String>,
    },
}

impl Command {
    pub fn args(&self) -> &RunArgs {
        match self {
            Command::Vola { args, .. }
            | Command::Rsi { args }
            | Command::Bollinger { args, .. }
            | Command::Macd { args, .. }
            | Command::Sma { args, .. }
            | Command::Ema { args, .. } => args,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn execute(cli: &Cli) -> Result<(), IndicesError> {
    let config = build_config(cli.config.as_deref())?;
    let args = cli.command.args();

    let points = load_prices(&config.source, args)?;
    let plot_dir = args.plot_dir.clone().unwrap_or_else(|| config.plot.dir.clone());
    let engine = IndicatorEngine::new(&points)?
        .with_plot_dir(plot_dir)
        .with_chart_port(Box::new(SvgChartAdapter::new()));

    let plot = args.plot || config.plot.enabled;
    let show = args.show || config.plot.show;
    let table = compute_table(&engine, &cli.command, &config.indicators, plot, show)?;

    CsvReportAdapter::new().write(&table, args.output.as_deref())
}

/// Typed config from `path`, or all defaults when no file is given.
pub fn build_config(path: Option<&Path>) -> Result<IndicesConfig, IndicesError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            IndicesConfig::from_config(&FileConfigAdapter::from_file(path)?)
        }
        None => IndicesConfig::from_config(&FileConfigAdapter::empty()),
    }
}

/// Picks the CSV source and coin id. `--input` wins over `--coin`, which
/// wins over `[source] coin`.
pub fn resolve_source(
    source: &SourceConfig,
    args: &RunArgs,
) -> Result<(CsvPriceSource, String), IndicesError> {
    let (dir, coin) = match &args.input {
        Some(input) => {
            if input.extension().and_then(|e| e.to_str()) != Some("csv") {
                return Err(IndicesError::invalid_param(
                    "input",
                    format!("{} is not a .csv file", input.display()),
                ));
            }
            let coin = input
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| {
                    IndicesError::invalid_param("input", "file name is not valid UTF-8")
                })?
                .to_string();
            let dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
            (dir, coin)
        }
        None => {
            let coin = args
                .coin
                .as_deref()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .or_else(|| source.coin.clone())
                .ok_or_else(|| IndicesError::ConfigInvalid {
                    section: "source".into(),
                    key: "coin".into(),
                    reason: "no coin given (use --input, --coin or [source] coin)".into(),
                })?;
            (source.data_dir.clone(), coin)
        }
    };

    let csv = CsvPriceSource::new(dir).with_columns(&source.date_column, &source.price_column);
    Ok((csv, coin))
}

pub fn resolve_date_range(
    source: &SourceConfig,
    args: &RunArgs,
) -> Result<(NaiveDate, NaiveDate), IndicesError> {
    let start = args.start.or(source.start_date).unwrap_or(NaiveDate::MIN);
    let end = args.end.or(source.end_date).unwrap_or(NaiveDate::MAX);
    if start > end {
        return Err(IndicesError::invalid_param(
            "end",
            format!("{} is before {}", end, start),
        ));
    }
    Ok((start, end))
}

fn load_prices(source: &SourceConfig, args: &RunArgs) -> Result<Vec<PricePoint>, IndicesError> {
    let (csv, coin) = resolve_source(source, args)?;
    let (start, end) = resolve_date_range(source, args)?;
    let points = csv.fetch_prices(&coin, start, end)?;
    if points.is_empty() {
        warn!(coin = %coin, "no prices in the requested range");
    } else {
        info!(coin = %coin, rows = points.len(), "prices loaded");
    }
    Ok(points)
}

/// Runs the indicator named by `command`. Command-line values override the
/// `[indices]` config.
pub fn compute_table(
    engine: &IndicatorEngine,
    command: &Command,
    cfg: &IndicatorConfig,
    plot: bool,
    show: bool,
) -> Result<IndicatorTable, IndicesError> {
    let options = |plot_name: &str| ChartOptions {
        plot,
        plot_name: plot_name.to_string(),
        show_plot: show,
    };

    match command {
        Command::Vola { window, .. } => {
            let window = window.unwrap_or(cfg.volatility_window);
            let points = engine.get_vola_index(window, &options(volatility::DEFAULT_PLOT))?;
            Ok(volatility::to_table(&points))
        }
        Command::Rsi { .. } => {
            let points = engine.get_rsi(&options(rsi::DEFAULT_PLOT))?;
            Ok(rsi::to_table(&points))
        }
        Command::Bollinger {
            days,
            legacy_lower_band,
            ..
        } => {
            let days = days.unwrap_or(cfg.bollinger_days);
            let lower_band = if *legacy_lower_band {
                LowerBand::Legacy
            } else {
                cfg.lower_band
            };
            let points =
                engine.get_bollinger_bands(days, lower_band, &options(bollinger::DEFAULT_PLOT))?;
            Ok(bollinger::to_table(&points))
        }
        Command::Macd { fast, slow, .. } => {
            let fast = fast.unwrap_or(cfg.macd_fast);
            let slow = slow.unwrap_or(cfg.macd_slow);
            let points = engine.get_moving_average_convergence_divergence(
                fast,
                slow,
                &options(macd::DEFAULT_PLOT),
            )?;
            Ok(macd::to_table(&points))
        }
        Command::Sma { days, .. } => {
            let days = days.unwrap_or(cfg.sma_days);
            let points = engine.get_simple_moving_average(days, &options(sma::DEFAULT_PLOT))?;
            Ok(sma::to_table(&points))
        }
        Command::Ema { periods, .. } => {
            let periods = match periods {
                Some(raw) => {
                    parse_periods(raw).map_err(|e| IndicesError::invalid_param("periods", e))?
                }
                None => cfg.ema_periods.clone(),
            };
            let series =
                engine.get_exponential_moving_average(&periods, &options(ema::DEFAULT_PLOT))?;
            Ok(series.to_table())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn engine(count: usize) -> IndicatorEngine {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let points: Vec<PricePoint> = (0..count)
            .map(|i| {
                PricePoint::new(
                    start + chrono::Duration::days(i as i64),
                    50.0 + (i % 7) as f64,
                )
            })
            .collect();
        IndicatorEngine::new(&points).unwrap()
    }

    #[test]
    fn parses_global_config_after_subcommand() {
        let cli = parse(&["price-indices", "rsi", "--coin", "bitcoin", "-c", "run.ini"]);
        assert_eq!(cli.config, Some(PathBuf::from("run.ini")));
        assert_eq!(cli.command.args().coin.as_deref(), Some("bitcoin"));
    }

    #[test]
    fn parses_dates_and_flags() {
        let cli = parse(&[
            "price-indices",
            "bollinger",
            "--input",
            "data/bitcoin.csv",
            "--start",
            "2020-03-16",
            "--days",
            "10",
            "--legacy-lower-band",
            "--plot",
        ]);
        match &cli.command {
            Command::Bollinger {
                args,
                days,
                legacy_lower_band,
            } => {
                assert_eq!(args.start, NaiveDate::from_ymd_opt(2020, 3, 16));
                assert_eq!(*days, Some(10));
                assert!(*legacy_lower_band);
                assert!(args.plot);
                assert!(!args.show);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_date() {
        assert!(Cli::try_parse_from(["price-indices", "sma", "--start", "16/03/2020"]).is_err());
    }

    #[test]
    fn input_file_names_the_coin() {
        let args = RunArgs {
            input: Some(PathBuf::from("data/Ethereum.csv")),
            coin: Some("bitcoin".into()),
            ..Default::default()
        };
        let cfg = build_config(None).unwrap();
        let (_, coin) = resolve_source(&cfg.source, &args).unwrap();
        assert_eq!(coin, "Ethereum");
    }

    #[test]
    fn input_must_be_csv() {
        let args = RunArgs {
            input: Some(PathBuf::from("data/bitcoin.json")),
            ..Default::default()
        };
        let cfg = build_config(None).unwrap();
        let err = resolve_source(&cfg.source, &args).err().unwrap();
        assert!(matches!(err, IndicesError::InvalidParameter { .. }));
    }

    #[test]
    fn coin_is_required_without_input() {
        let cfg = build_config(None).unwrap();
        let err = resolve_source(&cfg.source, &RunArgs::default()).err().unwrap();
        assert!(matches!(err, IndicesError::ConfigInvalid { ref key, .. } if key == "coin"));
    }

    #[test]
    fn cli_coin_is_lowercased() {
        let args = RunArgs {
            coin: Some(" Bitcoin ".into()),
            ..Default::default()
        };
        let cfg = build_config(None).unwrap();
        let (_, coin) = resolve_source(&cfg.source, &args).unwrap();
        assert_eq!(coin, "bitcoin");
    }

    #[test]
    fn date_range_defaults_to_everything() {
        let cfg = build_config(None).unwrap();
        let (start, end) = resolve_date_range(&cfg.source, &RunArgs::default()).unwrap();
        assert_eq!(start, NaiveDate::MIN);
        assert_eq!(end, NaiveDate::MAX);
    }

    #[test]
    fn reversed_date_range_is_rejected() {
        let cfg = build_config(None).unwrap();
        let args = RunArgs {
            start: NaiveDate::from_ymd_opt(2021, 2, 1),
            end: NaiveDate::from_ymd_opt(2021, 1, 1),
            ..Default::default()
        };
        assert!(matches!(
            resolve_date_range(&cfg.source, &args),
            Err(IndicesError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn compute_table_uses_config_defaults() {
        let engine = engine(40);
        let cfg = IndicatorConfig::default();
        let cli = parse(&["price-indices", "sma"]);

        let table = compute_table(&engine, &cli.command, &cfg, false, false).unwrap();
        assert_eq!(table.columns, vec!["SMA".to_string()]);
        assert_eq!(table.len(), 21);
    }

    #[test]
    fn compute_table_flag_overrides_config() {
        let engine = engine(40);
        let cfg = IndicatorConfig::default();
        let cli = parse(&["price-indices", "vola", "--window", "10"]);

        let table = compute_table(&engine, &cli.command, &cfg, false, false).unwrap();
        assert_eq!(table.len(), 30);
    }

    #[test]
    fn compute_table_ema_periods() {
        let engine = engine(40);
        let cfg = IndicatorConfig::default();
        let cli = parse(&["price-indices", "ema", "--periods", "5,9"]);

        let table = compute_table(&engine, &cli.command, &cfg, false, false).unwrap();
        assert_eq!(table.columns, vec!["EMA_5".to_string(), "EMA_9".to_string()]);
        assert_eq!(table.len(), 40);
    }

    #[test]
    fn compute_table_bad_periods() {
        let engine = engine(40);
        let cfg = IndicatorConfig::default();
        let cli = parse(&["price-indices", "ema", "--periods", "5,5"]);

        let err = compute_table(&engine, &cli.command, &cfg, false, false).unwrap_err();
        assert!(matches!(err, IndicesError::InvalidParameter { ref name, .. } if name == "periods"));
    }

    #[test]
    fn compute_table_macd_spans() {
        let engine = engine(40);
        let cfg = IndicatorConfig::default();
        let cli = parse(&["price-indices", "macd", "--fast", "30", "--slow", "20"]);

        let err = compute_table(&engine, &cli.command, &cfg, false, false).unwrap_err();
        assert!(matches!(err, IndicesError::InvalidParameter { .. }));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let err = build_config(Some(Path::new("/nonexistent/indices.ini"))).unwrap_err();
        assert!(matches!(err, IndicesError::ConfigParse { .. }));
    }
}
