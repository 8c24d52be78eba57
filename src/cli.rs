//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report::{format_timestamp, ConsoleReport};
use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_ledger::CsvLedgerExport;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::synthetic_adapter::SyntheticPriceAdapter;
use crate::domain::backtest::{
    self as backtest_engine, BacktestConfig, DEFAULT_DAYS, DEFAULT_INITIAL_BALANCE, DEFAULT_WARMUP,
};
use crate::domain::config_validation::{
    parse_value, strategy_catalog, validate_backtest_config, validate_synthetic_config,
};
use crate::domain::error::TradesimError;
use crate::domain::portfolio::Goal;
use crate::domain::signal::{generate_signals, Action};
use crate::domain::strategy::{StrategyCatalog, StrategyKind};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradesim", about = "Single-asset technical-analysis backtester")]
pub struct Cli {
    /// Diagnostic log level: trace, debug, info, warn, error
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and print results and the trade ledger
    Run(RunArgs),
    /// Print the non-HOLD signals of a strategy
    Signals {
        #[arg(short, long)]
        strategy: String,
        #[arg(short, long)]
        prices: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        /// Number of synthetic bars when no price file is given
        #[arg(long, default_value_t = DEFAULT_DAYS + DEFAULT_WARMUP)]
        days: usize,
        #[arg(long)]
        allow_shorting: bool,
    },
    /// List the strategies a configuration enables
    Strategies {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// CSV file with `timestamp,price` rows; synthetic prices when absent
    #[arg(short, long)]
    pub prices: Option<PathBuf>,
    #[arg(short, long)]
    pub strategy: Option<String>,
    /// usd or accumulate
    #[arg(short, long)]
    pub goal: Option<String>,
    /// Length of the simulation window
    #[arg(long)]
    pub days: Option<usize>,
    /// Extra synthetic history generated ahead of the window
    #[arg(long)]
    pub warmup: Option<usize>,
    #[arg(long)]
    pub initial_balance: Option<f64>,
    #[arg(long)]
    pub allow_shorting: bool,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Also write the ledger as CSV
    #[arg(long)]
    pub ledger_csv: Option<PathBuf>,
}

/// Fully resolved run parameters: CLI flags over config values over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub backtest: BacktestConfig,
    pub warmup: usize,
    pub prices: Option<PathBuf>,
    pub synthetic: SyntheticPriceAdapter,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run(args) => run_backtest(&args),
        Command::Signals {
            strategy,
            prices,
            seed,
            days,
            allow_shorting,
        } => run_signals(&strategy, prices.as_deref(), seed, days, allow_shorting),
        Command::Strategies { config } => run_strategies(config.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn report_error(err: TradesimError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

pub fn resolve_run_settings(
    args: &RunArgs,
    config: Option<&dyn ConfigPort>,
) -> Result<RunSettings, TradesimError> {
    let catalog = match config {
        Some(c) => {
            validate_backtest_config(c)?;
            validate_synthetic_config(c)?;
            strategy_catalog(c)?
        }
        None => StrategyCatalog::all(),
    };

    let from_config = |key: &str| config.and_then(|c| c.get_string("backtest", key));

    let strategy_name = args
        .strategy
        .clone()
        .or_else(|| from_config("strategy"))
        .unwrap_or_else(|| StrategyKind::GoldenCross.name().to_string());
    let strategy = catalog.select(&strategy_name)?;

    let goal = match args.goal.as_deref() {
        Some(g) => g.parse::<Goal>()?,
        None => match config {
            Some(c) => parse_value::<Goal>(c, "backtest", "goal")?.unwrap_or_default(),
            None => Goal::default(),
        },
    };

    let days = match args.days {
        Some(d) => d,
        None => config_number(config, "backtest", "days")?.unwrap_or(DEFAULT_DAYS),
    };
    let warmup = match args.warmup {
        Some(w) => w,
        None => config_number(config, "backtest", "warmup")?.unwrap_or(DEFAULT_WARMUP),
    };
    let initial_balance = match args.initial_balance {
        Some(b) => b,
        None => config_number(config, "backtest", "initial_balance")?
            .unwrap_or(DEFAULT_INITIAL_BALANCE),
    };
    if !(initial_balance.is_finite() && initial_balance > 0.0) {
        return Err(TradesimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_balance".to_string(),
            reason: "initial_balance must be positive".to_string(),
        });
    }
    if days == 0 {
        return Err(TradesimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "days".to_string(),
            reason: "days must be at least 1".to_string(),
        });
    }

    let allow_shorting =
        args.allow_shorting || config.is_some_and(|c| c.get_bool("backtest", "allow_shorting", false));
    let prices = args
        .prices
        .clone()
        .or_else(|| from_config("prices").map(PathBuf::from));

    let total = days.checked_add(warmup).ok_or_else(|| TradesimError::ConfigInvalid {
        section: "backtest".to_string(),
        key: "warmup".to_string(),
        reason: format!("days + warmup overflows ({} + {})", days, warmup),
    })?;
    let mut synthetic = SyntheticPriceAdapter::new(total);
    if let Some(c) = config {
        synthetic.initial_price = c.get_double("synthetic", "initial_price", synthetic.initial_price);
        synthetic.drift = c.get_double("synthetic", "drift", synthetic.drift);
        synthetic.volatility = c.get_double("synthetic", "volatility", synthetic.volatility);
        synthetic.seed = parse_value::<u64>(c, "synthetic", "seed")?;
    }
    if args.seed.is_some() {
        synthetic.seed = args.seed;
    }

    Ok(RunSettings {
        backtest: BacktestConfig {
            strategy,
            allow_shorting,
            initial_balance,
            goal,
            days,
        },
        warmup,
        prices,
        synthetic,
    })
}

fn config_number<T: std::str::FromStr>(
    config: Option<&dyn ConfigPort>,
    section: &str,
    key: &str,
) -> Result<Option<T>, TradesimError> {
    match config {
        Some(c) => parse_value(c, section, key),
        None => Ok(None),
    }
}

pub fn price_source(settings: &RunSettings) -> Box<dyn PricePort> {
    match &settings.prices {
        Some(path) => Box::new(CsvPriceAdapter::new(path.clone())),
        None => Box::new(settings.synthetic.clone()),
    }
}

fn run_backtest(args: &RunArgs) -> ExitCode {
    // Stage 1: Load config
    let adapter = match &args.config {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => Some(a),
                Err(code) => return code,
            }
        }
        None => None,
    };

    // Stage 2: Resolve settings
    let settings = match resolve_run_settings(args, adapter.as_ref().map(|a| a as &dyn ConfigPort)) {
        Ok(s) => s,
        Err(e) => return report_error(e),
    };

    // Stage 3: Load prices
    match &settings.prices {
        Some(path) => eprintln!("Loading prices from {}", path.display()),
        None => eprintln!(
            "Generating {} synthetic prices ({} days + {} warm-up)",
            settings.synthetic.days, settings.backtest.days, settings.warmup
        ),
    }
    let series = match price_source(&settings).load_prices() {
        Ok(s) => s,
        Err(e) => return report_error(e),
    };

    // Stage 4: Simulate
    eprintln!(
        "Running {} over the last {} of {} bars",
        settings.backtest.strategy,
        settings.backtest.days.min(series.len()),
        series.len()
    );
    let result = match backtest_engine::run_backtest(&series, &settings.backtest) {
        Ok(r) => r,
        Err(e) => return report_error(e),
    };

    // Stage 5: Report
    if let Err(e) = ConsoleReport.write(&result, &settings.backtest) {
        return report_error(e);
    }
    if let Some(path) = &args.ledger_csv {
        if let Err(e) = CsvLedgerExport::new(path.clone()).write(&result, &settings.backtest) {
            return report_error(e);
        }
        eprintln!("\nLedger written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_signals(
    strategy: &str,
    prices: Option<&Path>,
    seed: Option<u64>,
    days: usize,
    allow_shorting: bool,
) -> ExitCode {
    let kind: StrategyKind = match strategy.parse() {
        Ok(k) => k,
        Err(e) => return report_error(e),
    };

    let source: Box<dyn PricePort> = match prices {
        Some(path) => Box::new(CsvPriceAdapter::new(path.to_path_buf())),
        None => Box::new(SyntheticPriceAdapter::new(days).with_seed(seed)),
    };
    let series = match source.load_prices() {
        Ok(s) => s,
        Err(e) => return report_error(e),
    };

    eprintln!("Indicators: {}", kind.plan(&[]).legend());
    let signals = generate_signals(&series, kind, allow_shorting);
    let mut shown = 0usize;
    for signal in signals.iter().filter(|s| s.action != Action::Hold) {
        println!(
            "{:>5}  {}  {:<5} at {:.2}  {}",
            signal.index,
            format_timestamp(signal.timestamp),
            signal.action.to_string(),
            signal.price,
            signal.reason
        );
        shown += 1;
    }
    eprintln!("{} signals over {} bars ({} non-HOLD)", signals.len(), series.len(), shown);

    ExitCode::SUCCESS
}

fn run_strategies(config_path: Option<&Path>) -> ExitCode {
    let catalog = match config_path {
        Some(path) => {
            let adapter = match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            };
            match strategy_catalog(&adapter) {
                Ok(c) => c,
                Err(e) => return report_error(e),
            }
        }
        None => StrategyCatalog::all(),
    };

    for kind in catalog.enabled() {
        let plan = kind.plan(&[]);
        println!("{:<22} {}", kind.name(), kind.description());
        println!("{:<22}   bullish: {}", "", plan.bullish);
        println!("{:<22}   bearish: {}", "", plan.bearish);
        println!("{:<22}   series:  {}", "", plan.legend());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match resolve_run_settings(&RunArgs::default(), Some(&adapter)) {
        Ok(settings) => {
            eprintln!("  Strategy:        {}", settings.backtest.strategy);
            eprintln!("  Goal:            {}", settings.backtest.goal);
            eprintln!("  Initial balance: {:.2}", settings.backtest.initial_balance);
            eprintln!("  Days:            {}", settings.backtest.days);
            eprintln!("  Allow shorting:  {}", settings.backtest.allow_shorting);
            match &settings.prices {
                Some(path) => eprintln!("  Prices:          {}", path.display()),
                None => eprintln!("  Prices:          synthetic ({} bars)", settings.synthetic.days),
            }
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => report_error(e),
    }
}
