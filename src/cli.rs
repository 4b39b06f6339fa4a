//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvOperationAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::ini_rate_adapter::IniRateAdapter;
use crate::domain::config_validation::{
    validate_commission_config, validate_rates_config, COMMISSION_SECTION, RATES_SECTION,
};
use crate::domain::engine::CommissionEngine;
use crate::domain::error::CommissionError;
use crate::domain::fee_schedule::FeeSchedule;
use crate::domain::money::format_amount;
use crate::domain::operation::{CurrencyCode, Operation};
use crate::domain::rates::RateSource;
use crate::ports::config_port::ConfigPort;
use crate::ports::operation_port::OperationPort;

#[derive(Parser, Debug)]
#[command(name = "commissioner", about = "Commission fee calculator")]
pub struct Cli {
    /// Log progress information to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Calculate commissions for an operations CSV file
    Calculate {
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// INI file with a [rates] section, overriding the config's rates
        #[arg(long)]
        rates: Option<PathBuf>,
        /// Abort on the first operation that cannot be calculated
        #[arg(long)]
        strict: bool,
    },
    /// Show the exchange rates a calculation would use
    Rates {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        rates: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Log to stderr. `RUST_LOG` wins over the verbosity flag.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Calculate {
            input,
            config,
            rates,
            strict,
        } => run_calculate(&input, config.as_ref(), rates.as_ref(), strict),
        Command::Rates { config, rates } => run_rates(config.as_ref(), rates.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Load and validate the optional config file.
fn load_validated_config(path: Option<&PathBuf>) -> Result<Option<FileConfigAdapter>, ExitCode> {
    let Some(path) = path else {
        return Ok(None);
    };
    tracing::info!("loading config from {}", path.display());
    let adapter = load_config(path)?;
    if let Err(e) = validate_commission_config(&adapter).and_then(|_| validate_rates_config(&adapter)) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }
    Ok(Some(adapter))
}

pub fn build_fee_schedule(config: &dyn ConfigPort) -> Result<FeeSchedule, CommissionError> {
    let defaults = FeeSchedule::default();

    let base_currency = match config.get_string(COMMISSION_SECTION, "base_currency") {
        Some(code) => code
            .parse::<CurrencyCode>()
            .map_err(|reason| CommissionError::ConfigInvalid {
                section: COMMISSION_SECTION.into(),
                key: "base_currency".into(),
                reason,
            })?,
        None => defaults.base_currency,
    };

    let decimal = |key: &str, default: Decimal| -> Result<Decimal, CommissionError> {
        match config.get_string(COMMISSION_SECTION, key) {
            None => Ok(default),
            Some(_) => config.get_decimal(COMMISSION_SECTION, key).ok_or_else(|| {
                CommissionError::ConfigInvalid {
                    section: COMMISSION_SECTION.into(),
                    key: key.into(),
                    reason: "expected a decimal number".into(),
                }
            }),
        }
    };

    let free_operations = config.get_int(
        COMMISSION_SECTION,
        "weekly_free_operations",
        defaults.weekly_free_operations as i64,
    );
    let weekly_free_operations =
        u32::try_from(free_operations).map_err(|_| CommissionError::ConfigInvalid {
            section: COMMISSION_SECTION.into(),
            key: "weekly_free_operations".into(),
            reason: "must be zero or more".into(),
        })?;

    Ok(FeeSchedule {
        base_currency,
        deposit_rate: decimal("deposit_rate", defaults.deposit_rate)?,
        business_withdraw_rate: decimal("business_withdraw_rate", defaults.business_withdraw_rate)?,
        private_withdraw_rate: decimal("private_withdraw_rate", defaults.private_withdraw_rate)?,
        weekly_free_amount: decimal("weekly_free_amount", defaults.weekly_free_amount)?,
        weekly_free_operations,
    })
}

/// Rates come from `--rates` if given, else from the config's `[rates]`
/// section, else nowhere (the built-in table takes over).
pub fn build_rate_source(
    config: Option<&FileConfigAdapter>,
    rates_path: Option<&PathBuf>,
    base: &CurrencyCode,
) -> RateSource {
    let provider = match (rates_path, config) {
        (Some(path), _) => IniRateAdapter::from_file(path, base.clone()),
        (None, Some(config)) if config.section_keys(RATES_SECTION).is_some() => {
            IniRateAdapter::from_config(config.clone(), base.clone())
        }
        _ => IniRateAdapter::unconfigured(base.clone()),
    };
    RateSource::new(Box::new(provider))
}

fn build_engine(
    config_path: Option<&PathBuf>,
    rates_path: Option<&PathBuf>,
) -> Result<(CommissionEngine, bool), ExitCode> {
    let config = load_validated_config(config_path)?;
    let schedule = match config.as_ref().map(|c| build_fee_schedule(c)) {
        Some(Err(e)) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
        Some(Ok(s)) => s,
        None => FeeSchedule::default(),
    };
    let strict = config
        .as_ref()
        .is_some_and(|c| c.get_bool("calculation", "strict", false));

    let rates = build_rate_source(config.as_ref(), rates_path, &schedule.base_currency);
    if rates.used_fallback() {
        eprintln!("warning: exchange rates unavailable, using built-in rates");
    }
    Ok((CommissionEngine::standard(&schedule, rates), strict))
}

/// Write one formatted commission per operation. Operations that fail are
/// reported on stderr and produce no line, unless `strict` is set, in which
/// case the first failure is returned.
pub fn write_commissions(
    engine: &mut CommissionEngine,
    operations: &[Operation],
    strict: bool,
    out: &mut dyn Write,
) -> Result<usize, CommissionError> {
    let mut failed = 0;
    for (index, operation) in operations.iter().enumerate() {
        match engine.calculate(operation) {
            Ok(commission) => {
                writeln!(out, "{}", format_amount(commission, &operation.currency))?;
            }
            Err(e) if strict => return Err(e),
            Err(e) => {
                failed += 1;
                eprintln!("error: operation {}: {e}", index + 1);
            }
        }
    }
    Ok(failed)
}

fn run_calculate(
    input: &PathBuf,
    config_path: Option<&PathBuf>,
    rates_path: Option<&PathBuf>,
    strict_flag: bool,
) -> ExitCode {
    let (mut engine, strict_config) = match build_engine(config_path, rates_path) {
        Ok(e) => e,
        Err(code) => return code,
    };
    let strict = strict_flag || strict_config;

    let operations = match CsvOperationAdapter::new(input.clone()).read_operations() {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match write_commissions(&mut engine, &operations, strict, &mut out) {
        Ok(0) => {
            tracing::info!("{} commissions calculated", operations.len());
            ExitCode::SUCCESS
        }
        Ok(failed) => {
            tracing::warn!("{} of {} operations failed", failed, operations.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_rates(config_path: Option<&PathBuf>, rates_path: Option<&PathBuf>) -> ExitCode {
    let (engine, _) = match build_engine(config_path, rates_path) {
        Ok(e) => e,
        Err(code) => return code,
    };
    let table = engine.rates().table();
    println!("base {}", table.base());
    for (currency, rate) in table.rates() {
        println!("{} {}", currency, rate);
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_validated_config(Some(config_path)) {
        Ok(Some(a)) => a,
        Ok(None) => return ExitCode::from(2),
        Err(code) => return code,
    };
    let schedule = match build_fee_schedule(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("  base currency:          {}", schedule.base_currency);
    eprintln!("  deposit rate:           {}", schedule.deposit_rate);
    eprintln!("  business withdraw rate: {}", schedule.business_withdraw_rate);
    eprintln!("  private withdraw rate:  {}", schedule.private_withdraw_rate);
    eprintln!(
        "  weekly allowance:       {} {} over {} withdrawals",
        schedule.weekly_free_amount, schedule.base_currency, schedule.weekly_free_operations
    );
    match adapter.section_keys(RATES_SECTION) {
        Some(keys) => eprintln!("  rates:                  {} currencies", keys.len()),
        None => eprintln!("  rates:                  built-in"),
    }
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
