//! VitalWatch CLI
//!
//! Command-line interface for evaluating patient vital-sign streams.

use std::collections::HashSet;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use vitalwatch::alerting::AlertGenerator;
use vitalwatch::clock::SystemClock;
use vitalwatch::ingest::{self, DataReader, FileReader, TcpReader};
use vitalwatch::models::{Alert, AlertSnapshot, FindingKind};
use vitalwatch::storage::{DataStorage, HistoryProvider};
use vitalwatch::Config;

/// VitalWatch - Alerting over patient vital signs
#[derive(Parser)]
#[command(name = "vitalwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "VITALWATCH_CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate measurements read from simulator log files
    Evaluate {
        /// Log file or directory of `*.txt` log files
        #[arg(long)]
        source: Option<String>,

        /// Only evaluate this patient
        #[arg(long)]
        patient: Option<String>,
    },

    /// Follow a TCP producer and evaluate periodically
    Listen {
        /// Producer address (host:port)
        #[arg(long)]
        addr: Option<String>,
    },

    /// Parse a single `patientId,timestamp,type,value` line
    CheckLine {
        /// The line to parse
        line: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config, cli.verbose);

    let result = match cli.command {
        Commands::Evaluate { source, patient } => {
            run_evaluate(&config, source, patient.as_deref(), cli.format).await
        }
        Commands::Listen { addr } => run_listen(&config, addr, cli.format).await,
        Commands::CheckLine { line } => run_check_line(&line, cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let log_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_evaluate(
    config: &Config,
    source: Option<String>,
    patient: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let source = source
        .or_else(|| config.ingest.source.clone())
        .context("no source given (use --source or ingest.source)")?;

    let storage = Arc::new(DataStorage::new());
    FileReader::new(&source)
        .read_into(&storage)
        .await
        .with_context(|| format!("reading measurements from {source}"))?;

    let generator = AlertGenerator::new(storage.clone(), Arc::new(SystemClock));
    match patient {
        Some(patient_id) => {
            generator.evaluate(patient_id);
        }
        None => {
            generator.evaluate_all();
        }
    }

    let alerts = match patient {
        Some(patient_id) => generator.alerts_for(patient_id),
        None => generator.all_alerts(),
    };
    for alert in &alerts {
        print_alert(&alert.snapshot(), format)?;
    }

    info!(
        patients = storage.patient_count(),
        records = storage.record_count(),
        alerts = alerts.len(),
        "Evaluation complete"
    );
    Ok(())
}

/// Identity used to avoid re-printing the same alert on every pass.
/// Combined conditions carry the evaluation time, so their timestamp is ignored.
fn alert_key(alert: &Alert) -> (String, FindingKind, Option<i64>) {
    let timestamp = match alert.kind() {
        FindingKind::HypotensiveHypoxemia => None,
        _ => Some(alert.timestamp()),
    };
    (alert.patient_id().to_string(), alert.kind(), timestamp)
}

async fn run_listen(
    config: &Config,
    addr: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let addr = addr
        .or_else(|| config.ingest.source.clone())
        .context("no producer address given (use --addr or ingest.source)")?;

    let storage = Arc::new(DataStorage::new());
    let reader = TcpReader::new(
        addr.clone(),
        Duration::from_millis(config.ingest.connect_timeout_ms),
    );

    let mut reader_handle = {
        let storage = Arc::clone(&storage);
        tokio::spawn(async move { reader.read_into(&storage).await })
    };

    info!(
        addr = %addr,
        interval_seconds = config.alerting.evaluation_interval_seconds,
        "Listening for measurements"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(
        config.alerting.evaluation_interval_seconds.max(1),
    ));
    // Keys of every alert shown this session. The set is never pruned, so it
    // grows with the number of distinct alerts until the session ends.
    let mut printed = HashSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                evaluate_pass(&storage, &mut printed, format)?;
            }
            finished = &mut reader_handle => {
                evaluate_pass(&storage, &mut printed, format)?;
                match finished {
                    Ok(Ok(records)) => info!(records, "Producer closed the stream"),
                    Ok(Err(e)) => {
                        error!(error = %e, "Ingestion failed");
                        return Err(e.into());
                    }
                    Err(e) => return Err(e.into()),
                }
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
                reader_handle.abort();
                break;
            }
        }
    }

    Ok(())
}

/// Evaluate every patient on a fresh generator and print alerts not shown before
///
/// Each pass re-runs the rules over the full history of every patient, so its
/// cost grows with the stored measurements.
fn evaluate_pass(
    storage: &Arc<DataStorage>,
    printed: &mut HashSet<(String, FindingKind, Option<i64>)>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let provider: Arc<dyn HistoryProvider> = storage.clone();
    let generator = AlertGenerator::new(provider, Arc::new(SystemClock));
    generator.evaluate_all();

    for alert in generator.all_alerts() {
        if printed.insert(alert_key(&alert)) {
            print_alert(&alert.snapshot(), format)?;
        }
    }
    Ok(())
}

fn run_check_line(line: &str, format: OutputFormat) -> anyhow::Result<()> {
    let record = ingest::parse_line(line)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&record)?),
        OutputFormat::Text => println!(
            "patient={} timestamp={} type={} value={}",
            record.patient_id(),
            record.timestamp(),
            record.kind(),
            record.value()
        ),
    }
    Ok(())
}

fn print_alert(alert: &AlertSnapshot, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(alert)?),
        OutputFormat::Text => println!(
            "[patient {}] {} {}",
            alert.patient_id, alert.timestamp, alert.condition
        ),
    }
    Ok(())
}
