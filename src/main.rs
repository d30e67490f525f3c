use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use blightscan::config::Configuration;
use blightscan::detection::{DetectionService, Detector};
use blightscan::disease::DISEASE_INFO;
use blightscan::error::AppError;
use clap::Parser;
use futures::future::join_all;
use tower::{ServiceBuilder, ServiceExt};
use tracing::{error, info, Level};

/// Potato leaf disease detection
#[derive(Parser, Debug)]
#[command(name = "blightscan")]
#[command(version)]
#[command(about = "Classify potato leaf images and print detections as JSON")]
struct Cli {
    /// Image files to classify
    images: Vec<PathBuf>,

    /// Configuration file, layered over ./blightscan.toml
    #[arg(short, long, env = "BLIGHTSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Images classified at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Pretty-print each report
    #[arg(long)]
    pretty: bool,

    /// Print the disease reference table and exit
    #[arg(long)]
    list_diseases: bool,
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Runs one invocation against an already loaded configuration, writing
/// JSON documents to `out`.
async fn run(cli: Cli, configuration: &Configuration, out: &mut impl Write) -> Result<(), AppError> {
    if cli.list_diseases {
        writeln!(out, "{}", to_json(&*DISEASE_INFO, true)?)?;
        return Ok(());
    }

    if cli.images.is_empty() {
        return Err(AppError::NoInput);
    }

    let detector = Arc::new(Detector::from_config(configuration));
    info!(
        "Classifying {} image(s) with {:?}, concurrency {}",
        cli.images.len(),
        detector,
        configuration.concurrency
    );

    let service = ServiceBuilder::new()
        .concurrency_limit(configuration.concurrency)
        .service(DetectionService::new(detector));

    let reports = join_all(
        cli.images
            .into_iter()
            .map(|path| service.clone().oneshot(path)),
    )
    .await;

    for report in reports {
        match report {
            Ok(report) => writeln!(out, "{}", to_json(&report, cli.pretty)?)?,
            Err(e) => error!("Detection failed: {}", e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let configuration = Configuration::load(cli.config.as_deref())?.with_concurrency(cli.concurrency);
    init_logging(configuration.max_log_level());

    run(cli, &configuration, &mut std::io::stdout()).await
}
