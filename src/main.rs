use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use relaywatch_lib::commands::{health, providers};
use relaywatch_lib::config::{self, HealthConfig};
use relaywatch_lib::feed::HttpFeedSource;
use relaywatch_lib::HealthMonitor;

/// Print relay provider health from the monitoring feed as JSON.
#[derive(Debug, Parser)]
#[command(name = "relaywatch", version)]
struct Cli {
    /// Provider file (JSON array, or object keyed by id).
    /// Defaults to ~/.relaywatch/providers.json when it exists.
    #[arg(long, env = "RELAYWATCH_PROVIDERS")]
    providers: Option<PathBuf>,

    /// App whose service to report (claude, codex, gemini).
    #[arg(long, default_value = "claude")]
    app: String,

    /// Print the feed document untouched.
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    relaywatch_lib::init_tracing();
    config::load_dotenv();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "relaywatch failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, String> {
    let config = HealthConfig::from_env();
    info!(feed = %config.feed_url, "Using health feed");

    if cli.raw {
        let source = HttpFeedSource::new(&config).map_err(|e| e.to_string())?;
        let body = health::health_proxy_status(&source).await?;
        return serde_json::to_string_pretty(&body).map_err(|e| e.to_string());
    }

    let monitor = HealthMonitor::from_config(&config).map_err(|e| e.to_string())?;
    let providers_path = cli
        .providers
        .or_else(|| config::default_providers_path().filter(|p| p.exists()));

    let output = match providers_path {
        Some(path) => {
            let records = providers::providers_load(&path)?;
            let reports = health::health_check_providers(&monitor, &records, &cli.app).await;
            serde_json::to_string_pretty(&reports)
        }
        None => {
            let all = health::health_fetch_all(&monitor).await?;
            serde_json::to_string_pretty(&all)
        }
    }
    .map_err(|e| e.to_string())?;

    Ok(output)
}
