use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::io::Read;
use std::path::PathBuf;

use spaces_presign::{
    PresignError, ProviderConfig, RawRequest, SpacesPresigner, handle, try_handle,
};
use tracing::info;

/// Exit code for a rejected or failed request
const EXIT_REQUEST_FAILED: i32 = 1;
/// Exit code when startup configuration is incomplete
const EXIT_CONFIG: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "presign",
    version = env!("CARGO_PKG_VERSION"),
    author = "Tyr Chen <tyr.chen@gmail.com>",
    about = "Issue pre-signed GET/PUT URLs for DigitalOcean Spaces objects",
    long_about = "Generates a time-limited URL that lets a client upload (PUT) or download (GET) a single \
                  object without sharing the Spaces key. Signing happens locally; nothing is transferred. \
                  Configure via .env file with Spaces credentials.",
    after_help = "Examples:\n  \
                  presign report.pdf -t PUT                     # Upload URL, default region, 5 minutes\n  \
                  presign report.pdf -t GET -r \"New York\" -d 1h # Download URL from nyc3 valid for 1 hour\n  \
                  echo '{\"filename\":\"a.txt\",\"type\":\"GET\"}' | presign --json\n\n\
                  Configuration (.env):\n  \
                  SPACES_KEY=DO00...\n  \
                  SPACES_SECRET=...\n  \
                  BUCKET=my-bucket\n  \
                  REGION=nyc3\n  \
                  REGION_FALLBACK=false\n  \
                  SIGNING_TIMEOUT_SECS=10"
)]
struct Cli {
    /// Object key to upload or download
    filename: Option<String>,

    /// Request type: GET (download) or PUT (upload)
    #[arg(long = "type", short = 't', value_name = "GET|PUT")]
    operation: Option<String>,

    /// Region code or city name (e.g., nyc3, "San Francisco"); defaults to REGION
    #[arg(long, short = 'r')]
    region: Option<String>,

    /// How long the URL stays valid (e.g., 90s, 5m, 1h30m; default: 5m, max: 7d)
    #[arg(long, short = 'd')]
    duration: Option<String>,

    /// Read a JSON request from stdin and print a JSON response
    #[arg(long, conflicts_with_all = ["filename", "operation", "region", "duration"])]
    json: bool,

    /// Load configuration from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

impl Cli {
    fn raw_request(&self) -> Result<RawRequest> {
        if self.json {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read request from stdin")?;
            return serde_json::from_str(&input).context("Failed to parse JSON request");
        }

        Ok(RawRequest {
            filename: self.filename.clone(),
            operation: self.operation.clone(),
            region: self.region.clone(),
            duration: self.duration.clone(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file early to get LOG_LEVEL
    dotenv::dotenv().ok();

    // Initialize tracing/logging with support for LOG_LEVEL from .env
    let log_level = std::env::var("LOG_LEVEL")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    // stdout carries the URL, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let loaded = match &cli.env_file {
        Some(path) => ProviderConfig::from_env_file(path),
        None => ProviderConfig::from_env(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{}",
                style(PresignError::from(e).user_message()).red().bold()
            );
            std::process::exit(EXIT_CONFIG);
        }
    };

    info!(
        "Presigning against bucket '{}' (default region {})",
        config.bucket, config.region
    );

    let presigner = SpacesPresigner::new(&config);
    let raw = cli.raw_request()?;

    if cli.json {
        let response = handle(&config, &presigner, raw).await;
        println!("{}", serde_json::to_string_pretty(&response)?);
        if !response.is_success() {
            std::process::exit(EXIT_REQUEST_FAILED);
        }
        return Ok(());
    }

    match try_handle(&config, &presigner, &raw).await {
        Ok(result) => {
            println!("{}", result.url);
            eprintln!(
                "{}",
                style(format!(
                    "✓ {} s3://{}/{} (expires {})",
                    result.operation,
                    config.bucket,
                    result.object_key,
                    result.expires_at.to_rfc3339()
                ))
                .green()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", style(e.user_message()).red().bold());
            std::process::exit(EXIT_REQUEST_FAILED);
        }
    }
}
