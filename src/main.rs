use adaptive_upload::file::DiskFile;
use adaptive_upload::strategy::UploadConfig;
use adaptive_upload::transport::{HttpTransport, HttpTransportConfig};
use adaptive_upload::upload::{UploadManager, UploadRequest, UploadResultSet};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "adaptive-upload",
    version,
    about = "Upload files with size-adaptive batching and chunking"
)]
struct Cli {
    /// Destination endpoint (absolute URL, or path relative to --base-url)
    endpoint: String,

    /// Files to upload
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Extra form field as key=value (repeatable)
    #[arg(short, long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Form key the files are attached under
    #[arg(long, default_value = "files")]
    file_field: String,

    #[arg(long)]
    base_url: Option<Url>,

    /// Bearer token
    #[arg(long, env = "UPLOAD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// JSON file with upload thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    small_threshold: Option<u64>,

    #[arg(long)]
    huge_threshold: Option<u64>,

    #[arg(long)]
    chunk_size: Option<u64>,

    /// Maximum concurrent small-file uploads
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load_config(cli: &Cli) -> anyhow::Result<UploadConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            UploadConfig::from_json(&raw)?
        }
        None => UploadConfig::default(),
    };

    if let Some(v) = cli.small_threshold {
        config.small_threshold = v;
    }
    if let Some(v) = cli.huge_threshold {
        config.huge_threshold = v;
    }
    if let Some(v) = cli.chunk_size {
        config.chunk_size = v;
    }
    if let Some(v) = cli.concurrency {
        config.batch_concurrency = v;
    }

    Ok(config)
}

fn print_results(results: &UploadResultSet) {
    for outcome in results {
        match outcome.error() {
            None => println!("✓ {} ({})", outcome.file_name(), outcome.lane()),
            Some(e) => println!("✗ {} ({}): {e}", outcome.file_name(), outcome.lane()),
        }
    }
    println!(
        "\n{} uploaded, {} failed",
        results.success_count(),
        results.error_count()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("adaptive_upload=info")),
        )
        .init();
    adaptive_upload::metrics::init_metrics();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let transport = HttpTransport::new(HttpTransportConfig {
        base_url: cli.base_url.clone(),
        bearer_token: cli.token.clone(),
        timeout: Duration::from_secs(cli.timeout_secs),
        ..Default::default()
    })?;
    let manager = UploadManager::new(Arc::new(transport), config)?;

    let mut request = UploadRequest::new(&cli.endpoint, &cli.file_field);
    for (key, value) in &cli.fields {
        request = request.with_field(key.as_str(), value.as_str());
    }
    for path in &cli.files {
        let file = DiskFile::open(path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        request = request.with_file(file);
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling remaining transfers");
            interrupt.cancel();
        }
    });

    let results = manager.upload_with_cancel(&request, &cancel).await?;
    print_results(&results);

    if !results.is_complete() {
        std::process::exit(2);
    }
    Ok(())
}
