//! media-dl server binary

use clap::Parser;
use media_dl::{Config, ErrorDisclosure};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch media from supported video sites over HTTP
///
/// Settings are resolved in order: built-in defaults, the JSON config file,
/// then these flags (or their environment variables). A `.env` file in the
/// working directory is loaded first.
#[derive(Parser, Debug)]
#[command(name = "media-dl", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "MEDIA_DL_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "MEDIA_DL_BIND")]
    bind: Option<SocketAddr>,

    /// Directory for downloaded artifacts
    #[arg(long, env = "MEDIA_DL_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Path to the yt-dlp executable (searched in PATH when omitted)
    #[arg(long, env = "MEDIA_DL_YTDLP")]
    ytdlp_path: Option<PathBuf>,

    /// Highest video resolution to select
    #[arg(long, env = "MEDIA_DL_MAX_HEIGHT")]
    max_height: Option<u32>,

    /// Deadline for the metadata phase, in seconds
    #[arg(long, env = "MEDIA_DL_INFO_TIMEOUT")]
    info_timeout: Option<u64>,

    /// Deadline for the retrieval phase, in seconds
    #[arg(long, env = "MEDIA_DL_DOWNLOAD_TIMEOUT")]
    download_timeout: Option<u64>,

    /// How long finished artifacts are kept, in seconds (0 keeps them forever)
    #[arg(long, env = "MEDIA_DL_RETENTION")]
    retention: Option<u64>,

    /// Hide internal error detail from clients
    #[arg(long, env = "MEDIA_DL_OPAQUE_ERRORS")]
    opaque_errors: bool,

    /// Default log filter, used when RUST_LOG is unset
    #[arg(long, env = "MEDIA_DL_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "MEDIA_DL_JSON_LOGS")]
    json_logs: bool,
}

impl Cli {
    /// Overlay flags onto a loaded config
    fn apply(&self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.api.bind_address = bind;
        }
        if let Some(ref dir) = self.temp_dir {
            config.download.temp_dir = dir.clone();
        }
        if let Some(ref path) = self.ytdlp_path {
            config.extractor.ytdlp_path = Some(path.clone());
        }
        if let Some(height) = self.max_height {
            config.extractor.max_height = height;
        }
        if let Some(secs) = self.info_timeout {
            config.download.info_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.download_timeout {
            config.download.download_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.retention {
            config.download.retention = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if self.opaque_errors {
            config.error_disclosure = ErrorDisclosure::Opaque;
        }
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}

fn load_config(cli: &Cli) -> media_dl::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level, cli.json_logs) {
        eprintln!("failed to initialise logging: {}", e);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.api.bind_address,
        temp_dir = ?config.download.temp_dir,
        max_height = config.extractor.max_height,
        "media-dl starting"
    );

    match media_dl::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server exited with an error");
            ExitCode::FAILURE
        }
    }
}
