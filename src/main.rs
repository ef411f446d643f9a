//! Uptime monitor binary

use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uptime_monitor::{routes, AppState, Config, MonitorController, Result};

#[derive(Debug, Parser)]
#[command(version, about = "Probe one HTTP target and chart its uptime and latency")]
struct Cli {
    /// Address the HTTP surface binds to
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    bind: String,

    /// Port the HTTP surface listens on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Override the probed URL from TARGET_URL
    #[arg(long)]
    target_url: Option<String>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

/// Filter used when neither MONITOR_LOG nor RUST_LOG is set
const DEFAULT_LOG_FILTER: &str = "info,reqwest=warn,hyper_util=warn";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    initialize_tracing(cli.log_format);

    info!("Starting uptime monitor v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid monitor configuration in environment: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(target_url) = cli.target_url {
        config.target_url = target_url;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    info!(
        "Monitor configuration - Target: {}, Interval: {}s, Timeout: {}s, Max run: {}s, Healthy status: {}",
        config.target_url,
        config.poll_interval.as_secs_f64(),
        config.probe_timeout.as_secs_f64(),
        config.max_run_duration.as_secs(),
        config.healthy_status_code
    );

    let monitor = MonitorController::new(config)?;
    let state = web::Data::new(AppState::new(monitor));

    info!("Server is live at http://{}:{}", cli.bind, cli.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((cli.bind.as_str(), cli.port))?
    .run()
    .await?;

    info!("Uptime monitor shut down");
    Ok(())
}

/// Install the tracing subscriber.
///
/// `MONITOR_LOG` takes precedence over `RUST_LOG` so the monitor's verbosity
/// can be tuned without affecting other tools sharing the environment.
fn initialize_tracing(format: LogFormat) {
    let filter_layer = ["MONITOR_LOG", "RUST_LOG"]
        .iter()
        .find_map(|var| {
            std::env::var(var)
                .ok()
                .and_then(|directives| tracing_subscriber::EnvFilter::try_new(directives).ok())
        })
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter_layer);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .json()
                    .with_current_span(true),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}
