use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qr_image_server::{
    cache::RequestCache, compositor::Compositor, config::Config, services::ImageService,
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "qr-image-server")]
#[command(version)]
#[command(about = "Serves QR code PNG images with an optional center icon")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path [default: $CONFIG_FILE, then config.toml]
    #[arg(short, long)]
    config: Option<String>,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.log_level == "trace" {
        format!("qr_image_server={},tower_http=trace", cli.log_level)
    } else {
        format!("qr_image_server={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting QR Image Server v{}", env!("CARGO_PKG_VERSION"));

    let config_path = Config::resolve_path(cli.config);
    let mut config = Config::load_from_file(&config_path)?;
    info!("Configuration loaded from: {}", config_path);

    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    let compositor = Compositor::from_config(&config)?;
    let cache = RequestCache::new();

    match config.cache.sweep_interval_duration()? {
        Some(interval) => {
            tokio::spawn(cache.clone().run_sweeper(interval));
        }
        None => info!("Request cache sweeper disabled"),
    }

    let image_service = ImageService::new(compositor, cache);
    let web_server = WebServer::new(config, image_service)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );

    let (server_ready_tx, server_ready_rx) = tokio::sync::oneshot::channel();
    let server_handle = tokio::spawn(web_server.serve_with_signal(server_ready_tx));

    match server_ready_rx.await {
        Ok(Ok(())) => info!("Web server is now listening"),
        Ok(Err(bind_error)) => {
            tracing::error!("Failed to bind web server: {}", bind_error);
            return Err(bind_error);
        }
        Err(_) => {
            tracing::error!("Web server task completed without signaling");
            return Err(anyhow::anyhow!("Web server failed to start"));
        }
    }

    server_handle.await??;
    info!("Web server stopped");
    Ok(())
}
