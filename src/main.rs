//! Catalog UI - Library catalog console
//!
//! Search, list, add and delete books against the catalog API.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use catalog_ui::{
    api::HttpCatalogClient,
    config::{AppConfig, LoggingConfig},
    console::Console,
    services::notifications,
    AppContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Held until exit so buffered file logs are flushed
    let _guard = init_tracing(&config.logging)?;

    tracing::info!("Starting Catalog UI v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Catalog API at {}", config.api.base_url);

    let client = HttpCatalogClient::new(&config.api).context("Failed to create API client")?;
    let (notifier, feed) = notifications::channel();
    let ctx = AppContext::new(config, Arc::new(client), notifier);

    if let Err(e) = ctx.session.refresh(ctx.catalog.as_ref()).await {
        tracing::warn!("Continuing without a known user: {}", e);
    }

    let input = BufReader::new(tokio::io::stdin());
    let mut console = Console::new(ctx, feed, input, tokio::io::stdout());
    console.run().await.context("Console I/O failed")?;

    tracing::info!("Bye");
    Ok(())
}

/// Install the tracing subscriber. Logs go to stderr unless a file is
/// configured, so they never interleave with the console output.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("catalog_ui={}", logging.level).into());

    let (writer, guard, ansi) = match &logging.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", file))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    match logging.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(writer))
            .init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(writer).with_ansi(ansi))
            .init(),
    }

    Ok(guard)
}
