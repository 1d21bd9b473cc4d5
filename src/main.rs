use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use er_finder::bot::BotContext;
use er_finder::catalog::FacilityCatalog;
use er_finder::config::AppConfig;
use er_finder::line::LineClient;
use er_finder::localization::Localization;
use er_finder::query::QueryInterpreter;
use er_finder::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting emergency department finder bot");

    let config = AppConfig::from_env()?;

    // A missing dataset degrades to an empty catalog
    let catalog = FacilityCatalog::load_or_empty(&config.data_path);
    let texts = Localization::new(config.language.as_deref())?;
    info!(language = texts.language(), records = catalog.len(), "Bot context ready");

    let bot = BotContext::new(
        catalog,
        QueryInterpreter::new(config.query_keywords()),
        texts,
    );
    let sender = LineClient::new(
        config.channel_access_token.clone(),
        config.line_api_base.clone(),
    );
    let app = server::router(AppState::new(bot, Arc::new(sender), &config.channel_secret));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Listening for webhook calls");
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` controls filtering; `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("er_finder=info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
