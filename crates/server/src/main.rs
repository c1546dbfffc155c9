use sea_orm::Database;
use status_server::AppResources;
use status_server::api::start_webserver;
use status_server::config::load_config_or_panic;
use status_server::oauth::ProfileLinker;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "status_server=info,hyper=warn,sea_orm=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install().expect("Failed to install `color_eyre::install`");

    initialize_tracing();

    // Load .env for local development, then the config file + env overrides.
    dotenvy::dotenv().ok();
    let config = Arc::new(load_config_or_panic());

    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .expect("Failed to connect to database"),
    );

    let linker = Arc::new(ProfileLinker::new(&config.oauth));

    tracing::info!(
        provider_base = ?config.oauth.provider_base,
        consumer_key = %config.oauth.consumer_key,
        "OAuth configuration"
    );

    let resources = AppResources { db, linker, config };
    start_webserver(resources).await?;
    Ok(())
}
