//! Main entry point for the Ping Service

use ping_service::{
    api,
    config::Settings,
    server::{self, AppMetadata},
    telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    telemetry::init(&settings.logging);

    let metadata = AppMetadata::from(&settings.api);
    info!(
        title = %metadata.title,
        version = %metadata.version,
        "Starting Ping Service"
    );

    // Build the router
    let api = api::routes::create_router(&settings.api.prefix);
    let app = server::build_app(&api, &metadata, &settings.docs, &settings.server)?;

    // Start the server
    let listener = server::bind(&settings.server).await?;
    server::serve(listener, app).await?;

    Ok(())
}
