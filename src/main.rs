use api_rest::ServerSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the rotation scheduler.
///
/// Loads `.env` when present, then serves the REST API (with Swagger UI at `/swagger-ui`).
///
/// # Environment Variables
/// - `ROTATION_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `ROTATION_DATA_DIR`: Directory holding `requirements.yaml` and `slots/` (default: "rotation_data")
/// - `ROTATION_API_KEY`: Optional API key required on every route except `/health`
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rotation_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("rotation_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ServerSettings::from_env();
    tracing::info!("++ Starting rotation scheduler on {}", settings.addr);

    api_rest::serve(settings).await
}
