//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, without loading `.env`.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `rotation-run` binary serves
//! the same router after loading `.env`.

use api_rest::ServerSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// # Environment Variables
/// - `ROTATION_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `ROTATION_DATA_DIR`: Directory holding `requirements.yaml` and `slots/` (default: "rotation_data")
/// - `ROTATION_API_KEY`: Optional API key required on every route except `/health`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the data directory does not exist,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("rotation_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    api_rest::serve(ServerSettings::from_env()).await
}
