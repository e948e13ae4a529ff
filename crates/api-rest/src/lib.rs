//! # API REST
//!
//! REST API for the rotation scheduler.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, API-key checks)
//!
//! Uses `api-shared` for DTOs and `rotation-core` for all scheduling behaviour.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;
pub mod settings;

pub use error::ApiError;
pub use settings::ServerSettings;

use api_shared::auth::{validate_api_key, API_KEY_HEADER};
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use rotation_core::{CoreConfig, FileRequirementsStore, FileSlotStore, SchedulingService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// The scheduling service wired to the file-backed stores.
pub type FileSchedulingService = SchedulingService<FileRequirementsStore, FileSlotStore>;

/// Application state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) service: Arc<FileSchedulingService>,
    api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(cfg: &CoreConfig, api_key: Option<String>) -> Self {
        Self {
            service: Arc::new(SchedulingService::new(
                FileRequirementsStore::new(cfg),
                FileSlotStore::new(cfg),
            )),
            api_key: api_key.map(Arc::from),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::preview_schedule,
        handlers::commit_schedule,
        handlers::list_slots,
        handlers::list_requirements,
        handlers::list_departments,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ErrorRes,
        api_shared::GenerateScheduleReq,
        api_shared::GenerateScheduleRes,
        api_shared::ProposedSlotDto,
        api_shared::DepartmentAllocationDto,
        api_shared::CommitScheduleRes,
        api_shared::ScheduleSlotDto,
        api_shared::ListSlotsRes,
        api_shared::RequirementDto,
        api_shared::ListRequirementsRes,
        api_shared::DepartmentDto,
        api_shared::ListDepartmentsRes,
    ))
)]
pub struct ApiDoc;

async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    validate_api_key(state.api_key.as_deref(), provided)?;
    Ok(next.run(request).await)
}

/// Builds the full router. `/health` and the Swagger UI are open; everything else is behind
/// the API-key check when a key is configured.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/schedules/preview", post(handlers::preview_schedule))
        .route("/schedules/commit", post(handlers::commit_schedule))
        .route("/slots", get(handlers::list_slots))
        .route("/requirements/:cohort", get(handlers::list_requirements))
        .route("/departments", get(handlers::list_departments))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolves configuration and serves the API until the listener fails.
///
/// # Errors
///
/// Returns an error if:
/// - the data directory does not exist,
/// - the server address cannot be bound,
/// - the HTTP server fails while running.
pub async fn serve(settings: ServerSettings) -> anyhow::Result<()> {
    let cfg = CoreConfig::new(settings.data_dir.clone())?;
    let state = AppState::new(&cfg, settings.api_key.clone());

    tracing::info!(
        "-- Starting rotation REST API on {} (data: {}, api key {})",
        settings.addr,
        cfg.data_dir().display(),
        if settings.api_key.is_some() { "required" } else { "not required" }
    );

    let listener = tokio::net::TcpListener::bind(&settings.addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
