use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::student::{repo::seaorm::SeaOrmStudentRepository, StudentService};

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;

pub mod students;

pub type Students = StudentService<SeaOrmStudentRepository>;

/// Shared router state. Both fields are cheap handles over the same pool.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub students: Arc<Students>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection) -> Self {
        let repo = Arc::new(SeaOrmStudentRepository::new(db.clone()));
        Self { db, students: Arc::new(StudentService::new(repo)) }
    }
}

/// Liveness plus a storage ping.
#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "OK", body = crate::openapi::HealthResponse),
        (status = 503, description = "Storage unreachable", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn health(State(state): State<ServerState>) -> Result<Json<Health>, JsonApiError> {
    models::db::test_connection(&state.db)
        .await
        .map_err(|e| JsonApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;
    Ok(Json(Health { status: "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn fallback() -> JsonApiError {
    JsonApiError::not_found("Route")
}

/// Build the full application router: health, OpenAPI document and `/api` student routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/student", post(students::create))
        .route("/students-list", get(students::list))
        .route(
            "/student/:id",
            get(students::get).put(students::update).delete(students::delete),
        );

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api)
        .fallback(fallback)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
