pub mod aggregate;
pub mod error;
pub mod filters;
pub mod format;
pub mod handlers;
pub mod transform;
pub mod types;

use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use std::sync::Arc;

use crate::shared::state::AppState;

pub use error::ReportsError;

pub fn configure_report_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/team-overview", get(handlers::team_overview::handle_all_data))
        .route(
            "/team-overview/averages",
            get(handlers::team_overview::handle_averages),
        )
        .route(
            "/team-overview/comparison",
            get(handlers::team_overview::handle_comparison),
        )
        .route(
            "/team-overview/trend",
            get(handlers::team_overview::handle_trend),
        )
        .route(
            "/team-overview/adoption",
            get(handlers::team_overview::handle_adoption),
        )
        .route(
            "/team-overview/situation",
            get(handlers::team_overview::handle_situation),
        )
        .route(
            "/team-overview/accuracy",
            get(handlers::team_overview::handle_accuracy),
        )
        .route(
            "/team-overview/fluency",
            get(handlers::team_overview::handle_fluency),
        )
        .route(
            "/team-overview/simulation-count",
            get(handlers::team_overview::handle_simulation_count),
        )
        .route(
            "/industry-benchmarks",
            get(handlers::benchmarks::handle_skill_comparison),
        )
        .route(
            "/industry-benchmarks/detail",
            get(handlers::benchmarks::handle_detail),
        )
        .route(
            "/industry-benchmarks/adoption",
            get(handlers::benchmarks::handle_adoption),
        )
        .route(
            "/industry-benchmarks/situation",
            get(handlers::benchmarks::handle_situation),
        )
        .route(
            "/simulation-data",
            get(handlers::simulations::handle_simulation_data),
        )
        .route(
            "/call-sim-sample-data",
            get(handlers::simulations::handle_sample_data),
        )
        .route(
            "/simulation-run/:id",
            get(handlers::simulations::handle_simulation_run),
        )
        .route(
            "/id/:id",
            delete(handlers::simulations::handle_delete_assessment),
        )
        .route(
            "/presignedPutUrl",
            get(handlers::uploads::handle_presigned_put_url),
        )
        .route(
            "/:simulation_id/status",
            get(handlers::simulations::handle_assessment_status),
        )
}

/// Fallback for unmatched routes; echoes the path like the rest of the API
/// family so clients can tell a bad route from a bad request.
pub async fn handle_not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "message": "Route not found",
            "path": uri.path(),
        })),
    )
}
