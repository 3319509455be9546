pub mod divisions;
pub mod matches;
pub mod stats;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}


#[cfg(test)]
mod tests {
    use super::testing::{get_json, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json(test_app(), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = get_json(test_app(), "/api/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
