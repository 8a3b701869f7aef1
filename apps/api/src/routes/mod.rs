pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::enrichment::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Enrichment API
        .route(
            "/api/v1/profiles/enhance",
            post(handlers::handle_enhance_profile),
        )
        .route(
            "/api/v1/candidates/shortlist",
            post(handlers::handle_shortlist_candidate),
        )
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::enrichment::acquisition::{AcquisitionError, RawContent};
    use crate::enrichment::models::EnrichmentResult;
    use crate::enrichment::orchestrator::Orchestrator;
    use crate::enrichment::validator::PageHeuristics;
    use crate::test_support::{FakeDocumentSource, FakeGenerator, FakeProfileApi};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    fn app(generator: FakeGenerator) -> Router {
        let orchestrator = Orchestrator::new(
            Arc::new(generator),
            Arc::new(FakeDocumentSource::returning(Ok(RawContent::new(
                "too short".to_string(),
                None,
            )))),
            Arc::new(FakeProfileApi::returning(Err(AcquisitionError::api(
                Some(404),
                "GitHub API error for user profile: 404 Not Found",
            )))),
            PageHeuristics::default(),
            "github.com".to_string(),
        );
        build_router(AppState {
            orchestrator: Arc::new(orchestrator),
        })
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_result(response: axum::response::Response) -> EnrichmentResult {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(FakeGenerator::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_enhance_falls_back_to_dashboard_skills() {
        let generator = FakeGenerator::replying(vec![Ok(json!({
            "bioSuggestion": "I build distributed systems.",
            "skillSuggestions": ["Go", "Rust", "Erlang"]
        }))]);

        let response = app(generator)
            .oneshot(post_json(
                "/api/v1/profiles/enhance",
                json!({
                    "profileUrl": "https://github.com/octocat",
                    "dashboardSkills": ["Go", "Rust"]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result = read_result(response).await;
        assert_eq!(result.skill_suggestions, vec!["Go", "Rust"]);
        assert_eq!(result.analyzed_username.as_deref(), Some("octocat"));
    }

    #[tokio::test]
    async fn test_shortlist_unknown_user_is_explained_not_errored() {
        let response = app(FakeGenerator::default())
            .oneshot(post_json(
                "/api/v1/candidates/shortlist",
                json!({ "profileUrl": "https://github.com/ghost" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result = read_result(response).await;
        assert!(result.bio_suggestion.contains("could not be found"));
        assert!(result.skill_suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_url_is_explained_not_errored() {
        let response = app(FakeGenerator::default())
            .oneshot(post_json(
                "/api/v1/candidates/shortlist",
                json!({ "profileUrl": "https://example.com/x" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result = read_result(response).await;
        assert!(result.bio_suggestion.starts_with("Invalid GitHub profile URL"));
        assert_eq!(result.analyzed_username.as_deref(), Some("https://example.com/x"));
    }

    #[tokio::test]
    async fn test_missing_profile_url_is_bad_request() {
        let response = app(FakeGenerator::default())
            .oneshot(post_json(
                "/api/v1/profiles/enhance",
                json!({ "dashboardSkills": ["Go"] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app(FakeGenerator::default())
            .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
