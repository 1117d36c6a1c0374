pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::fallback::fallback_result;
    use crate::analysis::orchestrator::{AnalysisOrchestrator, AnalysisSettings};
    use crate::llm_client::mock::MockProvider;
    use crate::llm_client::{ProviderAdapter, ProviderError};

    const CONTENT: &str = "Payroll administrator: collect timesheets, run payroll in the HR system, \
        answer employee pay queries and prepare quarterly tax filings.";

    fn router_with(provider: Result<Arc<dyn ProviderAdapter>, ProviderError>) -> Router {
        let settings = AnalysisSettings {
            max_retries: 0,
            ..AnalysisSettings::default()
        };
        build_router(AppState {
            analyzer: Arc::new(AnalysisOrchestrator::new(provider, settings)),
        })
    }

    fn analyze_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn mock(provider: MockProvider) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
        let provider: Arc<dyn ProviderAdapter> = Arc::new(provider);
        Ok(provider)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = router_with(mock(MockProvider::new()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_analyze_returns_normalized_result() {
        let provider = MockProvider::new()
            .then_reply(
                r#"{"tasks": [
                    {"title": "Collect timesheets", "category": "Automate", "score": 88},
                    {"title": "Answer pay queries", "category": "AI-Copilot", "score": 60}
                ]}"#,
            )
            .then_reply("Payroll admin is highly automatable.");
        let response = router_with(mock(provider))
            .oneshot(analyze_request(json!({"documentType": "enterprise", "content": CONTENT})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["summary"]["total"], 2);
        assert_eq!(body["summary"]["automationPotentialPercent"], 100);
        assert_eq!(body["tasks"][0]["id"], "task-1");
        assert_eq!(body["narrativeSummary"], "Payroll admin is highly automatable.");
    }

    #[tokio::test]
    async fn test_analyze_with_unavailable_provider_still_succeeds() {
        let response = router_with(Err(ProviderError::Unavailable {
            provider: "openai",
            reason: "OPENAI_API_KEY is not set".to_string(),
        }))
        .oneshot(analyze_request(json!({"documentType": "personal", "content": CONTENT})))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::to_value(fallback_result()).unwrap());
    }

    #[tokio::test]
    async fn test_analyze_rejects_short_content() {
        let provider = MockProvider::new();
        let response = router_with(mock(provider.clone()))
            .oneshot(analyze_request(json!({"documentType": "personal", "content": "Too short"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_rejects_unknown_document_type() {
        let response = router_with(mock(MockProvider::new()))
            .oneshot(analyze_request(json!({"documentType": "team", "content": CONTENT})))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = router_with(mock(MockProvider::new()))
            .oneshot(Request::builder().uri("/api/v1/resumes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }
}
