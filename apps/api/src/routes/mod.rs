pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/exports/checklist",
            post(handlers::handle_export_checklist),
        )
        .route(
            "/api/v1/exports/game-board",
            post(handlers::handle_export_game_board),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use reqwest::Client;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::docs_client::auth::{token_endpoint, AuthError, TokenProvider, DEFAULT_TOKEN_URL};
    use crate::docs_client::{DocsConnector, DocumentService, Endpoints, GoogleConnector};
    use crate::export::fake_docs::FakeDocs;

    struct FakeConnector;

    #[async_trait]
    impl DocsConnector for FakeConnector {
        async fn connect(&self) -> Result<Arc<dyn DocumentService>, AuthError> {
            Ok(Arc::new(FakeDocs::new()))
        }
    }

    fn fake_state() -> AppState {
        AppState::new(Config::default(), Arc::new(FakeConnector))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn export_body() -> Value {
        json!({
            "courseName": "Biology",
            "unitName": "Cells",
            "sectionName": "Unit 3",
            "lessons": []
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(fake_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["service"], "printables-api");
    }

    #[tokio::test]
    async fn test_blank_section_name_is_rejected() {
        let mut body = export_body();
        body["sectionName"] = json!("   ");
        let response = build_router(fake_state())
            .oneshot(post_json("/api/v1/exports/checklist", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_credentials_is_unauthorized() {
        let tokens = TokenProvider::new(Client::new(), DEFAULT_TOKEN_URL.to_string(), None, None);
        let connector = GoogleConnector::new(Client::new(), Endpoints::default(), tokens);
        let state = AppState::new(Config::default(), Arc::new(connector));
        let response = build_router(state)
            .oneshot(post_json("/api/v1/exports/game-board", export_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refused_token_refresh_is_unauthorized() {
        let (token_url, calls) = token_endpoint::spawn(StatusCode::BAD_REQUEST).await;
        let tokens = TokenProvider::new(
            token_endpoint::client(),
            token_url,
            None,
            Some(token_endpoint::credentials()),
        );
        let connector = GoogleConnector::new(token_endpoint::client(), Endpoints::default(), tokens);
        let state = AppState::new(Config::default(), Arc::new(connector));
        let response = build_router(state)
            .oneshot(post_json("/api/v1/exports/checklist", export_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "UNAUTHORIZED");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_export_is_turned_away() {
        let state = fake_state();
        let _held = state.export_lock.lock().await;
        let response = build_router(state.clone())
            .oneshot(post_json("/api/v1/exports/checklist", export_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "EXPORT_IN_PROGRESS");
    }

    #[tokio::test]
    async fn test_unrecognised_curriculum_values_still_export() {
        let mut body = export_body();
        body["lessons"] = json!([{
            "id": "l1",
            "lessonNumber": "1",
            "name": "Ratios",
            "activities": [
                { "id": "a1", "name": "Bonus quiz", "classification": "BONUS", "type": "QUIZ" }
            ]
        }]);
        let response = build_router(fake_state())
            .oneshot(post_json("/api/v1/exports/checklist", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_exports_return_document_link() {
        for uri in ["/api/v1/exports/checklist", "/api/v1/exports/game-board"] {
            let response = build_router(fake_state())
                .oneshot(post_json(uri, export_body()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["documentId"], "doc-1");
            assert_eq!(
                body["documentUrl"],
                "https://docs.google.com/document/d/doc-1/edit"
            );
        }
    }
}
