//! API route definitions and router builder.

pub mod assistant;
pub mod health;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/assistant/parse", post(assistant::parse))
        .route("/assistant/confirm", post(assistant::confirm))
        .route("/assistant/cancel", post(assistant::cancel));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppState, SAMPLE_RESTAURANT_ID, SAMPLE_USER_ID};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::with_sample_data())
    }

    async fn post_json(
        app: Router,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::post(path)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    fn parse_body(message: &str) -> serde_json::Value {
        serde_json::json!({
            "restaurant_id": SAMPLE_RESTAURANT_ID,
            "restaurant_name": "Sample Kitchen",
            "user_id": SAMPLE_USER_ID,
            "message": message,
        })
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn parse_pattern_matched_message() {
        let (status, json) = post_json(
            app(),
            "/api/v1/assistant/parse",
            parse_body("86 the lassi"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["intent"], "MENU_AVAILABILITY_TOGGLE");
        assert_eq!(json["data"]["requires_confirmation"], false);
        assert!(json["data"]["conversation_id"].is_string());
        assert!(
            json["data"]["message"]
                .as_str()
                .unwrap()
                .contains("Mango Lassi")
        );
    }

    #[tokio::test]
    async fn parse_price_update_returns_preview() {
        let (status, json) = post_json(
            app(),
            "/api/v1/assistant/parse",
            parse_body("increase starters by 10%"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["intent"], "MENU_PRICE_UPDATE");
        assert_eq!(json["data"]["requires_confirmation"], true);
        assert_eq!(json["data"]["preview"]["type"], "PRICE_UPDATE");
        assert_eq!(json["data"]["preview"]["changes"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn parse_empty_message_is_rejected() {
        let (status, json) =
            post_json(app(), "/api/v1/assistant/parse", parse_body("   ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Message is required");
    }

    #[tokio::test]
    async fn confirm_empty_change_list_is_rejected() {
        let body = serde_json::json!({
            "restaurant_id": SAMPLE_RESTAURANT_ID,
            "user_id": SAMPLE_USER_ID,
            "changes": [],
        });
        let (status, json) = post_json(app(), "/api/v1/assistant/confirm", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No changes to apply");
    }

    #[tokio::test]
    async fn confirm_applies_previewed_changes() {
        let app = app();

        let (_, parsed) = post_json(
            app.clone(),
            "/api/v1/assistant/parse",
            parse_body("increase burger by 20%"),
        )
        .await;
        let changes = parsed["data"]["preview"]["changes"].clone();

        let body = serde_json::json!({
            "restaurant_id": SAMPLE_RESTAURANT_ID,
            "user_id": SAMPLE_USER_ID,
            "changes": changes,
        });
        let (status, json) = post_json(app, "/api/v1/assistant/confirm", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["updated_count"], 1);
        assert_eq!(json["data"]["message"], "Successfully updated 1 item(s).");
    }

    #[tokio::test]
    async fn cancel_acknowledges() {
        let (status, json) = post_json(
            app(),
            "/api/v1/assistant/cancel",
            serde_json::json!({"action_id": "pending-123"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["message"], "Action cancelled.");
    }
}
