//! Shared test harness for E2E integration tests.
//!
//! Wires the real router over the pipeline's in-memory stores so tests
//! exercise actual code paths across crate boundaries.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use rasoi_assistant::classify::FallbackClassifier;
use rasoi_assistant::mock::{MemoryCatalog, MemoryConversationLog, MemorySalesLedger, MockFallback};
use rasoi_assistant::AssistantConfig;
use rasoi_pos_api::routes::build_router;
use rasoi_pos_api::state::AppState;

/// End-to-end harness: HTTP in via `tower::oneshot`, assertions against the
/// shared in-memory stores.
pub struct TestHarness {
    pub router: Router,
    pub catalog: Arc<MemoryCatalog>,
    pub sales: Arc<MemorySalesLedger>,
    pub log: Arc<MemoryConversationLog>,
    pub restaurant_id: Uuid,
    pub user_id: Uuid,
}

impl TestHarness {
    /// Harness with a small seeded menu and a fallback that always misses.
    pub async fn with_sample_menu() -> Self {
        Self::with_fallback(Arc::new(MockFallback::miss())).await
    }

    /// Harness with the given fallback classifier (mock or wiremock-backed
    /// Gemini client).
    pub async fn with_fallback(fallback: Arc<dyn FallbackClassifier>) -> Self {
        let restaurant_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();

        let catalog = Arc::new(MemoryCatalog::new());
        for (name, category, price) in [
            ("Paneer Tikka", "Starters", 240.0),
            ("Hara Bhara Kebab", "Starters", 200.0),
            ("Veg Burger", "Mains", 180.0),
            ("Mango Lassi", "Beverages", 90.0),
        ] {
            catalog.insert_item(restaurant_id, name, category, price).await;
        }

        let sales = Arc::new(MemorySalesLedger::new());
        let log = Arc::new(MemoryConversationLog::new());

        let state = AppState::with_stores(
            catalog.clone(),
            sales.clone(),
            log.clone(),
            fallback,
            AssistantConfig::default(),
        );

        Self {
            router: build_router(state),
            catalog,
            sales,
            log,
            restaurant_id,
            user_id,
        }
    }

    /// POST /api/v1/assistant/parse. Returns (status, response JSON).
    pub async fn parse(&self, message: &str) -> (StatusCode, serde_json::Value) {
        self.parse_in_conversation(message, None).await
    }

    pub async fn parse_in_conversation(
        &self,
        message: &str,
        conversation_id: Option<Uuid>,
    ) -> (StatusCode, serde_json::Value) {
        let mut body = serde_json::json!({
            "restaurant_id": self.restaurant_id,
            "restaurant_name": "Spice Route",
            "user_id": self.user_id,
            "message": message,
        });
        if let Some(id) = conversation_id {
            body["conversation_id"] = serde_json::json!(id);
        }
        self.post("/api/v1/assistant/parse", body).await
    }

    /// POST /api/v1/assistant/confirm with the given change rows.
    pub async fn confirm(&self, changes: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({
            "restaurant_id": self.restaurant_id,
            "user_id": self.user_id,
            "changes": changes,
        });
        self.post("/api/v1/assistant/confirm", body).await
    }

    /// POST /api/v1/assistant/cancel.
    pub async fn cancel(&self, action_id: &str) -> (StatusCode, serde_json::Value) {
        self.post(
            "/api/v1/assistant/cancel",
            serde_json::json!({"action_id": action_id}),
        )
        .await
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
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

    /// Current price of the named item, from the shared catalog.
    pub async fn price_of(&self, item_id: Uuid) -> f64 {
        self.catalog.item(item_id).await.unwrap().base_price
    }
}
