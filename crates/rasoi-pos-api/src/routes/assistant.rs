//! Assistant endpoints: parse, confirm, cancel.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use rasoi_assistant::RequestContext;
use rasoi_protocol::PriceChangeRequest;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for parsing a manager message.
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    /// Tenant the caller is operating on.
    pub restaurant_id: Uuid,
    /// Display name, passed to the fallback model as context.
    #[serde(default)]
    pub restaurant_name: String,
    /// Who is asking.
    pub user_id: Uuid,
    /// Natural-language message text.
    pub message: String,
    /// Existing session to continue; omitted on the first message.
    pub conversation_id: Option<Uuid>,
}

/// POST /api/v1/assistant/parse — classify a message and run its handler.
pub async fn parse(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".into()));
    }

    let ctx = RequestContext {
        restaurant_id: req.restaurant_id,
        restaurant_name: req.restaurant_name,
        user_id: req.user_id,
    };

    let outcome = state
        .assistant
        .process_message(&ctx, &req.message, req.conversation_id)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": outcome,
    })))
}

/// Request body for confirming a price-change preview.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub restaurant_id: Uuid,
    pub user_id: Uuid,
    /// Opaque id from the client's pending-action bookkeeping (unused here).
    #[serde(default)]
    #[allow(dead_code)]
    pub action_id: Option<String>,
    /// The preview's change rows, carried back by the caller.
    #[serde(default)]
    pub changes: Vec<PriceChangeRequest>,
}

/// POST /api/v1/assistant/confirm — apply a previewed change list.
pub async fn confirm(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.changes.is_empty() {
        return Err(ApiError::BadRequest("No changes to apply".into()));
    }

    let ctx = RequestContext {
        restaurant_id: req.restaurant_id,
        restaurant_name: String::new(),
        user_id: req.user_id,
    };

    let outcome = state.assistant.apply_changes(&ctx, &req.changes).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": outcome,
    })))
}

/// Request body for cancelling a pending action.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub action_id: Option<String>,
}

/// POST /api/v1/assistant/cancel — acknowledge a cancellation.
///
/// Previews never mutate anything, so there is nothing to roll back.
pub async fn cancel(Json(req): Json<CancelRequest>) -> Json<serde_json::Value> {
    tracing::info!(action_id = ?req.action_id, "assistant action cancelled");
    Json(serde_json::json!({
        "success": true,
        "data": { "message": "Action cancelled." },
    }))
}
