//! Assistant reply and price-preview payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::Intent;

/// What a handler returns for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Human-readable reply text (markdown).
    pub message: String,
    /// Intent this reply answers.
    pub intent: Intent,
    /// True when the reply carries a preview that needs an explicit confirm.
    pub requires_confirmation: bool,
    /// Proposed changes awaiting confirmation (price updates only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PricePreview>,
    /// Set when the classifier could not resolve the message and the reply
    /// is a request to rephrase.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_clarification: bool,
}

impl AssistantReply {
    /// A plain informational reply, no confirmation needed.
    pub fn plain(intent: Intent, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            intent,
            requires_confirmation: false,
            preview: None,
            needs_clarification: false,
        }
    }

    /// A clarifying question back to the user.
    pub fn clarification(intent: Intent, question: impl Into<String>) -> Self {
        Self {
            message: question.into(),
            intent,
            requires_confirmation: false,
            preview: None,
            needs_clarification: true,
        }
    }
}

/// An ephemeral mutation proposal. Lives for one request/response round
/// trip; the caller carries the change list back through the confirm call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePreview {
    /// Discriminator for clients ("PRICE_UPDATE").
    #[serde(rename = "type")]
    pub kind: String,
    pub changes: Vec<PriceChange>,
}

impl PricePreview {
    pub fn price_update(changes: Vec<PriceChange>) -> Self {
        Self {
            kind: "PRICE_UPDATE".into(),
            changes,
        }
    }
}

/// One proposed per-item price change. camelCase on the wire — these rows
/// travel to the client and come back verbatim on confirm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    pub item_id: Uuid,
    pub item_name: String,
    pub old_price: f64,
    pub new_price: f64,
}

/// The subset of a `PriceChange` the confirm step needs. Deserializes from
/// a full change row (extra keys are ignored).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChangeRequest {
    pub item_id: Uuid,
    pub new_price: f64,
}

/// Result of one parsed message: the reply plus the session it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub conversation_id: Uuid,
    #[serde(flatten)]
    pub reply: AssistantReply,
}

/// Result of a confirmed batch apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub updated_count: usize,
    pub message: String,
}
