//! Conversation, message, and audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::Intent;

/// An assistant chat session scoped to one restaurant and user.
///
/// Created on the first message when the caller supplies no session id.
/// Never deleted; the only mutation is marking it ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub user_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn new(restaurant_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            restaurant_id,
            user_id,
            is_active: true,
            created_at: Utc::now(),
            ended_at: None,
        }
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a conversation. Append-only; ordering is creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: Role,
    pub content: String,
    pub intent: Intent,
    /// Classifier confidence in [0, 1]. Pattern hits are 1.0.
    pub confidence: f64,
    /// Loose entity map as extracted (empty object when none).
    pub entities: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<serde_json::Value>,
    pub processing_time_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(conversation_id: Uuid, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            role,
            content: content.into(),
            intent: Intent::Unknown,
            confidence: 0.0,
            entities: serde_json::json!({}),
            action_taken: None,
            processing_time_ms: 0,
            created_at: Utc::now(),
        }
    }
}

/// Audit row for a mutation the assistant performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub user_id: Uuid,
    /// e.g. "PRICE_UPDATE".
    pub action_type: String,
    /// e.g. "MENU_ITEM".
    pub target_entity: String,
    pub previous_value: serde_json::Value,
    pub new_value: serde_json::Value,
    pub is_confirmed: bool,
    pub is_reverted: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_form() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""USER""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""ASSISTANT""#
        );
    }

    #[test]
    fn new_conversation_is_active() {
        let conv = Conversation::new(Uuid::now_v7(), Uuid::now_v7());
        assert!(conv.is_active);
        assert!(conv.ended_at.is_none());
    }

    #[test]
    fn new_message_defaults() {
        let msg = ChatMessage::new(Uuid::now_v7(), Role::User, "86 the lassi");
        assert_eq!(msg.intent, Intent::Unknown);
        assert_eq!(msg.confidence, 0.0);
        assert_eq!(msg.entities, serde_json::json!({}));
        assert!(msg.action_taken.is_none());
    }

    #[test]
    fn message_roundtrip() {
        let mut msg = ChatMessage::new(Uuid::now_v7(), Role::Assistant, "Done!");
        msg.intent = Intent::MenuAvailabilityToggle;
        msg.confidence = 1.0;
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.intent, Intent::MenuAvailabilityToggle);
        assert_eq!(back.role, Role::Assistant);
        assert!(!json.contains("action_taken")); // skipped when None
    }
}
