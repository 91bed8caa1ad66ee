//! Conversation log and action audit queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use rasoi_assistant::AssistantResult;
use rasoi_assistant::store::ConversationLog;
use rasoi_protocol::{ActionRecord, ChatMessage, Conversation, Role};

use super::storage_err;

/// Conversation row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    restaurant_id: Uuid,
    user_id: Uuid,
    is_active: bool,
    created_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Conversation {
            id: row.id,
            restaurant_id: row.restaurant_id,
            user_id: row.user_id,
            is_active: row.is_active,
            created_at: row.created_at,
            ended_at: row.ended_at,
        }
    }
}

/// `ConversationLog` over PostgreSQL.
pub struct PgConversationLog {
    pool: PgPool,
}

impl PgConversationLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn role_str(role: Role) -> &'static str {
    match role {
        Role::User => "USER",
        Role::Assistant => "ASSISTANT",
    }
}

#[async_trait]
impl ConversationLog for PgConversationLog {
    async fn find_conversation(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> AssistantResult<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            "SELECT id, restaurant_id, user_id, is_active, created_at, ended_at
             FROM ai_conversations
             WHERE id = $1 AND restaurant_id = $2",
        )
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(Into::into))
    }

    async fn create_conversation(
        &self,
        restaurant_id: Uuid,
        user_id: Uuid,
    ) -> AssistantResult<Conversation> {
        let conversation = Conversation::new(restaurant_id, user_id);
        sqlx::query(
            "INSERT INTO ai_conversations (id, restaurant_id, user_id, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(conversation.id)
        .bind(conversation.restaurant_id)
        .bind(conversation.user_id)
        .bind(conversation.is_active)
        .bind(conversation.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(conversation)
    }

    async fn append_message(&self, message: &ChatMessage) -> AssistantResult<()> {
        sqlx::query(
            "INSERT INTO ai_messages (id, conversation_id, role, content, intent, confidence,
                                      entities, action_taken, processing_time_ms, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(role_str(message.role))
        .bind(&message.content)
        .bind(message.intent.as_str())
        .bind(message.confidence)
        .bind(&message.entities)
        .bind(&message.action_taken)
        .bind(message.processing_time_ms)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn record_action(&self, action: &ActionRecord) -> AssistantResult<()> {
        sqlx::query(
            "INSERT INTO ai_actions (id, restaurant_id, user_id, action_type, target_entity,
                                     previous_value, new_value, is_confirmed, is_reverted, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(action.id)
        .bind(action.restaurant_id)
        .bind(action.user_id)
        .bind(&action.action_type)
        .bind(&action.target_entity)
        .bind(&action.previous_value)
        .bind(&action.new_value)
        .bind(action.is_confirmed)
        .bind(action.is_reverted)
        .bind(action.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }
}
