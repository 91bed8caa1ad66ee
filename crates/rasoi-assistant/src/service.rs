//! The per-message unit of work: classify, dispatch, log.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use uuid::Uuid;

use rasoi_protocol::{
    ApplyOutcome, ChatMessage, Conversation, ParseOutcome, PriceChangeRequest, Role,
};

use crate::classify::{ClassifyContext, FallbackClassifier};
use crate::error::{AssistantError, AssistantResult};
use crate::handlers;
use crate::patterns;
use crate::store::{Catalog, ConversationLog, SalesLedger};

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Maximum number of change rows in a price preview.
    #[serde(default = "default_preview_cap")]
    pub preview_cap: usize,
    /// When true (default) the cap bounds the change list itself, so only
    /// the first `preview_cap` matches are confirmable. When false the cap
    /// is display truncation: the preview carries every match.
    #[serde(default = "default_preview_cap_is_limit")]
    pub preview_cap_is_limit: bool,
}

fn default_preview_cap() -> usize {
    10
}
fn default_preview_cap_is_limit() -> bool {
    true
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            preview_cap: default_preview_cap(),
            preview_cap_is_limit: default_preview_cap_is_limit(),
        }
    }
}

impl AssistantConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let preview_cap = std::env::var("ASSISTANT_PREVIEW_CAP")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_preview_cap);
        let preview_cap_is_limit = std::env::var("ASSISTANT_PREVIEW_CAP_IS_LIMIT")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or_else(|_| default_preview_cap_is_limit());
        Self {
            preview_cap,
            preview_cap_is_limit,
        }
    }
}

/// Who is asking, and for which restaurant.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub user_id: Uuid,
}

/// The assistant pipeline, wired to its collaborators.
pub struct Assistant {
    catalog: Arc<dyn Catalog>,
    sales: Arc<dyn SalesLedger>,
    log: Arc<dyn ConversationLog>,
    fallback: Arc<dyn FallbackClassifier>,
    config: AssistantConfig,
}

impl Assistant {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        sales: Arc<dyn SalesLedger>,
        log: Arc<dyn ConversationLog>,
        fallback: Arc<dyn FallbackClassifier>,
        config: AssistantConfig,
    ) -> Self {
        Self {
            catalog,
            sales,
            log,
            fallback,
            config,
        }
    }

    /// Process one inbound message end to end.
    ///
    /// Pattern tier first; the fallback model only runs on a miss. Both the
    /// user turn and the assistant turn are appended to the conversation
    /// log; the reply itself carries any preview awaiting confirmation.
    pub async fn process_message(
        &self,
        ctx: &RequestContext,
        message: &str,
        conversation_id: Option<Uuid>,
    ) -> AssistantResult<ParseOutcome> {
        let started = Instant::now();

        let message = message.trim();
        if message.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        let conversation = self.resolve_conversation(ctx, conversation_id).await?;

        let (classification, tier) = match patterns::match_quick(message) {
            Some(c) => (c, "pattern"),
            None => {
                tracing::debug!(
                    tier = self.fallback.tier_name(),
                    "no quick pattern matched, falling back"
                );
                let classify_ctx = ClassifyContext {
                    restaurant_name: ctx.restaurant_name.clone(),
                    categories: self.catalog.category_names(ctx.restaurant_id).await?,
                };
                let c = self.fallback.classify(message, &classify_ctx).await;
                (c, self.fallback.tier_name())
            }
        };

        tracing::info!(
            restaurant_id = %ctx.restaurant_id,
            intent = %classification.intent,
            confidence = classification.confidence,
            tier,
            "message classified"
        );

        let mut user_turn = ChatMessage::new(conversation.id, Role::User, message);
        user_turn.intent = classification.intent;
        user_turn.confidence = classification.confidence;
        user_turn.entities = classification.entities.to_value();
        self.log.append_message(&user_turn).await?;

        let reply = if classification.needs_clarification {
            // The classifier itself wants more from the user; surface its
            // question (or the generic unknown reply when it has none).
            let question = classification
                .clarification_question
                .clone()
                .unwrap_or_else(|| handlers::fallback_reply(classification.intent).message);
            rasoi_protocol::AssistantReply::clarification(classification.intent, question)
        } else {
            handlers::dispatch(
                ctx,
                classification.intent,
                &classification.entities,
                self.catalog.as_ref(),
                self.sales.as_ref(),
                &self.config,
            )
            .await?
        };

        let mut assistant_turn = ChatMessage::new(conversation.id, Role::Assistant, &reply.message);
        assistant_turn.intent = classification.intent;
        assistant_turn.processing_time_ms = started.elapsed().as_millis() as i64;
        self.log.append_message(&assistant_turn).await?;

        Ok(ParseOutcome {
            conversation_id: conversation.id,
            reply,
        })
    }

    /// Apply a confirmed price-change list.
    pub async fn apply_changes(
        &self,
        ctx: &RequestContext,
        changes: &[PriceChangeRequest],
    ) -> AssistantResult<ApplyOutcome> {
        crate::apply::apply_price_changes(ctx, changes, self.catalog.as_ref(), self.log.as_ref())
            .await
    }

    /// Reuse the caller's session when it exists for this tenant, otherwise
    /// start a fresh one (also covers stale/foreign ids).
    async fn resolve_conversation(
        &self,
        ctx: &RequestContext,
        conversation_id: Option<Uuid>,
    ) -> AssistantResult<Conversation> {
        if let Some(id) = conversation_id
            && let Some(existing) = self.log.find_conversation(ctx.restaurant_id, id).await?
        {
            return Ok(existing);
        }
        self.log
            .create_conversation(ctx.restaurant_id, ctx.user_id)
            .await
    }
}
