//! Confirmation step for price-change previews.
//!
//! A preview never mutates anything; the caller carries its change list
//! back through this explicit second call. Cancellation has nothing to
//! roll back and is a plain acknowledgment at the API layer.

use serde_json::json;
use uuid::Uuid;

use rasoi_protocol::{ActionRecord, ApplyOutcome, PriceChangeRequest};

use crate::error::{AssistantError, AssistantResult};
use crate::service::RequestContext;
use crate::store::{Catalog, ConversationLog};

/// Apply a confirmed change list, one item at a time.
///
/// Ids that don't resolve within the caller's restaurant are skipped, not
/// fatal — the batch continues and the count reflects what actually landed.
pub async fn apply_price_changes(
    ctx: &RequestContext,
    changes: &[PriceChangeRequest],
    catalog: &dyn Catalog,
    log: &dyn ConversationLog,
) -> AssistantResult<ApplyOutcome> {
    if changes.is_empty() {
        return Err(AssistantError::EmptyChangeList);
    }

    let mut previous = Vec::new();
    let mut applied = Vec::new();

    for change in changes {
        match catalog
            .apply_price(ctx.restaurant_id, change.item_id, change.new_price)
            .await?
        {
            Some(old_price) => {
                previous.push(json!({"itemId": change.item_id, "price": old_price}));
                applied.push(json!({"itemId": change.item_id, "price": change.new_price}));
            }
            None => {
                tracing::debug!(item_id = %change.item_id, "skipping unknown item in confirm batch");
            }
        }
    }

    let updated_count = applied.len();
    if updated_count > 0 {
        log.record_action(&ActionRecord {
            id: Uuid::now_v7(),
            restaurant_id: ctx.restaurant_id,
            user_id: ctx.user_id,
            action_type: "PRICE_UPDATE".into(),
            target_entity: "MENU_ITEM".into(),
            previous_value: json!(previous),
            new_value: json!(applied),
            is_confirmed: true,
            is_reverted: false,
            created_at: chrono::Utc::now(),
        })
        .await?;
    }

    tracing::info!(
        restaurant_id = %ctx.restaurant_id,
        updated_count,
        requested = changes.len(),
        "price changes applied"
    );

    Ok(ApplyOutcome {
        updated_count,
        message: format!("Successfully updated {updated_count} item(s)."),
    })
}
