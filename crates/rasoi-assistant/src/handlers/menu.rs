//! Menu mutations: availability toggles and price-change previews.

use rasoi_protocol::{
    AssistantReply, AvailabilityEntities, Intent, PriceChange, PriceModifier, PricePreview,
    PriceUpdateEntities,
};

use crate::error::AssistantResult;
use crate::service::{AssistantConfig, RequestContext};
use crate::store::Catalog;

/// Toggle availability on every item matching any of the name fragments.
///
/// Direct and idempotent: re-running with the same fragments and target
/// state matches the same items and lands in the same state.
pub async fn toggle_availability(
    ctx: &RequestContext,
    entities: &AvailabilityEntities,
    catalog: &dyn Catalog,
) -> AssistantResult<AssistantReply> {
    let fragments: Vec<String> = entities
        .items
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if fragments.is_empty() {
        return Ok(AssistantReply::clarification(
            Intent::MenuAvailabilityToggle,
            "Which items would you like to update?",
        ));
    }

    let matched = catalog
        .set_availability(ctx.restaurant_id, &fragments, entities.available)
        .await?;

    let action = if entities.available {
        "available"
    } else {
        "86'd (unavailable)"
    };

    tracing::info!(
        restaurant_id = %ctx.restaurant_id,
        count = matched.len(),
        available = entities.available,
        "availability toggled"
    );

    Ok(AssistantReply::plain(
        Intent::MenuAvailabilityToggle,
        format!(
            "Done! {} item(s) now {}: {}",
            matched.len(),
            action,
            matched.join(", ")
        ),
    ))
}

/// Compute a price-change preview. Never mutates the catalog — the change
/// list comes back through the confirm call.
pub async fn preview_price_update(
    ctx: &RequestContext,
    entities: &PriceUpdateEntities,
    catalog: &dyn Catalog,
    config: &AssistantConfig,
) -> AssistantResult<AssistantReply> {
    let target = entities.target.trim();
    if target.is_empty() {
        return Ok(AssistantReply::clarification(
            Intent::MenuPriceUpdate,
            "Which items or category should I reprice?",
        ));
    }

    let items = catalog
        .find_by_name_or_category(ctx.restaurant_id, target)
        .await?;

    if items.is_empty() {
        return Ok(AssistantReply::plain(
            Intent::MenuPriceUpdate,
            format!("Couldn't find items matching '{target}'."),
        ));
    }

    let total = items.len();
    let selected = if config.preview_cap_is_limit {
        &items[..total.min(config.preview_cap)]
    } else {
        &items[..]
    };

    let changes: Vec<PriceChange> = selected
        .iter()
        .map(|item| PriceChange {
            item_id: item.id,
            item_name: item.name.clone(),
            old_price: item.base_price,
            new_price: new_price(item.base_price, entities),
        })
        .collect();

    let change_text = if entities.is_percentage {
        format!("{}%", entities.value)
    } else {
        format!("₹{}", entities.value)
    };
    let action = match entities.modifier {
        PriceModifier::Increment => "increase",
        PriceModifier::Decrement => "decrease",
    };

    Ok(AssistantReply {
        message: format!(
            "Found {total} item(s) matching '{target}'. Ready to {action} by {change_text}:"
        ),
        intent: Intent::MenuPriceUpdate,
        requires_confirmation: true,
        preview: Some(PricePreview::price_update(changes)),
        needs_clarification: false,
    })
}

/// `old ± value`, or `old * (1 ± value/100)` for percentages, floored at 0
/// and rounded to paise.
fn new_price(old: f64, entities: &PriceUpdateEntities) -> f64 {
    let value = entities.value;
    let next = match (entities.modifier, entities.is_percentage) {
        (PriceModifier::Increment, true) => old * (1.0 + value / 100.0),
        (PriceModifier::Increment, false) => old + value,
        (PriceModifier::Decrement, true) => old * (1.0 - value / 100.0),
        (PriceModifier::Decrement, false) => old - value,
    };
    (next.max(0.0) * 100.0).round() / 100.0
}
