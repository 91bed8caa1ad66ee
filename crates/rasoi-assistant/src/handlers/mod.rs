//! Intent handlers and the dispatch table.
//!
//! Dispatch is a side-effect-free match over the closed intent set; all
//! side effects live in the individual handlers. Intents without a handler
//! (including `Unknown`) get the generic fallback reply.

pub mod menu;
pub mod sales;
pub mod smalltalk;

use rasoi_protocol::{AssistantReply, Entities, Intent};

use crate::error::AssistantResult;
use crate::service::{AssistantConfig, RequestContext};
use crate::store::{Catalog, SalesLedger};

/// Route a classified message to its handler.
pub async fn dispatch(
    ctx: &RequestContext,
    intent: Intent,
    entities: &Entities,
    catalog: &dyn Catalog,
    ledger: &dyn SalesLedger,
    config: &AssistantConfig,
) -> AssistantResult<AssistantReply> {
    match intent {
        Intent::MenuAvailabilityToggle => {
            let ents = match entities {
                Entities::Availability(e) => e.clone(),
                _ => Default::default(),
            };
            menu::toggle_availability(ctx, &ents, catalog).await
        }
        Intent::MenuPriceUpdate => {
            let ents = match entities {
                Entities::PriceUpdate(e) => e.clone(),
                _ => Default::default(),
            };
            menu::preview_price_update(ctx, &ents, catalog, config).await
        }
        Intent::SalesQueryToday => sales::today_summary(ctx, ledger).await,
        Intent::TopSellers => sales::top_sellers_report(ctx, ledger).await,
        Intent::Greeting => Ok(smalltalk::greeting()),
        Intent::Help => Ok(smalltalk::help()),
        // No handler mapped — TableList and MenuSearch are classifiable but
        // unanswered, same as Unknown.
        Intent::TableList | Intent::MenuSearch | Intent::Unknown => Ok(fallback_reply(intent)),
    }
}

/// The generic answer for intents without a handler.
pub fn fallback_reply(intent: Intent) -> AssistantReply {
    AssistantReply::plain(
        intent,
        "I couldn't understand that. Try asking me to update prices, \
         mark items available/unavailable, or check today's sales.",
    )
}

/// Time-of-day bucket: morning < 12:00, afternoon < 17:00, evening after.
pub(crate) fn day_part(hour: u32) -> &'static str {
    if hour < 12 {
        "morning"
    } else if hour < 17 {
        "afternoon"
    } else {
        "evening"
    }
}

/// `42350.5` → `"42,350.50"`. Rupee amounts in replies are grouped.
pub(crate) fn format_amount(amount: f64) -> String {
    let formatted = format!("{amount:.2}");
    let (int_part, dec_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let negative = int_part.starts_with('-');
    let digits = int_part.trim_start_matches('-');

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{grouped}.{dec_part}", if negative { "-" } else { "" })
}
