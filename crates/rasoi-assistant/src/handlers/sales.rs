//! Read-only sales reports.

use chrono::{Local, Timelike};

use rasoi_protocol::{AssistantReply, Intent};

use crate::error::AssistantResult;
use crate::handlers::{day_part, format_amount};
use crate::service::RequestContext;
use crate::store::SalesLedger;

const TOP_SELLERS_LIMIT: usize = 5;

/// Today's revenue/orders/covers, with the average ticket.
pub async fn today_summary(
    ctx: &RequestContext,
    ledger: &dyn SalesLedger,
) -> AssistantResult<AssistantReply> {
    let now = Local::now();
    let summary = ledger.daily_summary(ctx.restaurant_id, now.date_naive()).await?;

    let avg_ticket = if summary.order_count > 0 {
        summary.revenue / summary.order_count as f64
    } else {
        0.0
    };

    let message = format!(
        "Here's your {} update:\n\n\
         **Revenue:** ₹{}\n\
         **Orders:** {}\n\
         **Covers:** {}\n\
         **Avg Ticket:** ₹{:.2}",
        day_part(now.hour()),
        format_amount(summary.revenue),
        summary.order_count,
        summary.covers,
        avg_ticket,
    );

    Ok(AssistantReply::plain(Intent::SalesQueryToday, message))
}

/// Today's five biggest movers by quantity.
pub async fn top_sellers_report(
    ctx: &RequestContext,
    ledger: &dyn SalesLedger,
) -> AssistantResult<AssistantReply> {
    let today = Local::now().date_naive();
    let sellers = ledger
        .top_sellers(ctx.restaurant_id, today, TOP_SELLERS_LIMIT)
        .await?;

    if sellers.is_empty() {
        return Ok(AssistantReply::plain(
            Intent::TopSellers,
            "No sales data available for today yet.",
        ));
    }

    let rows: Vec<String> = sellers
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. **{}** - {} sold (₹{})",
                i + 1,
                s.name,
                s.quantity,
                format_amount(s.revenue)
            )
        })
        .collect();

    Ok(AssistantReply::plain(
        Intent::TopSellers,
        format!("**Top Sellers Today:**\n\n{}", rows.join("\n")),
    ))
}
