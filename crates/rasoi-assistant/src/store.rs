//! Storage contracts the pipeline reads and writes through.
//!
//! The handlers never touch a database directly — they go through these
//! traits. Production wires Postgres adapters; tests and the sample-data
//! mode wire the in-memory implementations from `mock`.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use rasoi_protocol::{
    ActionRecord, CatalogItem, ChatMessage, Conversation, DailySales, TopSeller,
};

use crate::error::AssistantResult;

/// Menu catalog lookups and the two bulk mutations the assistant performs.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Names of the restaurant's active categories (fallback-model context).
    async fn category_names(&self, restaurant_id: Uuid) -> AssistantResult<Vec<String>>;

    /// Items whose name or category name contains `target`,
    /// case-insensitively, scoped to the restaurant.
    async fn find_by_name_or_category(
        &self,
        restaurant_id: Uuid,
        target: &str,
    ) -> AssistantResult<Vec<CatalogItem>>;

    /// Set availability on every item whose name contains any of the
    /// fragments (one bulk write). Returns the matched item names.
    async fn set_availability(
        &self,
        restaurant_id: Uuid,
        fragments: &[String],
        available: bool,
    ) -> AssistantResult<Vec<String>>;

    /// Set one item's price verbatim. Returns the previous price, or `None`
    /// when the id doesn't exist for this restaurant.
    async fn apply_price(
        &self,
        restaurant_id: Uuid,
        item_id: Uuid,
        new_price: f64,
    ) -> AssistantResult<Option<f64>>;
}

/// Read-only sales aggregates.
#[async_trait]
pub trait SalesLedger: Send + Sync {
    /// Paid-invoice revenue plus completed/served order count and covers
    /// for one calendar day.
    async fn daily_summary(
        &self,
        restaurant_id: Uuid,
        day: NaiveDate,
    ) -> AssistantResult<DailySales>;

    /// Order lines of completed/served orders for the day, grouped by item
    /// name, descending by quantity.
    async fn top_sellers(
        &self,
        restaurant_id: Uuid,
        day: NaiveDate,
        limit: usize,
    ) -> AssistantResult<Vec<TopSeller>>;
}

/// Append-only conversation log and mutation audit.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    async fn find_conversation(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> AssistantResult<Option<Conversation>>;

    async fn create_conversation(
        &self,
        restaurant_id: Uuid,
        user_id: Uuid,
    ) -> AssistantResult<Conversation>;

    async fn append_message(&self, message: &ChatMessage) -> AssistantResult<()>;

    async fn record_action(&self, action: &ActionRecord) -> AssistantResult<()>;
}
