//! In-memory store implementations for tests and database-less mode.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use rasoi_protocol::{
    ActionRecord, CatalogItem, ChatMessage, Conversation, DailySales, TopSeller,
};

use crate::classify::{Classification, ClassifyContext, FallbackClassifier};
use crate::error::AssistantResult;
use crate::store::{Catalog, ConversationLog, SalesLedger};

/// A menu row as the in-memory catalog keeps it.
#[derive(Debug, Clone)]
pub struct MemoryMenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub category: String,
    pub base_price: f64,
    pub is_available: bool,
}

/// In-memory `Catalog` backed by a `RwLock<Vec<_>>`.
#[derive(Default)]
pub struct MemoryCatalog {
    items: RwLock<Vec<MemoryMenuItem>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<MemoryMenuItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub async fn insert_item(
        &self,
        restaurant_id: Uuid,
        name: &str,
        category: &str,
        base_price: f64,
    ) -> Uuid {
        let id = Uuid::now_v7();
        self.items.write().await.push(MemoryMenuItem {
            id,
            restaurant_id,
            name: name.to_string(),
            category: category.to_string(),
            base_price,
            is_available: true,
        });
        id
    }

    /// Snapshot of one item, for assertions.
    pub async fn item(&self, id: Uuid) -> Option<MemoryMenuItem> {
        self.items.read().await.iter().find(|i| i.id == id).cloned()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn category_names(&self, restaurant_id: Uuid) -> AssistantResult<Vec<String>> {
        let items = self.items.read().await;
        let mut names: Vec<String> = Vec::new();
        for item in items.iter().filter(|i| i.restaurant_id == restaurant_id) {
            if !names.contains(&item.category) {
                names.push(item.category.clone());
            }
        }
        Ok(names)
    }

    async fn find_by_name_or_category(
        &self,
        restaurant_id: Uuid,
        target: &str,
    ) -> AssistantResult<Vec<CatalogItem>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|i| {
                i.restaurant_id == restaurant_id
                    && (contains_ci(&i.name, target) || contains_ci(&i.category, target))
            })
            .map(|i| CatalogItem {
                id: i.id,
                name: i.name.clone(),
                base_price: i.base_price,
                is_available: i.is_available,
            })
            .collect())
    }

    async fn set_availability(
        &self,
        restaurant_id: Uuid,
        fragments: &[String],
        available: bool,
    ) -> AssistantResult<Vec<String>> {
        let mut items = self.items.write().await;
        let mut matched = Vec::new();
        for item in items.iter_mut().filter(|i| i.restaurant_id == restaurant_id) {
            if fragments.iter().any(|f| contains_ci(&item.name, f)) {
                item.is_available = available;
                matched.push(item.name.clone());
            }
        }
        Ok(matched)
    }

    async fn apply_price(
        &self,
        restaurant_id: Uuid,
        item_id: Uuid,
        new_price: f64,
    ) -> AssistantResult<Option<f64>> {
        let mut items = self.items.write().await;
        for item in items.iter_mut() {
            if item.id == item_id && item.restaurant_id == restaurant_id {
                let old = item.base_price;
                item.base_price = new_price;
                return Ok(Some(old));
            }
        }
        Ok(None)
    }
}

/// In-memory `SalesLedger`: aggregates are set directly by tests/seeding.
#[derive(Default)]
pub struct MemorySalesLedger {
    summaries: RwLock<HashMap<(Uuid, NaiveDate), DailySales>>,
    sellers: RwLock<HashMap<(Uuid, NaiveDate), Vec<TopSeller>>>,
}

impl MemorySalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_summary(&self, restaurant_id: Uuid, day: NaiveDate, summary: DailySales) {
        self.summaries
            .write()
            .await
            .insert((restaurant_id, day), summary);
    }

    pub async fn set_top_sellers(
        &self,
        restaurant_id: Uuid,
        day: NaiveDate,
        sellers: Vec<TopSeller>,
    ) {
        self.sellers.write().await.insert((restaurant_id, day), sellers);
    }
}

#[async_trait]
impl SalesLedger for MemorySalesLedger {
    async fn daily_summary(
        &self,
        restaurant_id: Uuid,
        day: NaiveDate,
    ) -> AssistantResult<DailySales> {
        Ok(self
            .summaries
            .read()
            .await
            .get(&(restaurant_id, day))
            .copied()
            .unwrap_or_default())
    }

    async fn top_sellers(
        &self,
        restaurant_id: Uuid,
        day: NaiveDate,
        limit: usize,
    ) -> AssistantResult<Vec<TopSeller>> {
        let sellers = self.sellers.read().await;
        let mut rows = sellers
            .get(&(restaurant_id, day))
            .cloned()
            .unwrap_or_default();
        rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        rows.truncate(limit);
        Ok(rows)
    }
}

/// In-memory `ConversationLog` with accessors for assertions.
#[derive(Default)]
pub struct MemoryConversationLog {
    conversations: RwLock<HashMap<Uuid, Conversation>>,
    messages: RwLock<Vec<ChatMessage>>,
    actions: RwLock<Vec<ActionRecord>>,
}

impl MemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    pub async fn actions(&self) -> Vec<ActionRecord> {
        self.actions.read().await.clone()
    }
}

#[async_trait]
impl ConversationLog for MemoryConversationLog {
    async fn find_conversation(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> AssistantResult<Option<Conversation>> {
        Ok(self
            .conversations
            .read()
            .await
            .get(&id)
            .filter(|c| c.restaurant_id == restaurant_id)
            .cloned())
    }

    async fn create_conversation(
        &self,
        restaurant_id: Uuid,
        user_id: Uuid,
    ) -> AssistantResult<Conversation> {
        let conversation = Conversation::new(restaurant_id, user_id);
        self.conversations
            .write()
            .await
            .insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn append_message(&self, message: &ChatMessage) -> AssistantResult<()> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn record_action(&self, action: &ActionRecord) -> AssistantResult<()> {
        self.actions.write().await.push(action.clone());
        Ok(())
    }
}

/// Fallback classifier that returns a canned result (or the degraded one).
pub struct MockFallback {
    result: Option<Classification>,
}

impl MockFallback {
    /// Always answer with the given classification.
    pub fn hit(result: Classification) -> Self {
        Self {
            result: Some(result),
        }
    }

    /// Always degrade, as an unreachable/unconfigured model would.
    pub fn miss() -> Self {
        Self { result: None }
    }
}

#[async_trait]
impl FallbackClassifier for MockFallback {
    async fn classify(&self, _text: &str, _ctx: &ClassifyContext) -> Classification {
        self.result
            .clone()
            .unwrap_or_else(|| Classification::degraded(None))
    }

    fn tier_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn catalog_matches_name_or_category() {
        let catalog = MemoryCatalog::new();
        let rid = Uuid::now_v7();
        catalog.insert_item(rid, "Veg Burger", "Mains", 180.0).await;
        catalog.insert_item(rid, "Paneer Tikka", "Starters", 240.0).await;
        catalog.insert_item(rid, "Hara Bhara Kebab", "Starters", 200.0).await;

        let by_name = catalog.find_by_name_or_category(rid, "burger").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Veg Burger");

        let by_category = catalog.find_by_name_or_category(rid, "starters").await.unwrap();
        assert_eq!(by_category.len(), 2);
    }

    #[tokio::test]
    async fn catalog_scopes_by_restaurant() {
        let catalog = MemoryCatalog::new();
        let rid_a = Uuid::now_v7();
        let rid_b = Uuid::now_v7();
        catalog.insert_item(rid_a, "Mango Lassi", "Beverages", 90.0).await;
        catalog.insert_item(rid_b, "Mango Lassi", "Beverages", 110.0).await;

        let matched = catalog
            .set_availability(rid_a, &["lassi".into()], false)
            .await
            .unwrap();
        assert_eq!(matched, vec!["Mango Lassi".to_string()]);

        let other = catalog.find_by_name_or_category(rid_b, "lassi").await.unwrap();
        assert!(other[0].is_available, "other tenant untouched");
    }

    #[tokio::test]
    async fn apply_price_returns_old_and_misses_unknown() {
        let catalog = MemoryCatalog::new();
        let rid = Uuid::now_v7();
        let id = catalog.insert_item(rid, "Filter Coffee", "Beverages", 60.0).await;

        let old = catalog.apply_price(rid, id, 70.0).await.unwrap();
        assert_eq!(old, Some(60.0));
        assert_eq!(catalog.item(id).await.unwrap().base_price, 70.0);

        let missing = catalog.apply_price(rid, Uuid::now_v7(), 10.0).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn sales_default_to_empty_day() {
        let ledger = MemorySalesLedger::new();
        let rid = Uuid::now_v7();
        let day = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();

        let summary = ledger.daily_summary(rid, day).await.unwrap();
        assert_eq!(summary.order_count, 0);
        assert!(ledger.top_sellers(rid, day, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn conversation_lookup_is_tenant_scoped() {
        let log = MemoryConversationLog::new();
        let rid = Uuid::now_v7();
        let conv = log.create_conversation(rid, Uuid::now_v7()).await.unwrap();

        assert!(log.find_conversation(rid, conv.id).await.unwrap().is_some());
        assert!(
            log.find_conversation(Uuid::now_v7(), conv.id)
                .await
                .unwrap()
                .is_none(),
            "wrong tenant must not see the conversation"
        );
    }
}
