//! Shared application state for the Axum server.
//!
//! Supports two modes:
//! - **Database mode**: sqlx adapters over a `PgPool` (production).
//! - **In-memory mode**: the pipeline's memory stores (tests and
//!   development).

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use rasoi_assistant::mock::{MemoryCatalog, MemoryConversationLog, MemoryMenuItem, MemorySalesLedger};
use rasoi_assistant::store::{Catalog, ConversationLog, SalesLedger};
use rasoi_assistant::{Assistant, AssistantConfig, FallbackClassifier, GeminiClient, GeminiConfig};

use crate::db::{PgCatalog, PgConversationLog, PgSalesLedger};

/// Tenant seeded by `with_sample_data` (development without a database).
pub const SAMPLE_RESTAURANT_ID: Uuid = Uuid::from_u128(0x5a3f_0000_0000_4000_8000_000000000001);
/// User seeded by `with_sample_data`.
pub const SAMPLE_USER_ID: Uuid = Uuid::from_u128(0x5a3f_0000_0000_4000_8000_000000000002);

/// Shared application state, wrapped in `Arc` for Axum handler sharing.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool (None in test/in-memory mode).
    pub pool: Option<PgPool>,
    /// The assistant pipeline, wired to this state's stores.
    pub assistant: Arc<Assistant>,
}

impl AppState {
    /// Create state backed by a PostgreSQL pool.
    pub fn with_pool(pool: PgPool, gemini: GeminiConfig, config: AssistantConfig) -> Self {
        let assistant = Assistant::new(
            Arc::new(PgCatalog::new(pool.clone())),
            Arc::new(PgSalesLedger::new(pool.clone())),
            Arc::new(PgConversationLog::new(pool.clone())),
            Arc::new(GeminiClient::new(gemini)),
            config,
        );
        Self {
            pool: Some(pool),
            assistant: Arc::new(assistant),
        }
    }

    /// Create state over explicit stores (tests wire memory stores and a
    /// mock fallback here).
    pub fn with_stores(
        catalog: Arc<dyn Catalog>,
        sales: Arc<dyn SalesLedger>,
        log: Arc<dyn ConversationLog>,
        fallback: Arc<dyn FallbackClassifier>,
        config: AssistantConfig,
    ) -> Self {
        Self {
            pool: None,
            assistant: Arc::new(Assistant::new(catalog, sales, log, fallback, config)),
        }
    }

    /// In-memory state with a small seeded menu for development / tests.
    pub fn with_sample_data() -> Self {
        let menu = [
            ("Paneer Tikka", "Starters", 240.0),
            ("Hara Bhara Kebab", "Starters", 200.0),
            ("Veg Burger", "Mains", 180.0),
            ("Veg Biryani", "Mains", 220.0),
            ("Butter Chicken", "Mains", 320.0),
            ("Masala Dosa", "South Indian", 120.0),
            ("Mango Lassi", "Beverages", 90.0),
            ("Filter Coffee", "Beverages", 60.0),
        ];
        let items = menu
            .into_iter()
            .map(|(name, category, base_price)| MemoryMenuItem {
                id: Uuid::now_v7(),
                restaurant_id: SAMPLE_RESTAURANT_ID,
                name: name.to_string(),
                category: category.to_string(),
                base_price,
                is_available: true,
            })
            .collect();

        Self::with_stores(
            Arc::new(MemoryCatalog::with_items(items)),
            Arc::new(MemorySalesLedger::new()),
            Arc::new(MemoryConversationLog::new()),
            Arc::new(GeminiClient::new(GeminiConfig::from_env())),
            AssistantConfig::default(),
        )
    }
}
