//! Menu catalog queries.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use rasoi_assistant::AssistantResult;
use rasoi_assistant::store::Catalog;
use rasoi_protocol::CatalogItem;

use super::{like_pattern, storage_err};

/// Menu item row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    base_price: f64,
    is_available: bool,
}

impl From<ItemRow> for CatalogItem {
    fn from(row: ItemRow) -> Self {
        CatalogItem {
            id: row.id,
            name: row.name,
            base_price: row.base_price,
            is_available: row.is_available,
        }
    }
}

/// `Catalog` over PostgreSQL.
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn category_names(&self, restaurant_id: Uuid) -> AssistantResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM categories
             WHERE restaurant_id = $1 AND is_active
             ORDER BY display_order, name",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)
    }

    async fn find_by_name_or_category(
        &self,
        restaurant_id: Uuid,
        target: &str,
    ) -> AssistantResult<Vec<CatalogItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT mi.id, mi.name, mi.base_price, mi.is_available
             FROM menu_items mi
             JOIN categories c ON c.id = mi.category_id
             WHERE mi.restaurant_id = $1
               AND (mi.name ILIKE $2 OR c.name ILIKE $2)
             ORDER BY mi.display_order, mi.name",
        )
        .bind(restaurant_id)
        .bind(like_pattern(target))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_availability(
        &self,
        restaurant_id: Uuid,
        fragments: &[String],
        available: bool,
    ) -> AssistantResult<Vec<String>> {
        let patterns: Vec<String> = fragments.iter().map(|f| like_pattern(f)).collect();

        // One bulk statement so readers see the batch atomically.
        sqlx::query_scalar::<_, String>(
            "UPDATE menu_items
             SET is_available = $3, updated_at = now()
             WHERE restaurant_id = $1 AND name ILIKE ANY($2)
             RETURNING name",
        )
        .bind(restaurant_id)
        .bind(&patterns)
        .bind(available)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)
    }

    async fn apply_price(
        &self,
        restaurant_id: Uuid,
        item_id: Uuid,
        new_price: f64,
    ) -> AssistantResult<Option<f64>> {
        sqlx::query_scalar::<_, f64>(
            "UPDATE menu_items m
             SET base_price = $3, updated_at = now()
             FROM (
                 SELECT id, base_price AS old_price
                 FROM menu_items
                 WHERE id = $1 AND restaurant_id = $2
                 FOR UPDATE
             ) prev
             WHERE m.id = prev.id
             RETURNING prev.old_price",
        )
        .bind(item_id)
        .bind(restaurant_id)
        .bind(new_price)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)
    }
}
