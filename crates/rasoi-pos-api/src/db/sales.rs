//! Sales aggregate queries.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use rasoi_assistant::AssistantResult;
use rasoi_assistant::store::SalesLedger;
use rasoi_protocol::{DailySales, TopSeller};

use super::storage_err;

/// `SalesLedger` over PostgreSQL.
pub struct PgSalesLedger {
    pool: PgPool,
}

impl PgSalesLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesLedger for PgSalesLedger {
    async fn daily_summary(
        &self,
        restaurant_id: Uuid,
        day: NaiveDate,
    ) -> AssistantResult<DailySales> {
        let revenue = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(total_amount), 0)
             FROM invoices
             WHERE restaurant_id = $1 AND status = 'PAID' AND generated_at::date = $2",
        )
        .bind(restaurant_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        let (order_count, covers) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COALESCE(SUM(covers), 0)::bigint
             FROM orders
             WHERE restaurant_id = $1 AND created_at::date = $2
               AND status IN ('COMPLETED', 'SERVED')",
        )
        .bind(restaurant_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(DailySales {
            revenue,
            order_count,
            covers,
        })
    }

    async fn top_sellers(
        &self,
        restaurant_id: Uuid,
        day: NaiveDate,
        limit: usize,
    ) -> AssistantResult<Vec<TopSeller>> {
        let rows = sqlx::query_as::<_, (String, i64, f64)>(
            "SELECT oi.name, SUM(oi.quantity)::bigint AS quantity,
                    COALESCE(SUM(oi.total_price), 0) AS revenue
             FROM order_items oi
             JOIN orders o ON o.id = oi.order_id
             WHERE o.restaurant_id = $1 AND o.created_at::date = $2
               AND o.status IN ('COMPLETED', 'SERVED')
             GROUP BY oi.name
             ORDER BY quantity DESC
             LIMIT $3",
        )
        .bind(restaurant_id)
        .bind(day)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows
            .into_iter()
            .map(|(name, quantity, revenue)| TopSeller {
                name,
                quantity,
                revenue,
            })
            .collect())
    }
}
