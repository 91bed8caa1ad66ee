//! Catalog and sales projections the handlers read.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The slice of a menu item the pipeline needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Uuid,
    pub name: String,
    pub base_price: f64,
    pub is_available: bool,
}

/// Aggregates over one calendar day of business.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DailySales {
    /// Sum of paid invoice totals.
    pub revenue: f64,
    /// Completed/served order count.
    pub order_count: i64,
    /// Sum of covers across those orders.
    pub covers: i64,
}

/// One row of the top-sellers report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopSeller {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_sales_defaults_to_zero() {
        let sales = DailySales::default();
        assert_eq!(sales.revenue, 0.0);
        assert_eq!(sales.order_count, 0);
        assert_eq!(sales.covers, 0);
    }
}
