//! Aggregation over an in-memory item snapshot.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::report::ReportItem;

/// Delivery index assumed for items not scoped to a delivery location.
pub const DEFAULT_DELIVERY_INDEX: i32 = 1;

/// Totals printed in a report's summary block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    /// Sum of item quantities.
    pub total_quantity: i64,
    /// Number of distinct category labels.
    pub category_count: usize,
    /// Items in poor or damaged condition.
    pub damaged_count: usize,
    /// Sum of item values; missing values count as zero.
    pub total_value: f64,
    pub fragile_count: usize,
}

impl InventorySummary {
    pub fn from_items(items: &[ReportItem]) -> Self {
        let categories: HashSet<&str> = items.iter().map(|i| i.category.as_str()).collect();

        Self {
            total_quantity: items.iter().map(|i| i64::from(i.quantity)).sum(),
            category_count: categories.len(),
            damaged_count: items.iter().filter(|i| i.condition.is_damaged()).count(),
            total_value: items.iter().map(|i| i.item_value.unwrap_or(0.0)).sum(),
            fragile_count: items.iter().filter(|i| i.fragile).count(),
        }
    }
}

/// Item quantities per delivery location plus the job-wide total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryTotals {
    pub per_delivery: BTreeMap<i32, i64>,
    pub total: i64,
}

impl DeliveryTotals {
    /// Quantity booked against the given 1-based delivery index.
    pub fn for_delivery(&self, index: i32) -> i64 {
        self.per_delivery.get(&index).copied().unwrap_or(0)
    }
}

/// Sum `(delivery_id, quantity)` rows.
///
/// Rows without a delivery go to [`DEFAULT_DELIVERY_INDEX`]; rows without a
/// quantity count as one.
pub fn quantities_by_delivery<I>(rows: I) -> DeliveryTotals
where
    I: IntoIterator<Item = (Option<i32>, Option<i32>)>,
{
    rows.into_iter()
        .fold(DeliveryTotals::default(), |mut totals, (delivery, quantity)| {
            let quantity = i64::from(quantity.unwrap_or(1));
            *totals
                .per_delivery
                .entry(delivery.unwrap_or(DEFAULT_DELIVERY_INDEX))
                .or_insert(0) += quantity;
            totals.total += quantity;
            totals
        })
}
