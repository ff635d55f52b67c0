use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use stockcast_core::{ProductId, ValueObject};

/// Sale-order lifecycle status as reported by the ERP caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Draft,
    Sent,
    Confirmed,
    Done,
    Cancelled,
}

impl OrderStatus {
    /// Only confirmed or completed orders count as realized demand.
    pub fn is_confirmed_sale(self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Done)
    }
}

/// Raw sales line as handed over by the ERP layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub product_id: ProductId,
    pub quantity: f64,
    pub unit_price: f64,
}

/// One historical demand event with calendar-derived features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: DateTime<Utc>,
    pub product_id: ProductId,
    pub quantity: f64,
    pub unit_price: f64,
    /// 0–6, Monday = 0.
    pub day_of_week: u32,
    /// 1–12.
    pub month: u32,
}

impl Observation {
    fn from_line(line: &SaleLine) -> Self {
        Self {
            date: line.order_date,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            day_of_week: line.order_date.weekday().num_days_from_monday(),
            month: line.order_date.month(),
        }
    }
}

impl ValueObject for Observation {}

/// Date-ascending collection of historical demand observations.
///
/// A series may span multiple products; estimators filter to one product
/// before doing anything. An empty series is a valid value meaning
/// "no history", not an error condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    /// Prepare a series from raw sales lines.
    ///
    /// Lines whose parent order is not confirmed or completed are silently
    /// dropped. Retained lines get calendar features derived from the order
    /// date, and the result is sorted date-ascending. Inputs are not mutated.
    pub fn prepare(lines: &[SaleLine]) -> Self {
        let mut observations: Vec<Observation> = lines
            .iter()
            .filter(|line| line.order_status.is_confirmed_sale())
            .map(Observation::from_line)
            .collect();
        observations.sort_by_key(|o| o.date);
        Self { observations }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Observations for one product, in series (date-ascending) order.
    pub fn for_product(&self, product_id: ProductId) -> impl Iterator<Item = &Observation> {
        self.observations
            .iter()
            .filter(move |o| o.product_id == product_id)
    }

    /// Quantities for one product, in series order.
    pub fn quantities(&self, product_id: ProductId) -> Vec<f64> {
        self.for_product(product_id).map(|o| o.quantity).collect()
    }

    /// Number of observations backing a product.
    pub fn count_for(&self, product_id: ProductId) -> usize {
        self.for_product(product_id).count()
    }
}
