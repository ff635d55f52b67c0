use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use stockcast_core::{ProductId, ValueObject};

use crate::engine::ForecastMethod;
use crate::reorder::ReorderPriority;

/// Result of one demand forecast.
///
/// This is an insight the ERP layer persists or displays; producing it never
/// mutates domain state, and the value carries no identity of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_id: ProductId,

    /// Predicted demand for the coming period, never negative.
    pub predicted_demand: f64,

    /// 0–100, linear ramp on how much history backs the forecast.
    pub confidence_score: f64,

    /// Recommended order quantity; 0 when stock already covers demand.
    pub reorder_quantity: f64,

    /// How urgently the product needs restocking.
    pub priority: ReorderPriority,

    /// Estimation method that produced `predicted_demand`.
    pub method: ForecastMethod,

    /// The "now" the caller supplied for trend evaluation.
    pub as_of: DateTime<Utc>,

    /// Optional human-readable explanation.
    pub explanation: Option<String>,

    /// Free-form metadata (tuning parameters, data-point counts, etc).
    pub metadata: JsonValue,
}

impl ForecastResult {
    pub fn new(
        product_id: ProductId,
        predicted_demand: f64,
        confidence_score: f64,
        reorder_quantity: f64,
        priority: ReorderPriority,
        method: ForecastMethod,
        as_of: DateTime<Utc>,
    ) -> Self {
        Self {
            product_id,
            predicted_demand,
            confidence_score,
            reorder_quantity,
            priority,
            method,
            as_of,
            explanation: None,
            metadata: JsonValue::Null,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }
}

impl ValueObject for ForecastResult {}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("invalid job input: {0}")]
    InvalidInput(String),
}
