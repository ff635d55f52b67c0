use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use stockcast_core::{ProductId, TenantId};

use crate::engine::{self, DEFAULT_WINDOW, ForecastMethod};
use crate::reorder::{ReorderPriority, StockContext, reorder_quantity};
use crate::result::{ForecastError, ForecastResult};
use crate::scoring;
use crate::series::{SaleLine, Series};

/// A tenant-scoped forecast unit.
///
/// Jobs consume caller-assembled **snapshots**; this crate stays
/// storage-agnostic: order history and stock levels are provided by callers
/// (infra/workers), never fetched from here.
pub trait ForecastJob: Send + Sync + 'static {
    type Input: Send + Sync + 'static;

    /// The tenant this job belongs to (tenant-safe execution model).
    fn tenant_id(&self) -> TenantId;

    /// The input snapshot the job will run on.
    fn input(&self) -> &Self::Input;

    /// Execute the forecast and return the insight.
    ///
    /// Must not mutate domain state.
    fn run(&self) -> Result<ForecastResult, ForecastError>;
}

/// Everything the engine needs to forecast one product, assembled by the
/// caller from its order-history and stock read models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSnapshot {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    /// Raw sales lines; the preparer filters out unconfirmed orders itself.
    pub lines: Vec<SaleLine>,
    pub stock: StockContext,
    /// Timestamp used for the calendar features of the trend forecast.
    pub as_of: DateTime<Utc>,
}

/// Demand forecast job for one product: prepare → predict → score → reorder.
#[derive(Debug, Clone)]
pub struct DemandForecastJob {
    tenant_id: TenantId,
    input: DemandSnapshot,
    method: ForecastMethod,
    /// Moving-average window, in observations (must be >= 1).
    window: usize,
}

impl DemandForecastJob {
    pub fn new(tenant_id: TenantId, input: DemandSnapshot) -> Self {
        Self {
            tenant_id,
            input,
            method: ForecastMethod::default(),
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_method(mut self, method: ForecastMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

impl ForecastJob for DemandForecastJob {
    type Input = DemandSnapshot;

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn run(&self) -> Result<ForecastResult, ForecastError> {
        if self.input.tenant_id != self.tenant_id {
            return Err(ForecastError::InvalidInput(
                "tenant_id mismatch between job and snapshot".to_string(),
            ));
        }

        if self.window == 0 {
            return Err(ForecastError::InvalidInput(
                "window must cover at least one observation".to_string(),
            ));
        }

        let safety_factor = self.input.stock.safety_factor;
        if !(safety_factor.is_finite() && safety_factor > 0.0) {
            return Err(ForecastError::InvalidInput(
                "safety_factor must be a finite positive number".to_string(),
            ));
        }

        let series = Series::prepare(&self.input.lines);
        let predicted_demand = engine::predict_with(
            &series,
            self.input.product_id,
            self.method,
            self.input.as_of,
            self.window,
        );
        let confidence_score = scoring::confidence(&series, self.input.product_id);
        let qty = reorder_quantity(predicted_demand, &self.input.stock);
        let priority = ReorderPriority::classify(
            self.input.stock.current_stock,
            self.input.stock.min_stock_level,
            predicted_demand,
        );

        Ok(ForecastResult::new(
            self.input.product_id,
            predicted_demand,
            confidence_score,
            qty,
            priority,
            self.method,
            self.input.as_of,
        )
        .with_explanation(format!(
            "predicted demand: {predicted_demand:.2} units, reorder: {qty:.2} units"
        ))
        .with_metadata(json!({
            "kind": "stock.demand_forecast",
            "tenant_id": self.tenant_id.to_string(),
            "method": self.method,
            "window": self.window,
            "data_points": series.count_for(self.input.product_id),
        })))
    }
}
