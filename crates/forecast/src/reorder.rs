use serde::{Deserialize, Serialize};

use stockcast_core::ValueObject;

/// Default safety stock multiplier.
pub const DEFAULT_SAFETY_FACTOR: f64 = 1.2;

/// Caller-supplied snapshot of one product's stock levels.
///
/// The engine assumes `max_stock_level >= min_stock_level >= 0` but does not
/// validate it; violating the invariant is a data-quality problem for the
/// upstream read model, and the arithmetic here simply proceeds over whatever
/// values were supplied. Validate before calling if strictness is needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockContext {
    pub current_stock: f64,
    pub min_stock_level: f64,
    pub max_stock_level: f64,
    /// Safety stock multiplier applied to predicted demand.
    pub safety_factor: f64,
}

impl StockContext {
    pub fn new(current_stock: f64, min_stock_level: f64, max_stock_level: f64) -> Self {
        Self {
            current_stock,
            min_stock_level,
            max_stock_level,
            safety_factor: DEFAULT_SAFETY_FACTOR,
        }
    }

    pub fn with_safety_factor(mut self, safety_factor: f64) -> Self {
        self.safety_factor = safety_factor;
        self
    }
}

impl ValueObject for StockContext {}

/// Recommended reorder quantity given predicted demand and stock levels.
///
/// The reorder point is the minimum stock level plus safety stock (demand
/// times the safety factor). Below it, order enough to reach the maximum
/// level plus the predicted demand; at or above it, order nothing.
pub fn reorder_quantity(predicted_demand: f64, ctx: &StockContext) -> f64 {
    let safety_stock = predicted_demand * ctx.safety_factor;
    let reorder_point = ctx.min_stock_level + safety_stock;

    if ctx.current_stock < reorder_point {
        (ctx.max_stock_level - ctx.current_stock + predicted_demand).max(0.0)
    } else {
        0.0
    }
}

/// Reorder urgency, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderPriority {
    Urgent,
    High,
    Medium,
    Low,
}

impl ReorderPriority {
    /// Classify how urgently a product needs restocking.
    ///
    /// Rules are evaluated in order, first match wins: out of stock trumps
    /// everything else.
    pub fn classify(current_stock: f64, min_stock_level: f64, predicted_demand: f64) -> Self {
        if current_stock <= 0.0 {
            ReorderPriority::Urgent
        } else if current_stock < min_stock_level {
            ReorderPriority::High
        } else if current_stock < min_stock_level + predicted_demand {
            ReorderPriority::Medium
        } else {
            ReorderPriority::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_restocks_to_max_plus_demand_below_reorder_point() {
        // safety_stock = 12, reorder_point = 32, 5 < 32.
        let ctx = StockContext::new(5.0, 20.0, 100.0);
        let qty = reorder_quantity(10.0, &ctx);
        assert!((qty - 105.0).abs() < 1e-12);
    }

    #[test]
    fn reorder_is_zero_at_or_above_reorder_point() {
        // reorder_point = 32, 50 >= 32.
        let ctx = StockContext::new(50.0, 20.0, 100.0);
        assert_eq!(reorder_quantity(10.0, &ctx), 0.0);
    }

    #[test]
    fn reorder_clamps_negative_order_quantities() {
        // Overstocked relative to max: 40 - 50 + 1 would be negative.
        let ctx = StockContext::new(50.0, 60.0, 40.0);
        assert_eq!(reorder_quantity(1.0, &ctx), 0.0);
    }

    #[test]
    fn custom_safety_factor_moves_the_reorder_point() {
        // factor 1.0: reorder_point = 30, stock 31 sits just above it.
        let ctx = StockContext::new(31.0, 20.0, 100.0).with_safety_factor(1.0);
        assert_eq!(reorder_quantity(10.0, &ctx), 0.0);

        // factor 2.0: reorder_point = 40, same stock now triggers a reorder.
        let ctx = ctx.with_safety_factor(2.0);
        assert!((reorder_quantity(10.0, &ctx) - 79.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_stock_is_urgent_even_when_other_rules_would_match() {
        // current < min would also classify as high; first match wins.
        assert_eq!(ReorderPriority::classify(0.0, 100.0, 50.0), ReorderPriority::Urgent);
        assert_eq!(ReorderPriority::classify(-3.0, 100.0, 50.0), ReorderPriority::Urgent);
    }

    #[test]
    fn below_minimum_is_high() {
        assert_eq!(ReorderPriority::classify(5.0, 10.0, 2.0), ReorderPriority::High);
    }

    #[test]
    fn within_demand_of_minimum_is_medium() {
        // At exactly the minimum the High rule no longer matches.
        assert_eq!(ReorderPriority::classify(10.0, 10.0, 2.0), ReorderPriority::Medium);
        assert_eq!(ReorderPriority::classify(11.0, 10.0, 2.0), ReorderPriority::Medium);
    }

    #[test]
    fn comfortably_stocked_is_low() {
        assert_eq!(ReorderPriority::classify(12.0, 10.0, 2.0), ReorderPriority::Low);
        assert_eq!(ReorderPriority::classify(500.0, 10.0, 2.0), ReorderPriority::Low);
    }
}
