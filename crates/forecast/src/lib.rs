//! `stockcast-forecast`
//!
//! **Responsibility:** Demand forecasting and reorder recommendation.
//!
//! This crate is a pure computation core at the edge of the ERP:
//! - It owns no persistence; callers hand it order history and stock levels.
//! - It never reads an ambient clock; "now" is an explicit input.
//! - It emits forecast **insights**, not domain events.

pub mod engine;
pub mod job;
pub mod reorder;
pub mod result;
pub mod scheduler;
pub mod scoring;
pub mod series;

pub use engine::{DEFAULT_WINDOW, ForecastMethod, linear_trend, moving_average, predict};
pub use job::{DemandForecastJob, DemandSnapshot, ForecastJob};
pub use reorder::{DEFAULT_SAFETY_FACTOR, ReorderPriority, StockContext, reorder_quantity};
pub use result::{ForecastError, ForecastResult};
pub use scheduler::{ForecastScheduler, LocalForecastScheduler, TenantScope};
pub use scoring::{accuracy, confidence};
pub use series::{Observation, OrderStatus, SaleLine, Series};
