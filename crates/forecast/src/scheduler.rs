use tracing::{debug, info, warn};

use stockcast_core::TenantId;

use crate::job::ForecastJob;
use crate::result::{ForecastError, ForecastResult};

/// Tenant scope for execution.
///
/// - `Any`: run jobs for any tenant (useful for shared workers).
/// - `Tenant`: only accept jobs for the specified tenant (safe initialization / single-tenant worker).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TenantScope {
    Any,
    Tenant(TenantId),
}

impl TenantScope {
    pub fn allows(&self, tenant_id: TenantId) -> bool {
        match self {
            TenantScope::Any => true,
            TenantScope::Tenant(t) => *t == tenant_id,
        }
    }
}

/// Scheduler/executor for forecast jobs.
///
/// This is intentionally minimal and storage/runtime agnostic. Persistence of
/// results and the actual cron trigger belong to the embedding ERP layer.
pub trait ForecastScheduler: Send + Sync + 'static {
    fn scope(&self) -> TenantScope;

    fn run<J: ForecastJob>(&self, job: J) -> Result<ForecastResult, ForecastError> {
        if !self.scope().allows(job.tenant_id()) {
            return Err(ForecastError::InvalidInput(
                "tenant scope violation (job tenant not allowed by scheduler)".to_string(),
            ));
        }
        job.run()
    }

    /// Run a batch of jobs, e.g. the nightly forecast over every active
    /// product. One product failing does not abort the rest: failures are
    /// logged and skipped, successes are returned in input order.
    fn run_batch<J: ForecastJob>(&self, jobs: Vec<J>) -> Vec<ForecastResult> {
        let total = jobs.len();
        let mut results = Vec::with_capacity(total);

        for job in jobs {
            match self.run(job) {
                Ok(result) => {
                    debug!(
                        product_id = %result.product_id,
                        demand = result.predicted_demand,
                        reorder = result.reorder_quantity,
                        "forecast generated"
                    );
                    results.push(result);
                }
                Err(err) => {
                    warn!(error = %err, "skipping forecast job");
                }
            }
        }

        info!(generated = results.len(), total, "forecast batch finished");
        results
    }
}

/// Simple synchronous scheduler that runs jobs immediately in-process.
#[derive(Debug, Copy, Clone)]
pub struct LocalForecastScheduler {
    scope: TenantScope,
}

impl LocalForecastScheduler {
    pub fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self::new(TenantScope::Tenant(tenant_id))
    }
}

impl ForecastScheduler for LocalForecastScheduler {
    fn scope(&self) -> TenantScope {
        self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ForecastMethod;
    use crate::job::{DemandForecastJob, DemandSnapshot};
    use crate::reorder::StockContext;
    use crate::series::{OrderStatus, SaleLine};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use stockcast_core::ProductId;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
    }

    fn snapshot(tenant_id: TenantId, quantity: f64) -> DemandSnapshot {
        let product_id = ProductId::new();
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let lines: Vec<SaleLine> = (0..5)
            .map(|i| SaleLine {
                order_date: start + Duration::days(i),
                order_status: OrderStatus::Confirmed,
                product_id,
                quantity,
                unit_price: 1.0,
            })
            .collect();
        DemandSnapshot {
            tenant_id,
            product_id,
            lines,
            stock: StockContext::new(50.0, 10.0, 100.0),
            as_of: test_time(),
        }
    }

    #[test]
    fn scoped_scheduler_rejects_foreign_tenants() {
        let tenant_id = TenantId::new();
        let scheduler = LocalForecastScheduler::for_tenant(tenant_id);

        let foreign = TenantId::new();
        let job = DemandForecastJob::new(foreign, snapshot(foreign, 3.0));
        let err = scheduler.run(job).unwrap_err();
        match err {
            ForecastError::InvalidInput(msg) => assert!(msg.contains("scope")),
        }

        let job = DemandForecastJob::new(tenant_id, snapshot(tenant_id, 3.0));
        assert!(scheduler.run(job).is_ok());
    }

    #[test]
    fn any_scope_accepts_all_tenants() {
        let scheduler = LocalForecastScheduler::new(TenantScope::Any);
        let tenant_id = TenantId::new();
        let job = DemandForecastJob::new(tenant_id, snapshot(tenant_id, 4.0));
        let result = scheduler.run(job).unwrap();
        assert!((result.predicted_demand - 4.0).abs() < 1e-6);
    }

    #[test]
    fn batch_skips_failing_jobs_and_keeps_the_rest() {
        let tenant_id = TenantId::new();
        let scheduler = LocalForecastScheduler::for_tenant(tenant_id);

        let good = DemandForecastJob::new(tenant_id, snapshot(tenant_id, 6.0));
        // Zero window fails validation inside the job.
        let bad = DemandForecastJob::new(tenant_id, snapshot(tenant_id, 6.0)).with_window(0);
        let other_tenant = TenantId::new();
        // Foreign tenant fails scope enforcement in the scheduler.
        let foreign = DemandForecastJob::new(other_tenant, snapshot(other_tenant, 6.0));
        let also_good = DemandForecastJob::new(tenant_id, snapshot(tenant_id, 8.0))
            .with_method(ForecastMethod::MovingAverage);

        let results = scheduler.run_batch(vec![good, bad, foreign, also_good]);
        assert_eq!(results.len(), 2);
        assert!((results[0].predicted_demand - 6.0).abs() < 1e-6);
        assert!((results[1].predicted_demand - 8.0).abs() < 1e-6);
    }
}
