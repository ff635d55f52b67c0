use stockcast_core::ProductId;

use crate::series::Series;

/// Observations at which a forecast reaches full confidence.
const FULL_CONFIDENCE_POINTS: f64 = 30.0;

/// Confidence in a forecast for one product, 0–100.
///
/// A linear ramp on how many historical observations back the forecast:
/// proportional below 30 data points, clamped at 100 from there on.
pub fn confidence(series: &Series, product_id: ProductId) -> f64 {
    let points = series.count_for(product_id) as f64;
    (points / FULL_CONFIDENCE_POINTS * 100.0).min(100.0)
}

/// Post-hoc forecast accuracy against observed demand, 0–100.
///
/// Zero actual demand yields 0 (worst case rather than undefined); an error
/// exceeding 100% of actual also clamps to 0.
pub fn accuracy(predicted: f64, actual: f64) -> f64 {
    if actual == 0.0 {
        return 0.0;
    }
    let error = (predicted - actual).abs();
    (100.0 - (error / actual * 100.0)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{OrderStatus, SaleLine};
    use chrono::{Duration, TimeZone, Utc};

    fn series_with_points(product_id: ProductId, count: usize) -> Series {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let lines: Vec<SaleLine> = (0..count)
            .map(|i| SaleLine {
                order_date: start + Duration::days(i as i64),
                order_status: OrderStatus::Confirmed,
                product_id,
                quantity: 1.0,
                unit_price: 1.0,
            })
            .collect();
        Series::prepare(&lines)
    }

    #[test]
    fn confidence_ramps_linearly_to_thirty_points() {
        let pid = ProductId::new();
        assert_eq!(confidence(&series_with_points(pid, 0), pid), 0.0);
        assert!((confidence(&series_with_points(pid, 15), pid) - 50.0).abs() < 1e-12);
        assert_eq!(confidence(&series_with_points(pid, 30), pid), 100.0);
    }

    #[test]
    fn confidence_never_exceeds_one_hundred() {
        let pid = ProductId::new();
        assert_eq!(confidence(&series_with_points(pid, 45), pid), 100.0);
    }

    #[test]
    fn confidence_counts_only_the_requested_product() {
        let pid = ProductId::new();
        let other = ProductId::new();
        let series = series_with_points(pid, 15);
        assert_eq!(confidence(&series, other), 0.0);
    }

    #[test]
    fn accuracy_against_zero_actual_is_zero() {
        assert_eq!(accuracy(0.0, 0.0), 0.0);
        assert_eq!(accuracy(12.0, 0.0), 0.0);
    }

    #[test]
    fn accuracy_reflects_relative_error() {
        assert!((accuracy(8.0, 10.0) - 80.0).abs() < 1e-12);
        assert_eq!(accuracy(10.0, 10.0), 100.0);
    }

    #[test]
    fn accuracy_clamps_when_error_exceeds_actual() {
        assert_eq!(accuracy(20.0, 10.0), 0.0);
        assert_eq!(accuracy(35.0, 10.0), 0.0);
    }
}
