use core::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use stockcast_core::{DomainError, ProductId};

use crate::series::{Observation, Series};

/// Default moving-average window, in observations.
pub const DEFAULT_WINDOW: usize = 7;

/// How far ahead the trend model is evaluated, in days past the latest
/// observation.
const FORECAST_HORIZON_DAYS: i64 = 7;

/// Below this many observations a regression fit is unreliable and the
/// estimator falls back to the moving average.
const MIN_REGRESSION_POINTS: usize = 3;

/// Demand estimation method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    MovingAverage,
    LinearRegression,
    #[default]
    Hybrid,
}

impl FromStr for ForecastMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "moving_average" => Ok(ForecastMethod::MovingAverage),
            "linear_regression" => Ok(ForecastMethod::LinearRegression),
            "hybrid" => Ok(ForecastMethod::Hybrid),
            other => Err(DomainError::validation(format!(
                "unknown forecast method: {other}"
            ))),
        }
    }
}

/// Moving average over the most recent `window` quantities.
///
/// Quantities are taken in the given (date-ascending) order; this function
/// never sorts. Fewer observations than `window` average over everything;
/// an empty input yields `0.0`.
pub fn moving_average(quantities: &[f64], window: usize) -> f64 {
    if quantities.is_empty() {
        return 0.0;
    }
    let start = quantities.len().saturating_sub(window);
    mean(&quantities[start..])
}

/// Linear-trend demand estimate for one product.
///
/// Fits quantity on days-since-earliest-observation, day-of-week and month by
/// ordinary least squares, then evaluates the model 7 days past the latest
/// observation using `now`'s calendar position. Fewer than 3 observations, or
/// a degenerate design matrix, fall back to the moving average — policy, not
/// an error. The result is clamped to be non-negative.
pub fn linear_trend(series: &Series, product_id: ProductId, now: DateTime<Utc>) -> f64 {
    linear_trend_with(series, product_id, now, DEFAULT_WINDOW)
}

pub(crate) fn linear_trend_with(
    series: &Series,
    product_id: ProductId,
    now: DateTime<Utc>,
    window: usize,
) -> f64 {
    let observations: Vec<&Observation> = series.for_product(product_id).collect();
    if observations.len() < MIN_REGRESSION_POINTS {
        return fallback_average(&observations, window);
    }

    // Series order is date-ascending, so the earliest observation is first.
    let earliest = observations[0].date;
    let mut rows: Vec<[f64; 3]> = Vec::with_capacity(observations.len());
    let mut targets: Vec<f64> = Vec::with_capacity(observations.len());
    let mut max_days: i64 = 0;

    for obs in &observations {
        let days = (obs.date - earliest).num_days();
        max_days = max_days.max(days);
        rows.push([days as f64, obs.day_of_week as f64, obs.month as f64]);
        targets.push(obs.quantity);
    }

    let Some(beta) = ols_fit(&rows, &targets) else {
        return fallback_average(&observations, window);
    };

    let horizon = [
        (max_days + FORECAST_HORIZON_DAYS) as f64,
        now.weekday().num_days_from_monday() as f64,
        now.month() as f64,
    ];
    let prediction = beta[0]
        + beta[1] * horizon[0]
        + beta[2] * horizon[1]
        + beta[3] * horizon[2];

    prediction.max(0.0)
}

/// Demand estimate for one product using the default moving-average window.
///
/// `Hybrid` is the arithmetic mean of the moving-average and linear-trend
/// estimates, each evaluated independently (both always run). An empty series
/// or a product with no observations yields `0.0`.
pub fn predict(
    series: &Series,
    product_id: ProductId,
    method: ForecastMethod,
    now: DateTime<Utc>,
) -> f64 {
    predict_with(series, product_id, method, now, DEFAULT_WINDOW)
}

/// Like [`predict`] with an explicit moving-average window.
pub fn predict_with(
    series: &Series,
    product_id: ProductId,
    method: ForecastMethod,
    now: DateTime<Utc>,
    window: usize,
) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let quantities = series.quantities(product_id);
    if quantities.is_empty() {
        return 0.0;
    }

    match method {
        ForecastMethod::MovingAverage => moving_average(&quantities, window),
        ForecastMethod::LinearRegression => linear_trend_with(series, product_id, now, window),
        ForecastMethod::Hybrid => {
            let ma = moving_average(&quantities, window);
            let lr = linear_trend_with(series, product_id, now, window);
            (ma + lr) / 2.0
        }
    }
}

fn fallback_average(observations: &[&Observation], window: usize) -> f64 {
    let quantities: Vec<f64> = observations.iter().map(|o| o.quantity).collect();
    moving_average(&quantities, window)
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Ordinary least squares with intercept: solves the normal equations
/// `XᵀX·β = Xᵀy` for `β = [intercept, b_days, b_dow, b_month]`.
///
/// Returns `None` when the system is singular (e.g. every observation on the
/// same day, or a feature column constant and therefore collinear with the
/// intercept), letting the caller fall back to a simpler estimator.
fn ols_fit(rows: &[[f64; 3]], targets: &[f64]) -> Option<[f64; 4]> {
    let mut xtx = [[0.0f64; 4]; 4];
    let mut xty = [0.0f64; 4];

    for (row, &y) in rows.iter().zip(targets) {
        let x = [1.0, row[0], row[1], row[2]];
        for i in 0..4 {
            xty[i] += x[i] * y;
            for j in 0..4 {
                xtx[i][j] += x[i] * x[j];
            }
        }
    }

    solve_4x4(xtx, xty)
}

/// Gaussian elimination with partial pivoting on a 4×4 system.
fn solve_4x4(mut a: [[f64; 4]; 4], mut b: [f64; 4]) -> Option<[f64; 4]> {
    const PIVOT_EPS: f64 = 1e-9;

    for col in 0..4 {
        let mut pivot = col;
        for row in (col + 1)..4 {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < PIVOT_EPS {
            return None;
        }
        if pivot != col {
            a.swap(pivot, col);
            b.swap(pivot, col);
        }
        for row in (col + 1)..4 {
            let factor = a[row][col] / a[col][col];
            for k in col..4 {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0f64; 4];
    for col in (0..4).rev() {
        let mut sum = b[col];
        for k in (col + 1)..4 {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }
    Some(x)
}
