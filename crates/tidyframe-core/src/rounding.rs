//! Compensated rounding and summation.
//!
//! [`CompensatedRounder`] carries the remainder discarded by each rounding
//! into the next value, so the rounded column's sum tracks the true sum with
//! an error bounded by half a unit of the last place, however long the column.
//! [`CompensatedSum`] is the Neumaier accumulator used when duplicate rows
//! are merged.

use polars::prelude::{Float64Chunked, IntoSeries, NewChunkedArray, PolarsResult, Series};

/// Largest precision that still has a finite, exact power of ten scale.
const MAX_PRECISION: u32 = 15;

/// Rounds `value` half away from zero to `precision` decimal places.
///
/// Non-finite values and precisions beyond what an `f64` can represent are
/// returned unchanged.
pub fn round_to(value: f64, precision: u32) -> f64 {
    if !value.is_finite() || precision > MAX_PRECISION {
        return value;
    }
    let scale = 10f64.powi(precision as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Stateful per-column rounder with a running error term.
#[derive(Debug, Clone)]
pub struct CompensatedRounder {
    precision: u32,
    error: f64,
}

impl CompensatedRounder {
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            error: 0.0,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Carried error after the values seen so far.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Rounds `value + error` and carries the new remainder.
    pub fn round(&mut self, value: f64) -> f64 {
        let adjusted = value + self.error;
        let rounded = round_to(adjusted, self.precision);
        if rounded.is_finite() {
            self.error = adjusted - rounded;
        }
        rounded
    }

    pub fn reset(&mut self) {
        self.error = 0.0;
    }
}

/// Rounds a float series in order with a fresh [`CompensatedRounder`].
/// Nulls pass through without touching the carried error.
pub fn round_series(series: &Series, precision: u32) -> PolarsResult<Series> {
    let values = series.f64()?;
    let mut rounder = CompensatedRounder::new(precision);
    let rounded = values
        .into_iter()
        .map(|value| value.map(|v| rounder.round(v)));
    Ok(Float64Chunked::from_iter_options(series.name().clone(), rounded).into_series())
}

/// Neumaier compensated sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
    count: usize,
}

impl CompensatedSum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
        self.count += 1;
    }

    /// Number of values added.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn total(&self) -> f64 {
        let total = self.sum + self.compensation;
        // inf - inf in the compensation term would otherwise turn into NaN
        if total.is_nan() && !self.sum.is_nan() {
            self.sum
        } else {
            total
        }
    }

    /// Total, or `None` when nothing was added.
    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total())
    }
}

impl Extend<f64> for CompensatedSum {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl FromIterator<f64> for CompensatedSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut sum = Self::new();
        sum.extend(iter);
        sum
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::NamedFrom;

    use super::*;

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(91.9999, 2), 92.0);
        assert_eq!(round_to(2.345, 0), 2.0);
        assert_eq!(round_to(-1.25, 1), -1.3);
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
        assert_eq!(round_to(1.0e300, 10), 1.0e300);
    }

    #[test]
    fn rounder_carries_remainder() {
        let mut rounder = CompensatedRounder::new(0);
        let out: Vec<f64> = [0.4, 0.4, 0.4, 0.4, 0.4].map(|v| rounder.round(v)).to_vec();
        // Plain rounding would give 0 for every value.
        assert_eq!(out.iter().sum::<f64>(), 2.0);
        assert!(rounder.error().abs() < 0.5);

        rounder.round(0.4);
        rounder.reset();
        assert_eq!(rounder.error(), 0.0);
        assert_eq!(rounder.round(0.4), 0.0);
    }

    #[test]
    fn long_column_does_not_drift() {
        let mut rounder = CompensatedRounder::new(2);
        let total: f64 = (0..10_000).map(|_| rounder.round(0.0049)).sum();
        // plain rounding sends every value to 0.00
        assert_eq!(round_to(0.0049, 2), 0.0);
        assert!((total - 49.0).abs() < 0.01, "total {total}");
    }

    #[test]
    fn rounder_skips_non_finite_values() {
        let mut rounder = CompensatedRounder::new(2);
        assert_eq!(rounder.round(f64::INFINITY), f64::INFINITY);
        assert_eq!(rounder.error(), 0.0);
        assert_eq!(rounder.round(1.234), 1.23);
    }

    #[test]
    fn round_series_keeps_nulls() {
        let series = Series::new("x".into(), vec![Some(0.26), None, Some(0.26)]);
        let rounded = round_series(&series, 1).unwrap();
        let values: Vec<Option<f64>> = rounded.f64().unwrap().into_iter().collect();
        assert_eq!(values[1], None);
        assert_eq!(values[0], Some(0.3));
        // carried -0.04 pulls the third value down
        assert_eq!(values[2], Some(0.2));
    }

    #[test]
    fn neumaier_recovers_small_terms() {
        let sum: CompensatedSum = [1.0, 1e100, 1.0, -1e100].into_iter().collect();
        assert_eq!(sum.total(), 2.0);
        assert_eq!(sum.count(), 4);
        assert_eq!(CompensatedSum::new().value(), None);
    }
}
