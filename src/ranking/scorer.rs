//! Per-observation context score.
//!
//! ```text
//! score = time_kernel(circular_time_distance(observed_time, reference_time))
//!       × recency_decay(days_between(observed_date, reference_date))
//!       × weekday_boost(observed_date, reference_date)
//! ```

use super::kernel::{circular_time_distance, days_between, recency_decay, time_kernel, weekday_boost};
use crate::domain::HistoricalObservation;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Tuning knobs for the context kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Gaussian width of the time-of-day kernel, in minutes.
    pub time_bandwidth_minutes: f64,
    /// Days after which an observation keeps half its weight.
    pub recency_half_life_days: f64,
    /// Multiplier for observations on the same weekday as the reference.
    pub weekday_boost: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            time_bandwidth_minutes: 90.0,
            recency_half_life_days: 14.0,
            weekday_boost: 1.3,
        }
    }
}

/// The "now" observations are compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePoint {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl ReferencePoint {
    #[must_use]
    pub const fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }
}

impl From<NaiveDateTime> for ReferencePoint {
    fn from(value: NaiveDateTime) -> Self {
        Self::new(value.date(), value.time())
    }
}

/// Scores a single observation against the reference point.
///
/// Deterministic and side-effect free; the result is finite and non-negative
/// for any observation when `params` passed config validation.
#[must_use]
pub fn score_observation(
    observation: &HistoricalObservation,
    reference: ReferencePoint,
    params: &ScoringParams,
) -> f64 {
    let distance = circular_time_distance(observation.observed_time, Some(reference.time));
    let days_ago = days_between(observation.observed_date, reference.date);

    time_kernel(distance, params.time_bandwidth_minutes)
        * recency_decay(days_ago, params.recency_half_life_days)
        * weekday_boost(observation.observed_date, reference.date, params.weekday_boost)
}
