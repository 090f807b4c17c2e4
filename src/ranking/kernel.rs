//! Kernel functions behind the context score.
//!
//! Each function is a bounded, monotonic weight over one dimension of
//! "how similar is this past observation to right now":
//!
//! - time of day, measured around a 24-hour clock ([`circular_time_distance`],
//!   weighted by [`time_kernel`]),
//! - elapsed days ([`recency_decay`]),
//! - day of week ([`weekday_boost`]).
//!
//! All functions are total over their inputs; range checks on the tuning
//! parameters happen once in [`crate::Config::validate`].

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Largest possible circular distance between two times of day.
pub const MAX_TIME_DISTANCE_MINUTES: u32 = MINUTES_PER_DAY / 2;

/// Minutes since midnight. A missing time counts as midnight.
fn minute_of_day(time: Option<NaiveTime>) -> u32 {
    time.map_or(0, |t| t.num_seconds_from_midnight() / 60)
}

/// Shorter distance between two times of day going either way around the clock.
///
/// The result is in `[0, 720]` minutes. `None` is read as `00:00`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use mealcast::ranking::kernel::circular_time_distance;
///
/// let late = NaiveTime::from_hms_opt(23, 0, 0);
/// let early = NaiveTime::from_hms_opt(1, 0, 0);
/// assert_eq!(circular_time_distance(late, early), 120);
/// ```
#[must_use]
pub fn circular_time_distance(a: Option<NaiveTime>, b: Option<NaiveTime>) -> u32 {
    let (a, b) = (minute_of_day(a), minute_of_day(b));
    let forward = a.abs_diff(b);
    forward.min(MINUTES_PER_DAY - forward)
}

/// Gaussian weight over a time-of-day distance.
///
/// ```text
/// kernel = e^(-(distance / bandwidth)^2 / 2)
/// ```
///
/// Equals `1.0` at distance zero and falls off smoothly; with the default
/// 90 minute bandwidth, an observation three hours away keeps about 13% of
/// its weight and one twelve hours away is effectively negligible (but still
/// positive).
#[must_use]
pub fn time_kernel(distance_minutes: u32, bandwidth_minutes: f64) -> f64 {
    let ratio = f64::from(distance_minutes) / bandwidth_minutes;
    f64::exp(-0.5 * ratio * ratio)
}

/// Exponential decay over whole days elapsed.
///
/// ```text
/// decay = 0.5^(days_ago / half_life_days)
/// ```
///
/// Equals `1.0` for today. With the default 14 day half-life, the far end of a
/// 90 day window still contributes about 1%.
#[must_use]
pub fn recency_decay(days_ago: u32, half_life_days: f64) -> f64 {
    f64::powf(0.5, f64::from(days_ago) / half_life_days)
}

/// Multiplier applied when both dates fall on the same day of the week.
#[must_use]
pub fn weekday_boost(observed: NaiveDate, reference: NaiveDate, boost: f64) -> f64 {
    if observed.weekday() == reference.weekday() {
        boost
    } else {
        1.0
    }
}

/// Whole days from `observed` to `reference`, clamped at zero.
///
/// Storage only hands back past or same-day observations; a future date is
/// treated as today rather than producing a growth factor.
#[must_use]
pub fn days_between(observed: NaiveDate, reference: NaiveDate) -> u32 {
    let days = reference.signed_duration_since(observed).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}
