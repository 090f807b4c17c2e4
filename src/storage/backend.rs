//! Observation store abstraction.
//!
//! The ranking engine never talks to a database directly. It is handed an
//! [`ObservationStore`] at construction time and issues one fetch per request,
//! which keeps the engine testable with fixture data and lets a host swap in
//! whatever backend holds the log entries.

use crate::domain::{HistoricalObservation, Result, UserId};
use chrono::NaiveDate;

/// Read-only source of a user's historical log entries.
///
/// Implementations return observations already joined with their food
/// definition. They are shared across concurrent requests, hence `Sync`.
///
/// # Implementations
///
/// - [`crate::storage::JsonStorage`]: JSON document on disk
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use mealcast::storage::{JsonStorage, ObservationStore};
/// use mealcast::UserId;
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::open(PathBuf::from("/tmp/mealcast.json"))?;
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let rows = storage.fetch_observations(UserId(1), today, 90)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait ObservationStore: Send + Sync {
    /// Returns every observation for `user` dated within
    /// `[reference_date - lookback_days, reference_date]`, bounds inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    fn fetch_observations(
        &self,
        user: UserId,
        reference_date: NaiveDate,
        lookback_days: u32,
    ) -> Result<Vec<HistoricalObservation>>;

    /// Returns the user's full logging history, unbounded in time.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    fn fetch_history(&self, user: UserId) -> Result<Vec<HistoricalObservation>>;
}
