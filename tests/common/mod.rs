//! Fixture stores and builders shared by the integration tests.

#![allow(dead_code)]

use chrono::{Days, Duration, NaiveDate, NaiveTime};
use mealcast::storage::ObservationStore;
use mealcast::{FoodId, FoodProfile, HistoricalObservation, MealSlot, MealcastError, Result, UserId};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn profile(id: i64, name: &str, synced: bool) -> FoodProfile {
    FoodProfile {
        name: name.to_string(),
        brand: None,
        quantity: 1.0,
        unit: "serving".to_string(),
        calories: 200.0,
        protein_g: 10.0,
        carbs_g: 20.0,
        fat_g: 5.0,
        fiber_g: None,
        external_id: synced.then(|| format!("ext-{id}")),
    }
}

/// A synced food logged `days_ago` days before [`today`] at `time`.
pub fn logged(id: i64, name: &str, days_ago: i64, time: NaiveTime, slot: MealSlot) -> HistoricalObservation {
    HistoricalObservation {
        food_id: FoodId(id),
        observed_date: today() - Duration::days(days_ago),
        observed_time: Some(time),
        meal_slot: slot,
        food: profile(id, name, true),
    }
}

/// In-memory store for one user that applies the date window itself.
#[derive(Debug, Default)]
pub struct FixtureStore {
    pub user: i64,
    pub rows: Vec<HistoricalObservation>,
    pub fetches: AtomicUsize,
}

impl FixtureStore {
    pub fn new(rows: Vec<HistoricalObservation>) -> Self {
        Self {
            user: 1,
            rows,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ObservationStore for FixtureStore {
    fn fetch_observations(
        &self,
        user: UserId,
        reference_date: NaiveDate,
        lookback_days: u32,
    ) -> Result<Vec<HistoricalObservation>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if user.0 != self.user {
            return Ok(Vec::new());
        }
        let start = reference_date
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        Ok(self
            .rows
            .iter()
            .filter(|o| o.observed_date >= start && o.observed_date <= reference_date)
            .cloned()
            .collect())
    }

    fn fetch_history(&self, user: UserId) -> Result<Vec<HistoricalObservation>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if user.0 != self.user {
            return Ok(Vec::new());
        }
        Ok(self.rows.clone())
    }
}

/// Store that hands back the same rows in a different order on every call.
///
/// Call `n` rotates the rows left by `n` and reverses them when `n` is odd,
/// the way an unordered database query may return them.
#[derive(Debug, Default)]
pub struct ShuffledStore {
    pub rows: Vec<HistoricalObservation>,
    pub calls: AtomicUsize,
}

impl ShuffledStore {
    pub fn new(rows: Vec<HistoricalObservation>) -> Self {
        Self {
            rows,
            calls: AtomicUsize::new(0),
        }
    }

    fn permuted(&self) -> Vec<HistoricalObservation> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.clone();
        if !rows.is_empty() {
            let len = rows.len();
            rows.rotate_left(call % len);
        }
        if call % 2 == 1 {
            rows.reverse();
        }
        rows
    }
}

impl ObservationStore for ShuffledStore {
    fn fetch_observations(
        &self,
        _: UserId,
        reference_date: NaiveDate,
        lookback_days: u32,
    ) -> Result<Vec<HistoricalObservation>> {
        let start = reference_date
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        Ok(self
            .permuted()
            .into_iter()
            .filter(|o| o.observed_date >= start && o.observed_date <= reference_date)
            .collect())
    }

    fn fetch_history(&self, _: UserId) -> Result<Vec<HistoricalObservation>> {
        Ok(self.permuted())
    }
}

/// Store whose every query fails.
#[derive(Debug)]
pub struct FailingStore;

impl ObservationStore for FailingStore {
    fn fetch_observations(&self, _: UserId, _: NaiveDate, _: u32) -> Result<Vec<HistoricalObservation>> {
        Err(MealcastError::Storage("connection refused".to_string()))
    }

    fn fetch_history(&self, _: UserId) -> Result<Vec<HistoricalObservation>> {
        Err(MealcastError::Storage("connection refused".to_string()))
    }
}
