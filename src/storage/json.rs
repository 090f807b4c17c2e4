//! JSON file-based observation store.
//!
//! Loads a versioned JSON document holding food definitions and log entries
//! into memory once, then answers window queries from that snapshot.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "foods": {
//!     "10": {
//!       "id": 10,
//!       "name": "Oatmeal",
//!       "quantity": 1.0,
//!       "unit": "bowl",
//!       "calories": 150.0,
//!       "protein_g": 5.0,
//!       "carbs_g": 27.0,
//!       "fat_g": 3.0,
//!       "external_id": "fit-8812"
//!     }
//!   },
//!   "entries": [
//!     { "user_id": 1, "food_id": 10, "date": "2026-10-19", "time": "08:05:00", "meal_slot": "breakfast" }
//!   ]
//! }
//! ```

use crate::domain::error::{MealcastError, Result};
use crate::domain::{FoodId, HistoricalObservation, UserId};
use crate::storage::backend::ObservationStore;
use crate::storage::models::{FoodRecord, LogEntryRecord};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Storage format version this build understands.
const STORAGE_VERSION: u32 = 1;

/// JSON storage container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageData {
    /// Version of the storage format for future migrations.
    pub version: u32,

    /// Food definitions keyed by id.
    #[serde(default)]
    pub foods: HashMap<FoodId, FoodRecord>,

    /// Log entries for all users, in no particular order.
    #[serde(default)]
    pub entries: Vec<LogEntryRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            foods: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

/// Read-only observation store backed by a JSON file.
///
/// The document is loaded once on [`JsonStorage::open`]; later edits to the
/// file are not picked up. The type is `Send + Sync` and can be shared by
/// concurrent requests.
#[derive(Debug)]
pub struct JsonStorage {
    file_path: Option<PathBuf>,
    data: StorageData,
}

impl JsonStorage {
    /// Opens a JSON store from disk.
    ///
    /// A missing file is treated as an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The contents are not valid JSON for [`StorageData`]
    /// - The document declares an unsupported version
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON storage");

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("storage file missing, starting empty");
            StorageData::default()
        };

        Ok(Self {
            file_path: Some(file_path),
            data,
        })
    }

    /// Wraps an in-memory document, e.g. one assembled by a test.
    ///
    /// # Errors
    ///
    /// Returns an error if the document declares an unsupported version.
    pub fn from_data(data: StorageData) -> Result<Self> {
        Self::check_version(&data)?;
        Ok(Self {
            file_path: None,
            data,
        })
    }

    /// Path the store was loaded from, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| MealcastError::Storage(format!("failed to parse JSON: {e}")))?;
        Self::check_version(&data)?;

        tracing::debug!(
            version = data.version,
            foods = data.foods.len(),
            entries = data.entries.len(),
            "loaded storage data"
        );

        Ok(data)
    }

    fn check_version(data: &StorageData) -> Result<()> {
        if data.version == STORAGE_VERSION {
            Ok(())
        } else {
            Err(MealcastError::Storage(format!(
                "unsupported storage version {} (expected {STORAGE_VERSION})",
                data.version
            )))
        }
    }

    /// Joins the user's entries accepted by `in_window` with their foods.
    fn collect<F>(&self, user: UserId, in_window: F) -> Vec<HistoricalObservation>
    where
        F: Fn(NaiveDate) -> bool,
    {
        let mut dangling = 0usize;
        let observations: Vec<HistoricalObservation> = self
            .data
            .entries
            .iter()
            .filter(|entry| entry.user_id == user && in_window(entry.date))
            .filter_map(|entry| {
                let food = self.data.foods.get(&entry.food_id);
                if food.is_none() {
                    dangling += 1;
                }
                food.map(|food| entry.join(food))
            })
            .collect();

        if dangling > 0 {
            tracing::warn!(
                user_id = %user,
                skipped = dangling,
                "skipped log entries referencing unknown foods"
            );
        }

        observations
    }
}

impl ObservationStore for JsonStorage {
    fn fetch_observations(
        &self,
        user: UserId,
        reference_date: NaiveDate,
        lookback_days: u32,
    ) -> Result<Vec<HistoricalObservation>> {
        let _span = tracing::debug_span!("json_fetch_observations",
            user_id = %user,
            reference_date = %reference_date,
            lookback_days = lookback_days
        )
        .entered();

        let start = reference_date
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        let observations = self.collect(user, |date| date >= start && date <= reference_date);

        tracing::debug!(count = observations.len(), "fetched observations");
        Ok(observations)
    }

    fn fetch_history(&self, user: UserId) -> Result<Vec<HistoricalObservation>> {
        let _span = tracing::debug_span!("json_fetch_history", user_id = %user).entered();

        let observations = self.collect(user, |_| true);

        tracing::debug!(count = observations.len(), "fetched history");
        Ok(observations)
    }
}
