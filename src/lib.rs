//! Mealcast: predicts what a user is likely eating right now.
//!
//! Mealcast ranks a user's previously logged foods against a reference
//! moment and pages through the result with tie-safe cursors:
//! - Context ranking that blends time-of-day proximity, recency and weekday
//!   affinity per log entry, then sums per food
//! - Keyset pagination whose cursor carries both score and food id
//! - Text search ranked by how often and how recently a food was logged
//! - A pluggable observation store, with a JSON file implementation

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ranking Layer (ranking/)                           │
//! │  - RankingEngine entry points                       │
//! │  - Kernel + scorer + aggregator                     │
//! │  - Cursor codec + paginator, text search            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage Layer (storage/)                           │
//! │  - ObservationStore trait                           │
//! │  - JSON file backend                                │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data paths (infrastructure/)                     │
//! │  - Errors, foods, observations (domain/)            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber, optional span file export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Core domain types (foods, observations, errors)
//! - [`ranking`]: Scoring, aggregation, pagination and search
//! - [`storage`]: Observation store trait and JSON backend
//! - [`infrastructure`]: Data directory and path helpers
//! - [`observability`]: Tracing initialisation
//!
//! # Configuration
//!
//! ```toml
//! data_file = "~/.local/share/mealcast/mealcast.json"
//! lookback_days = 90
//! weekday_boost = 1.3
//! time_bandwidth_minutes = 90.0
//! recency_half_life_days = 14.0
//! default_limit = 20
//! max_limit = 100
//! include_unsynced = false
//! trace_level = "info"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use mealcast::ranking::{ContextOptions, RankingEngine};
//! use mealcast::storage::JsonStorage;
//! use mealcast::{Config, UserId};
//!
//! let config = Config::default();
//! let storage = JsonStorage::open(config.data_path())?;
//! let engine = RankingEngine::from_config(storage, &config)?;
//!
//! let now = Local::now().naive_local().into();
//! let page = engine.rank_by_context(UserId(1), now, &ContextOptions::new(config.default_limit))?;
//! if let Some(token) = page.next_cursor {
//!     let next = ContextOptions::new(config.default_limit).with_cursor(token);
//!     let _more = engine.rank_by_context(UserId(1), now, &next)?;
//! }
//! # Ok::<(), mealcast::MealcastError>(())
//! ```

pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod ranking;
pub mod storage;

pub use domain::{
    FoodId, FoodProfile, HistoricalObservation, MealSlot, MealcastError, RankedFood, RankedPage,
    Result, UserId,
};
pub use ranking::{ContextOptions, QueryOptions, RankingEngine, ReferencePoint, ScoringParams};

use ranking::engine::{DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_LIMIT, MAX_LOOKBACK_DAYS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Engine and CLI configuration.
///
/// Loaded from a TOML file, a string key/value map, or both (map entries
/// override file values). Every field has a default, so partial files are
/// fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the JSON observation store. `~` is expanded.
    ///
    /// Default: `<data dir>/mealcast.json`
    pub data_file: Option<String>,

    /// Days of history considered by context ranking. Default: 90
    pub lookback_days: u32,

    /// Score multiplier for same-weekday observations. Default: 1.3
    pub weekday_boost: f64,

    /// Width of the time-of-day kernel in minutes. Default: 90
    pub time_bandwidth_minutes: f64,

    /// Recency half-life in days. Default: 14
    pub recency_half_life_days: f64,

    /// Page size used when the caller gives none. Default: 20
    pub default_limit: usize,

    /// Largest page size a caller may request. Default: 100
    pub max_limit: usize,

    /// Default for the per-call `include_unsynced` option in the CLI.
    ///
    /// The engine never reads this; callers pass the option explicitly.
    pub include_unsynced: bool,

    /// Tracing level filter.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// File to append exported spans to. Span export is off when unset.
    pub trace_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let scoring = ScoringParams::default();
        Self {
            data_file: None,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            weekday_boost: scoring.weekday_boost,
            time_bandwidth_minutes: scoring.time_bandwidth_minutes,
            recency_half_life_days: scoring.recency_half_life_days,
            default_limit: 20,
            max_limit: DEFAULT_MAX_LIMIT,
            include_unsynced: false,
            trace_level: None,
            trace_file: None,
        }
    }
}

/// Parses `value`, keeping `current` when it does not parse.
fn parse_or<T: std::str::FromStr>(key: &str, value: &str, current: T) -> T {
    value.trim().parse().unwrap_or_else(|_| {
        tracing::debug!(key = key, value = value, "ignoring unparsable config value");
        current
    })
}

fn parse_bool_or(key: &str, value: &str, current: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::debug!(key = key, value = value, "ignoring unparsable config value");
            current
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MealcastError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MealcastError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        toml::from_str(&contents)
            .map_err(|e| MealcastError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Builds configuration from string key/value pairs over the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use mealcast::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("lookback_days".to_string(), "30".to_string());
    /// map.insert("weekday_boost".to_string(), "oops".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.lookback_days, 30);
    /// assert_eq!(config.weekday_boost, 1.3);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().merge_map(map)
    }

    /// Overrides fields with values from `map`.
    ///
    /// Unknown keys are ignored. Values that fail to parse keep the current
    /// setting.
    #[must_use]
    pub fn merge_map(mut self, map: &BTreeMap<String, String>) -> Self {
        for (key, value) in map {
            match key.as_str() {
                "data_file" => self.data_file = Some(value.clone()),
                "lookback_days" => self.lookback_days = parse_or(key, value, self.lookback_days),
                "weekday_boost" => self.weekday_boost = parse_or(key, value, self.weekday_boost),
                "time_bandwidth_minutes" => {
                    self.time_bandwidth_minutes = parse_or(key, value, self.time_bandwidth_minutes);
                }
                "recency_half_life_days" => {
                    self.recency_half_life_days = parse_or(key, value, self.recency_half_life_days);
                }
                "default_limit" => self.default_limit = parse_or(key, value, self.default_limit),
                "max_limit" => self.max_limit = parse_or(key, value, self.max_limit),
                "include_unsynced" => {
                    self.include_unsynced = parse_bool_or(key, value, self.include_unsynced);
                }
                "trace_level" => self.trace_level = Some(value.clone()),
                "trace_file" => self.trace_file = Some(value.clone()),
                _ => {}
            }
        }
        self
    }

    /// Checks every tunable is within its supported range.
    ///
    /// # Errors
    ///
    /// Returns [`MealcastError::Config`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        let bad = |message: String| Err(MealcastError::Config(message));

        if self.lookback_days == 0 || self.lookback_days > MAX_LOOKBACK_DAYS {
            return bad(format!(
                "lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}, got {}",
                self.lookback_days
            ));
        }
        if !self.weekday_boost.is_finite() || self.weekday_boost < 1.0 {
            return bad(format!("weekday_boost must be >= 1, got {}", self.weekday_boost));
        }
        if !self.time_bandwidth_minutes.is_finite() || self.time_bandwidth_minutes <= 0.0 {
            return bad(format!(
                "time_bandwidth_minutes must be positive, got {}",
                self.time_bandwidth_minutes
            ));
        }
        if !self.recency_half_life_days.is_finite() || self.recency_half_life_days <= 0.0 {
            return bad(format!(
                "recency_half_life_days must be positive, got {}",
                self.recency_half_life_days
            ));
        }
        if self.max_limit == 0 {
            return bad("max_limit must be positive".to_string());
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return bad(format!(
                "default_limit must be between 1 and max_limit ({}), got {}",
                self.max_limit, self.default_limit
            ));
        }
        Ok(())
    }

    /// Scoring parameters for the context kernel.
    #[must_use]
    pub const fn scoring(&self) -> ScoringParams {
        ScoringParams {
            time_bandwidth_minutes: self.time_bandwidth_minutes,
            recency_half_life_days: self.recency_half_life_days,
            weekday_boost: self.weekday_boost,
        }
    }

    /// Resolved location of the JSON observation store.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.data_file.as_deref().map_or_else(
            || infrastructure::get_data_dir().join("mealcast.json"),
            infrastructure::expand_tilde,
        )
    }
}
