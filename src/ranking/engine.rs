//! Public ranking entry points.
//!
//! [`RankingEngine`] owns an injected [`ObservationStore`] and exposes the two
//! ranking strategies:
//!
//! - [`RankingEngine::rank_by_context`]: "what is this user likely eating now",
//!   scored by the time/recency/weekday kernel and paged with a cursor.
//! - [`RankingEngine::rank_by_query`]: text search ordered by logging history.
//!
//! Each call fetches a fresh snapshot from the store and computes everything
//! from it; nothing is cached between calls. A cursor from an earlier page is
//! applied to whatever the new snapshot holds, so entries logged between pages
//! can shift the ranking.

use super::aggregator::{aggregate, filter_unsynced};
use super::cursor::PageCursor;
use super::paginator::paginate;
use super::scorer::{ReferencePoint, ScoringParams};
use super::search::rank_by_history;
use crate::domain::{MealcastError, RankedFood, RankedPage, Result, UserId};
use crate::storage::ObservationStore;
use crate::Config;

/// Default lookback window for context ranking, in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;

/// Largest accepted lookback window, in days.
pub const MAX_LOOKBACK_DAYS: u32 = 365;

/// Default ceiling on page size.
pub const DEFAULT_MAX_LIMIT: usize = 100;

/// Options for [`RankingEngine::rank_by_context`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOptions {
    /// Page size, between 1 and the engine's maximum.
    pub limit: usize,
    /// Token from a previous page's `next_cursor`.
    pub cursor: Option<String>,
    /// Keep foods that were never synced to the external platform.
    pub include_unsynced: bool,
}

impl ContextOptions {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            cursor: None,
            include_unsynced: false,
        }
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    #[must_use]
    pub fn with_unsynced(mut self, include_unsynced: bool) -> Self {
        self.include_unsynced = include_unsynced;
        self
    }
}

/// Options for [`RankingEngine::rank_by_query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub limit: usize,
    pub include_unsynced: bool,
}

impl QueryOptions {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            include_unsynced: false,
        }
    }
}

/// Ranks a user's logged foods using an injected store.
///
/// # Examples
///
/// ```no_run
/// use chrono::{NaiveDate, NaiveTime};
/// use mealcast::ranking::{ContextOptions, RankingEngine, ReferencePoint};
/// use mealcast::storage::JsonStorage;
/// use mealcast::UserId;
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::open(PathBuf::from("/tmp/mealcast.json"))?;
/// let engine = RankingEngine::new(storage);
/// let now = ReferencePoint::new(
///     NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
///     NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
/// );
/// let page = engine.rank_by_context(UserId(1), now, &ContextOptions::new(20))?;
/// for food in &page.items {
///     println!("{} {:.3}", food.food.name, food.total_score);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RankingEngine<S> {
    store: S,
    params: ScoringParams,
    lookback_days: u32,
    max_limit: usize,
}

impl<S: ObservationStore> RankingEngine<S> {
    /// Creates an engine with default tuning.
    pub fn new(store: S) -> Self {
        Self {
            store,
            params: ScoringParams::default(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }

    /// Creates an engine tuned from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MealcastError::Config`] if the configuration is out of range.
    pub fn from_config(store: S, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            params: config.scoring(),
            lookback_days: config.lookback_days,
            max_limit: config.max_limit,
        })
    }

    /// Replaces the scoring parameters.
    #[must_use]
    pub fn with_params(mut self, params: ScoringParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the lookback window.
    ///
    /// # Errors
    ///
    /// Returns [`MealcastError::InvalidParameters`] unless
    /// `1 <= days <= MAX_LOOKBACK_DAYS`.
    pub fn with_lookback_days(mut self, days: u32) -> Result<Self> {
        if days == 0 || days > MAX_LOOKBACK_DAYS {
            return Err(MealcastError::InvalidParameters(format!(
                "lookback must be between 1 and {MAX_LOOKBACK_DAYS} days, got {days}"
            )));
        }
        self.lookback_days = days;
        Ok(self)
    }

    #[must_use]
    pub const fn params(&self) -> &ScoringParams {
        &self.params
    }

    #[must_use]
    pub const fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn check_limit(&self, limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(MealcastError::InvalidParameters(
                "limit must be positive".to_string(),
            ));
        }
        if limit > self.max_limit {
            return Err(MealcastError::InvalidParameters(format!(
                "limit {limit} exceeds maximum of {}",
                self.max_limit
            )));
        }
        Ok(())
    }

    /// Ranks foods by how well their history matches `reference`.
    ///
    /// The cursor is decoded before the store is queried, so a bad token
    /// never costs a fetch. An empty history yields an empty page with no
    /// cursor.
    ///
    /// # Errors
    ///
    /// - [`MealcastError::InvalidParameters`] for a zero or oversized limit
    /// - [`MealcastError::InvalidCursor`] for an undecodable cursor
    /// - [`MealcastError::UpstreamFetchFailed`] if the store query fails
    pub fn rank_by_context(
        &self,
        user: UserId,
        reference: ReferencePoint,
        options: &ContextOptions,
    ) -> Result<RankedPage> {
        let _span = tracing::debug_span!("rank_by_context",
            user_id = %user,
            reference_date = %reference.date,
            reference_time = %reference.time,
            limit = options.limit,
            has_cursor = options.cursor.is_some(),
            include_unsynced = options.include_unsynced
        )
        .entered();

        self.check_limit(options.limit)?;
        let cursor = options
            .cursor
            .as_deref()
            .map(PageCursor::decode)
            .transpose()?;

        let observations = self
            .store
            .fetch_observations(user, reference.date, self.lookback_days)
            .map_err(|e| {
                tracing::warn!(error = %e, "observation fetch failed");
                MealcastError::UpstreamFetchFailed(Box::new(e))
            })?;

        let observations = filter_unsynced(observations, options.include_unsynced);
        let ranked = aggregate(observations, reference, &self.params);
        let page = paginate(ranked, cursor.as_ref(), options.limit);

        tracing::debug!(
            returned = page.items.len(),
            has_next = page.next_cursor.is_some(),
            "context ranking complete"
        );

        Ok(page)
    }

    /// Ranks foods whose name matches `query` by logging history.
    ///
    /// # Errors
    ///
    /// - [`MealcastError::InvalidParameters`] for a zero or oversized limit
    /// - [`MealcastError::UpstreamFetchFailed`] if the store query fails
    pub fn rank_by_query(
        &self,
        user: UserId,
        query: &str,
        options: &QueryOptions,
    ) -> Result<Vec<RankedFood>> {
        let _span = tracing::debug_span!("rank_by_query",
            user_id = %user,
            query_len = query.len(),
            limit = options.limit
        )
        .entered();

        self.check_limit(options.limit)?;
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let history = self.store.fetch_history(user).map_err(|e| {
            tracing::warn!(error = %e, "history fetch failed");
            MealcastError::UpstreamFetchFailed(Box::new(e))
        })?;

        let history = filter_unsynced(history, options.include_unsynced);
        Ok(rank_by_history(history, query, options.limit))
    }
}
