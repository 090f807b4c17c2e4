//! Text search ranking over a user's logged foods.
//!
//! A separate strategy from the context kernel: foods whose name matches the
//! query are ordered by how often they were logged, then by how recently.
//! Output uses the same [`RankedFood`] shape with `total_score` set to the log
//! count.

use crate::domain::{FoodId, HistoricalObservation, RankedFood};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Per-food history summary.
#[derive(Debug)]
struct HistoryEntry {
    latest: HistoricalObservation,
    count: u32,
}

/// Splits a query into lowercase tokens; blank queries give no tokens.
fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

fn matches_all(matcher: &SkimMatcherV2, observation: &HistoricalObservation, tokens: &[String]) -> bool {
    let mut haystack = observation.food.name.to_lowercase();
    if let Some(brand) = &observation.food.brand {
        haystack.push(' ');
        haystack.push_str(&brand.to_lowercase());
    }
    tokens
        .iter()
        .all(|token| matcher.fuzzy_match(&haystack, token).is_some())
}

/// Search order: most logged first, then most recently logged, then id.
#[must_use]
pub fn compare_by_history(a: &RankedFood, b: &RankedFood) -> Ordering {
    b.times_logged
        .cmp(&a.times_logged)
        .then_with(|| b.last_logged.cmp(&a.last_logged))
        .then_with(|| a.food_id.cmp(&b.food_id))
}

/// Ranks foods in `history` whose name matches `query`.
///
/// Every whitespace-separated token must fuzzy-match the food's name or brand.
/// A blank query matches nothing. Each result takes its meal slot and profile
/// from the food's latest entry by [`HistoricalObservation::recency_key`], so
/// two entries on the same day are told apart by time of day.
///
/// # Parameters
///
/// * `history` - The user's full history, in any order
/// * `query` - Free text typed by the user
/// * `limit` - Maximum number of results
///
/// # Returns
///
/// Matching foods, most logged first, then most recently logged, then by id.
/// `total_score` holds the log count.
///
/// # Example
///
/// ```rust
/// use mealcast::ranking::search::rank_by_history;
///
/// assert!(rank_by_history(Vec::new(), "oats", 10).is_empty());
/// ```
#[must_use]
pub fn rank_by_history(history: Vec<HistoricalObservation>, query: &str, limit: usize) -> Vec<RankedFood> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut foods: BTreeMap<FoodId, HistoryEntry> = BTreeMap::new();
    for observation in history {
        match foods.get_mut(&observation.food_id) {
            Some(entry) => {
                entry.count = entry.count.saturating_add(1);
                if observation.recency_key() > entry.latest.recency_key() {
                    entry.latest = observation;
                }
            }
            None => {
                foods.insert(
                    observation.food_id,
                    HistoryEntry {
                        latest: observation,
                        count: 1,
                    },
                );
            }
        }
    }

    let matcher = SkimMatcherV2::default();
    let mut ranked: Vec<RankedFood> = foods
        .into_values()
        .filter(|entry| matches_all(&matcher, &entry.latest, &tokens))
        .map(|entry| RankedFood {
            food_id: entry.latest.food_id,
            meal_slot: entry.latest.meal_slot,
            total_score: f64::from(entry.count),
            times_logged: entry.count,
            last_logged: entry.latest.observed_date,
            food: entry.latest.food,
        })
        .collect();

    ranked.sort_by(compare_by_history);
    ranked.truncate(limit);

    tracing::debug!(
        tokens = tokens.len(),
        matched = ranked.len(),
        "ranked foods by history"
    );

    ranked
}
