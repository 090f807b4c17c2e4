//! Folds scored observations into one [`RankedFood`] per food.
//!
//! Each food keeps two running reductions side by side in a single
//! [`FoodAccumulator`]: the sum of all observation scores (repetition is a
//! signal in itself) and the argmax observation, which supplies the meal slot
//! and nutrition profile shown to the user.
//!
//! Observations are folded in a canonical order rather than the order the
//! store returned them. Floating-point addition is not associative, and the
//! cursor compares exact score bits, so the same rows must always produce the
//! same `total_score`.

use super::scorer::{score_observation, ReferencePoint, ScoringParams};
use crate::domain::{FoodId, HistoricalObservation, RankedFood};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Running state for one food while folding observations.
#[derive(Debug)]
struct FoodAccumulator {
    total_score: f64,
    best_score: f64,
    best: HistoricalObservation,
    count: u32,
    last_logged: NaiveDate,
}

impl FoodAccumulator {
    fn new(observation: HistoricalObservation, score: f64) -> Self {
        Self {
            total_score: score,
            best_score: score,
            last_logged: observation.observed_date,
            best: observation,
            count: 1,
        }
    }

    fn push(&mut self, observation: HistoricalObservation, score: f64) {
        self.total_score += score;
        self.count = self.count.saturating_add(1);
        self.last_logged = self.last_logged.max(observation.observed_date);

        // Equal scores go to the more recent observation.
        let better = score > self.best_score
            || (score == self.best_score && observation.recency_key() > self.best.recency_key());
        if better {
            self.best_score = score;
            self.best = observation;
        }
    }

    fn finish(self) -> RankedFood {
        RankedFood {
            food_id: self.best.food_id,
            food: self.best.food,
            meal_slot: self.best.meal_slot,
            total_score: self.total_score,
            times_logged: self.count,
            last_logged: self.last_logged,
        }
    }
}

/// Fold order: food, then date, time of day and meal slot.
///
/// Rows equal under this order score identically, so summing in this order
/// gives the same bits for any permutation of the input.
fn canonical_order(a: &HistoricalObservation, b: &HistoricalObservation) -> Ordering {
    a.food_id
        .cmp(&b.food_id)
        .then_with(|| a.recency_key().cmp(&b.recency_key()))
}

/// Drops observations of foods never synchronized to the external platform,
/// unless `include_unsynced` asks to keep them.
pub fn filter_unsynced(
    observations: Vec<HistoricalObservation>,
    include_unsynced: bool,
) -> Vec<HistoricalObservation> {
    if include_unsynced {
        return observations;
    }

    let before = observations.len();
    let kept: Vec<_> = observations
        .into_iter()
        .filter(|o| o.food.is_synced())
        .collect();

    tracing::debug!(
        dropped = before - kept.len(),
        kept = kept.len(),
        "filtered unsynced foods"
    );
    kept
}

/// Scores every observation and aggregates them per food.
///
/// For each distinct `food_id` the result carries the sum of its observation
/// scores, the meal slot and profile of its best-scoring observation (ties go
/// to the later [`HistoricalObservation::recency_key`]), the number of
/// observations and the latest logged date.
///
/// # Parameters
///
/// * `observations` - Rows fetched for one user, in any order
/// * `reference` - The moment being ranked for
/// * `params` - Kernel tuning
///
/// # Returns
///
/// One [`RankedFood`] per food, ordered by `food_id`. Sorting by score is the
/// paginator's job. The output depends only on the multiset of inputs, down to
/// the exact bits of each `total_score`.
///
/// # Example
///
/// ```rust
/// use mealcast::ranking::aggregator::aggregate;
/// use mealcast::{ReferencePoint, ScoringParams};
/// use chrono::{NaiveDate, NaiveTime};
///
/// let now = ReferencePoint::new(
///     NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
///     NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
/// );
/// assert!(aggregate(Vec::new(), now, &ScoringParams::default()).is_empty());
/// ```
#[must_use]
pub fn aggregate(
    mut observations: Vec<HistoricalObservation>,
    reference: ReferencePoint,
    params: &ScoringParams,
) -> Vec<RankedFood> {
    let total = observations.len();
    observations.sort_by(canonical_order);

    let mut groups: BTreeMap<FoodId, FoodAccumulator> = BTreeMap::new();

    for observation in observations {
        let score = score_observation(&observation, reference, params);
        match groups.get_mut(&observation.food_id) {
            Some(acc) => acc.push(observation, score),
            None => {
                groups.insert(observation.food_id, FoodAccumulator::new(observation, score));
            }
        }
    }

    tracing::debug!(
        observations = total,
        foods = groups.len(),
        "aggregated observations"
    );

    groups.into_values().map(FoodAccumulator::finish).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FoodProfile, MealSlot};
    use chrono::{Duration, NaiveTime};

    fn reference() -> ReferencePoint {
        ReferencePoint::new(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        )
    }

    fn observation(food: i64, days_ago: i64, hour: u32, slot: MealSlot) -> HistoricalObservation {
        HistoricalObservation {
            food_id: FoodId(food),
            observed_date: reference().date - Duration::days(days_ago),
            observed_time: NaiveTime::from_hms_opt(hour, 0, 0),
            meal_slot: slot,
            food: FoodProfile {
                name: format!("food-{food}"),
                brand: None,
                quantity: 1.0,
                unit: "serving".to_string(),
                calories: 100.0,
                protein_g: 1.0,
                carbs_g: 1.0,
                fat_g: 1.0,
                fiber_g: None,
                external_id: (food % 2 == 0).then(|| format!("ext-{food}")),
            },
        }
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(aggregate(Vec::new(), reference(), &ScoringParams::default()).is_empty());
    }

    #[test]
    fn total_is_sum_of_member_scores() {
        let params = ScoringParams::default();
        let obs = vec![
            observation(2, 0, 8, MealSlot::Breakfast),
            observation(2, 1, 9, MealSlot::Breakfast),
            observation(2, 3, 20, MealSlot::Dinner),
        ];
        let expected: f64 = obs
            .iter()
            .map(|o| score_observation(o, reference(), &params))
            .sum();

        let ranked = aggregate(obs, reference(), &params);
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].total_score - expected).abs() < 1e-12);
        assert_eq!(ranked[0].times_logged, 3);
        assert_eq!(ranked[0].last_logged, reference().date);
    }

    #[test]
    fn meal_slot_comes_from_best_observation() {
        // The dinner entries outnumber breakfast, but breakfast at 08:00 is the
        // single best match for an 08:00 reference.
        let obs = vec![
            observation(2, 5, 19, MealSlot::Dinner),
            observation(2, 0, 8, MealSlot::Breakfast),
            observation(2, 2, 20, MealSlot::Dinner),
        ];
        let ranked = aggregate(obs, reference(), &ScoringParams::default());
        assert_eq!(ranked[0].meal_slot, MealSlot::Breakfast);
    }

    #[test]
    fn input_order_does_not_change_result() {
        let params = ScoringParams::default();
        let rows = vec![
            observation(1, 0, 7, MealSlot::Breakfast),
            observation(1, 3, 9, MealSlot::Snack),
            observation(1, 11, 8, MealSlot::Breakfast),
            observation(1, 1, 13, MealSlot::Lunch),
            observation(2, 2, 8, MealSlot::Breakfast),
        ];
        let forward = aggregate(rows.clone(), reference(), &params);

        let mut reversed = rows.clone();
        reversed.reverse();
        let mut rotated = rows;
        rotated.rotate_left(2);

        for permuted in [reversed, rotated] {
            let ranked = aggregate(permuted, reference(), &params);
            assert_eq!(ranked.len(), forward.len());
            for (a, b) in ranked.iter().zip(&forward) {
                assert_eq!(a.food_id, b.food_id);
                assert_eq!(a.total_score.to_bits(), b.total_score.to_bits());
                assert_eq!(a.meal_slot, b.meal_slot);
            }
        }
    }

    #[test]
    fn equal_best_scores_pick_later_entry() {
        // 07:00 and 09:00 are equally far from the 08:00 reference on the
        // same day; the later one supplies the meal slot in either order.
        let early = observation(2, 0, 7, MealSlot::Breakfast);
        let late = observation(2, 0, 9, MealSlot::Snack);
        let params = ScoringParams::default();

        let a = aggregate(vec![early.clone(), late.clone()], reference(), &params);
        let b = aggregate(vec![late, early], reference(), &params);
        assert_eq!(a[0].meal_slot, MealSlot::Snack);
        assert_eq!(b[0].meal_slot, MealSlot::Snack);
    }

    #[test]
    fn one_result_per_food() {
        let obs = vec![
            observation(4, 0, 8, MealSlot::Breakfast),
            observation(2, 0, 8, MealSlot::Breakfast),
            observation(4, 1, 8, MealSlot::Breakfast),
        ];
        let ranked = aggregate(obs, reference(), &ScoringParams::default());
        let ids: Vec<_> = ranked.iter().map(|r| r.food_id).collect();
        assert_eq!(ids, vec![FoodId(2), FoodId(4)]);
    }

    #[test]
    fn unsynced_foods_are_dropped_unless_requested() {
        let obs = vec![
            observation(1, 0, 8, MealSlot::Snack),
            observation(2, 0, 8, MealSlot::Snack),
        ];
        assert_eq!(filter_unsynced(obs.clone(), false).len(), 1);
        assert_eq!(filter_unsynced(obs, true).len(), 2);
    }
}
