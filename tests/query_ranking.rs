mod common;

use common::{at, logged, profile, FailingStore, FixtureStore};
use mealcast::ranking::{QueryOptions, RankingEngine};
use mealcast::{HistoricalObservation, MealSlot, MealcastError, UserId};

fn history() -> Vec<HistoricalObservation> {
    vec![
        logged(1, "Greek yogurt", 40, at(7, 30), MealSlot::Breakfast),
        logged(1, "Greek yogurt", 20, at(7, 30), MealSlot::Breakfast),
        logged(1, "Greek yogurt", 5, at(7, 30), MealSlot::Breakfast),
        logged(2, "Yogurt smoothie", 1, at(16, 0), MealSlot::Snack),
        logged(3, "Vanilla yogurt", 3, at(21, 0), MealSlot::Snack),
        logged(4, "Pasta", 0, at(19, 0), MealSlot::Dinner),
        // Older than any context window; search still sees it.
        logged(5, "Yogurt bark", 400, at(15, 0), MealSlot::Snack),
        logged(5, "Yogurt bark", 401, at(15, 0), MealSlot::Snack),
    ]
}

#[test]
fn orders_by_count_then_recency() {
    let engine = RankingEngine::new(FixtureStore::new(history()));
    let foods = engine
        .rank_by_query(UserId(1), "yogurt", &QueryOptions::new(10))
        .unwrap();

    let ids: Vec<_> = foods.iter().map(|f| f.food_id.0).collect();
    assert_eq!(ids, vec![1, 5, 2, 3]);
    assert_eq!(foods[0].times_logged, 3);
    assert_eq!(foods[0].meal_slot, MealSlot::Breakfast);
}

#[test]
fn limit_truncates_results() {
    let engine = RankingEngine::new(FixtureStore::new(history()));
    let foods = engine
        .rank_by_query(UserId(1), "yogurt", &QueryOptions::new(2))
        .unwrap();
    assert_eq!(foods.len(), 2);
}

#[test]
fn blank_query_skips_the_store() {
    let engine = RankingEngine::new(FixtureStore::new(history()));
    let foods = engine
        .rank_by_query(UserId(1), "  ", &QueryOptions::new(10))
        .unwrap();
    assert!(foods.is_empty());
    assert_eq!(engine.store().fetch_count(), 0);
}

#[test]
fn unknown_user_has_no_results() {
    let engine = RankingEngine::new(FixtureStore::new(history()));
    let foods = engine
        .rank_by_query(UserId(2), "yogurt", &QueryOptions::new(10))
        .unwrap();
    assert!(foods.is_empty());
}

#[test]
fn unsynced_foods_are_filtered_by_default() {
    let mut rows = history();
    rows.push(HistoricalObservation {
        food: profile(6, "Homemade yogurt", false),
        ..logged(6, "Homemade yogurt", 0, at(8, 0), MealSlot::Breakfast)
    });
    let engine = RankingEngine::new(FixtureStore::new(rows));

    let synced = engine
        .rank_by_query(UserId(1), "homemade", &QueryOptions::new(10))
        .unwrap();
    assert!(synced.is_empty());

    let options = QueryOptions {
        include_unsynced: true,
        ..QueryOptions::new(10)
    };
    let all = engine.rank_by_query(UserId(1), "homemade", &options).unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn invalid_limit_and_store_failure() {
    let engine = RankingEngine::new(FailingStore);
    assert!(matches!(
        engine.rank_by_query(UserId(1), "yogurt", &QueryOptions::new(0)),
        Err(MealcastError::InvalidParameters(_))
    ));
    assert!(matches!(
        engine.rank_by_query(UserId(1), "yogurt", &QueryOptions::new(10)),
        Err(MealcastError::UpstreamFetchFailed(_))
    ));
}
