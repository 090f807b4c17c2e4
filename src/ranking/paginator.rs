//! Tie-safe keyset pagination over ranked foods.
//!
//! Results are ordered by `total_score` descending, then `food_id` ascending.
//! That order is total, so "strictly after the cursor" is well defined even
//! when many foods share a score.

use super::cursor::PageCursor;
use crate::domain::{FoodId, RankedFood, RankedPage};
use std::cmp::Ordering;

/// Compares two sort positions; `Less` means `a` comes first.
fn compare_position(a_score: f64, a_id: FoodId, b_score: f64, b_id: FoodId) -> Ordering {
    b_score.total_cmp(&a_score).then_with(|| a_id.cmp(&b_id))
}

/// Ordering used for every ranked listing.
#[must_use]
pub fn compare_ranked(a: &RankedFood, b: &RankedFood) -> Ordering {
    compare_position(a.total_score, a.food_id, b.total_score, b.food_id)
}

/// Sorts in place into display order.
pub fn sort_ranked(items: &mut [RankedFood]) {
    items.sort_by(compare_ranked);
}

/// Whether `item` sorts strictly after the cursor position.
#[must_use]
pub fn is_after(item: &RankedFood, cursor: &PageCursor) -> bool {
    compare_position(item.total_score, item.food_id, cursor.score, cursor.food_id)
        == Ordering::Greater
}

/// Sorts `items` and cuts out the page following `cursor`.
///
/// A next cursor is emitted only when the page is full and more items remain
/// past it. `limit` must be positive; the engine validates it before calling.
///
/// # Parameters
///
/// * `items` - Every ranked food for the request, in any order
/// * `cursor` - Decoded position of the previous page's last item, if any
/// * `limit` - Page size
///
/// # Returns
///
/// Up to `limit` items sorting strictly after `cursor`, plus the token for
/// the following page.
///
/// # Example
///
/// ```rust
/// use mealcast::ranking::paginator::paginate;
///
/// let page = paginate(Vec::new(), None, 10);
/// assert!(page.items.is_empty());
/// assert!(page.next_cursor.is_none());
/// ```
#[must_use]
pub fn paginate(mut items: Vec<RankedFood>, cursor: Option<&PageCursor>, limit: usize) -> RankedPage {
    sort_ranked(&mut items);

    let start = cursor.map_or(0, |c| items.partition_point(|item| !is_after(item, c)));
    let mut remaining = items.into_iter().skip(start);
    let page: Vec<RankedFood> = remaining.by_ref().take(limit).collect();
    let has_more = remaining.next().is_some();

    let next_cursor = if has_more && page.len() == limit {
        page.last().map(|last| PageCursor::after(last).encode())
    } else {
        None
    };

    tracing::debug!(
        start = start,
        returned = page.len(),
        has_more = has_more,
        "page sliced"
    );

    RankedPage {
        items: page,
        next_cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FoodProfile, MealSlot};
    use chrono::NaiveDate;

    fn ranked(id: i64, score: f64) -> RankedFood {
        RankedFood {
            food_id: FoodId(id),
            food: FoodProfile {
                name: format!("food-{id}"),
                brand: None,
                quantity: 1.0,
                unit: "g".to_string(),
                calories: 0.0,
                protein_g: 0.0,
                carbs_g: 0.0,
                fat_g: 0.0,
                fiber_g: None,
                external_id: None,
            },
            meal_slot: MealSlot::Anytime,
            total_score: score,
            times_logged: 1,
            last_logged: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        }
    }

    fn ids(page: &RankedPage) -> Vec<i64> {
        page.items.iter().map(|i| i.food_id.0).collect()
    }

    #[test]
    fn empty_input_gives_empty_page_without_cursor() {
        let page = paginate(Vec::new(), None, 10);
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn orders_by_score_then_id() {
        let items = vec![ranked(30, 1.0), ranked(5, 2.0), ranked(10, 1.0)];
        let page = paginate(items, None, 10);
        assert_eq!(ids(&page), vec![5, 10, 30]);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn ties_split_across_pages() {
        let items = vec![ranked(30, 1.0), ranked(10, 1.0), ranked(20, 1.0)];

        let first = paginate(items.clone(), None, 2);
        assert_eq!(ids(&first), vec![10, 20]);
        let token = first.next_cursor.expect("first page should have a cursor");

        let cursor = PageCursor::decode(&token).unwrap();
        let second = paginate(items, Some(&cursor), 2);
        assert_eq!(ids(&second), vec![30]);
        assert!(second.next_cursor.is_none());
    }

    #[test]
    fn exact_fit_emits_no_cursor() {
        let items = vec![ranked(1, 3.0), ranked(2, 2.0)];
        let page = paginate(items, None, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn cursor_past_the_end_gives_empty_page() {
        let items = vec![ranked(1, 3.0), ranked(2, 2.0)];
        let cursor = PageCursor::new(0.5, FoodId(0));
        let page = paginate(items, Some(&cursor), 5);
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn cursor_for_vanished_item_still_resumes_in_order() {
        // The item the cursor points at (id 15) no longer exists.
        let items = vec![ranked(10, 1.0), ranked(20, 1.0), ranked(1, 0.5)];
        let cursor = PageCursor::new(1.0, FoodId(15));
        let page = paginate(items, Some(&cursor), 5);
        assert_eq!(ids(&page), vec![20, 1]);
    }
}
