//! Food and observation domain model.
//!
//! A user logs reusable food definitions; every log line becomes a
//! [`HistoricalObservation`] once it is fetched from storage. Ranking folds
//! observations into one [`RankedFood`] per food, and pages of those are handed
//! back to callers as a [`RankedPage`].

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a reusable food definition.
///
/// Doubles as the tie-break key when two foods have the same score, so its
/// ordering (plain numeric) is part of the pagination contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodId(pub i64);

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user whose history is being ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Meal slot a log entry was filed under.
///
/// The derived ordering (declaration order) only serves as a final
/// deterministic tie-break between otherwise identical log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    #[default]
    Anytime,
}

impl MealSlot {
    /// Lowercase tag used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
            Self::Anytime => "anytime",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            "anytime" => Ok(Self::Anytime),
            other => Err(format!("unknown meal slot `{other}`")),
        }
    }
}

/// Nutrition profile of a food definition.
///
/// Copied verbatim into ranking results. Observations of the same food are
/// expected to carry identical profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodProfile {
    pub name: String,
    pub brand: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: Option<f64>,
    /// Identifier on the external fitness platform, `None` if the food was
    /// never synchronized.
    pub external_id: Option<String>,
}

impl FoodProfile {
    /// Whether the food has been synchronized to the external platform.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.external_id.is_some()
    }
}

/// One past instance of a food being logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalObservation {
    pub food_id: FoodId,
    pub observed_date: NaiveDate,
    /// `None` when the log entry carries no time of day.
    pub observed_time: Option<NaiveTime>,
    pub meal_slot: MealSlot,
    pub food: FoodProfile,
}

impl HistoricalObservation {
    /// When the entry was logged, as a totally ordered key.
    ///
    /// Compares date, then time of day (a missing time sorts before any
    /// recorded one), then meal slot. Later entries compare greater.
    #[must_use]
    pub fn recency_key(&self) -> (NaiveDate, Option<NaiveTime>, MealSlot) {
        (self.observed_date, self.observed_time, self.meal_slot)
    }
}

/// Aggregated ranking result for one food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFood {
    pub food_id: FoodId,
    pub food: FoodProfile,
    /// Meal slot of the single most relevant contributing observation.
    pub meal_slot: MealSlot,
    pub total_score: f64,
    /// Number of observations folded into this result.
    pub times_logged: u32,
    pub last_logged: NaiveDate,
}

/// One page of context ranking results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankedPage {
    pub items: Vec<RankedFood>,
    /// Opaque token for the next page; `None` once results are exhausted.
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_slot_parses_case_insensitively() {
        assert_eq!("Breakfast".parse::<MealSlot>(), Ok(MealSlot::Breakfast));
        assert_eq!(" SNACK ".parse::<MealSlot>(), Ok(MealSlot::Snack));
        assert!("brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn meal_slot_serializes_lowercase() {
        let json = serde_json::to_string(&MealSlot::Dinner).unwrap();
        assert_eq!(json, "\"dinner\"");
    }

    #[test]
    fn recency_key_orders_by_date_then_time() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let observation = |time: Option<NaiveTime>, slot: MealSlot| HistoricalObservation {
            food_id: FoodId(1),
            observed_date: date,
            observed_time: time,
            meal_slot: slot,
            food: FoodProfile {
                name: "Toast".to_string(),
                brand: None,
                quantity: 1.0,
                unit: "slice".to_string(),
                calories: 80.0,
                protein_g: 3.0,
                carbs_g: 15.0,
                fat_g: 1.0,
                fiber_g: None,
                external_id: None,
            },
        };

        let untimed = observation(None, MealSlot::Snack);
        let morning = observation(NaiveTime::from_hms_opt(7, 0, 0), MealSlot::Breakfast);
        let evening = observation(NaiveTime::from_hms_opt(19, 0, 0), MealSlot::Dinner);
        assert!(untimed.recency_key() < morning.recency_key());
        assert!(morning.recency_key() < evening.recency_key());

        let yesterday = HistoricalObservation {
            observed_date: date.pred_opt().unwrap(),
            ..evening.clone()
        };
        assert!(yesterday.recency_key() < untimed.recency_key());
    }

    #[test]
    fn food_id_orders_numerically() {
        assert!(FoodId(20) < FoodId(100));
        assert_eq!(serde_json::to_string(&FoodId(7)).unwrap(), "7");
    }
}
