//! Storage record models for the persistence layer.
//!
//! These mirror the on-disk layout (a foods table and a log entries table) and
//! stay separate from the domain types; [`LogEntryRecord::join`] is the single
//! place where a row becomes a [`HistoricalObservation`].

use crate::domain::{FoodId, FoodProfile, HistoricalObservation, MealSlot, UserId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A reusable food definition as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub id: FoodId,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: Option<f64>,
    /// Food id on the external fitness platform, absent until synced.
    #[serde(default)]
    pub external_id: Option<String>,
}

impl FoodRecord {
    /// Creates a record with the given identity and zeroed nutrition.
    ///
    /// # Examples
    ///
    /// ```
    /// use mealcast::storage::FoodRecord;
    /// use mealcast::FoodId;
    ///
    /// let record = FoodRecord::new(FoodId(1), "Oatmeal", 1.0, "bowl");
    /// assert_eq!(record.calories, 0.0);
    /// assert!(record.external_id.is_none());
    /// ```
    pub fn new(id: FoodId, name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            brand: None,
            quantity,
            unit: unit.into(),
            calories: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
            fiber_g: None,
            external_id: None,
        }
    }

    /// Nutrition profile carried into observations.
    #[must_use]
    pub fn profile(&self) -> FoodProfile {
        FoodProfile {
            name: self.name.clone(),
            brand: self.brand.clone(),
            quantity: self.quantity,
            unit: self.unit.clone(),
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            fiber_g: self.fiber_g,
            external_id: self.external_id.clone(),
        }
    }
}

/// One logged food as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryRecord {
    pub user_id: UserId,
    pub food_id: FoodId,
    pub date: NaiveDate,
    /// Time of day the food was eaten, if recorded.
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub meal_slot: MealSlot,
}

impl LogEntryRecord {
    /// Joins the entry with its food definition.
    #[must_use]
    pub fn join(&self, food: &FoodRecord) -> HistoricalObservation {
        HistoricalObservation {
            food_id: self.food_id,
            observed_date: self.date,
            observed_time: self.time,
            meal_slot: self.meal_slot,
            food: food.profile(),
        }
    }
}
