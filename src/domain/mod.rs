//! Domain layer for Mealcast.
//!
//! Core types shared by the ranking engine, the storage seam and the CLI,
//! independent of any particular backend.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`food`]: Foods, observations and ranking results
//!
//! # Examples
//!
//! ```
//! use mealcast::domain::{FoodId, MealSlot, Result};
//!
//! fn default_slot(_food: FoodId) -> Result<MealSlot> {
//!     Ok(MealSlot::Anytime)
//! }
//! ```

pub mod error;
pub mod food;

pub use error::{MealcastError, Result};
pub use food::{
    FoodId, FoodProfile, HistoricalObservation, MealSlot, RankedFood, RankedPage, UserId,
};
