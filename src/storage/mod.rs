//! Storage layer: where historical log entries come from.
//!
//! The engine only sees the [`ObservationStore`] trait. This module also ships
//! a JSON file implementation used by the CLI and the integration tests.
//!
//! # Modules
//!
//! - `backend`: Store trait consumed by the ranking engine
//! - `json`: JSON file-based implementation
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::ObservationStore;
pub use json::{JsonStorage, StorageData};
pub use models::{FoodRecord, LogEntryRecord};
