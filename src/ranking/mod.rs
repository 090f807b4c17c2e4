//! Ranking layer: scoring, aggregation and pagination.
//!
//! # Modules
//!
//! - [`kernel`]: Time-of-day, recency and weekday weighting functions
//! - [`scorer`]: Combines the kernels into one score per observation
//! - [`aggregator`]: Sums scores per food, keeps the best observation's context
//! - [`cursor`]: Versioned, opaque continuation tokens
//! - [`paginator`]: Total ordering and keyset page slicing
//! - [`search`]: Text search ranked by logging history
//! - [`engine`]: Public entry points over an injected store

pub mod aggregator;
pub mod cursor;
pub mod engine;
pub mod kernel;
pub mod paginator;
pub mod scorer;
pub mod search;

pub use cursor::PageCursor;
pub use engine::{ContextOptions, QueryOptions, RankingEngine};
pub use scorer::{score_observation, ReferencePoint, ScoringParams};
