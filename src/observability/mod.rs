//! Tracing setup for the library and CLI.
//!
//! Every module logs through `tracing`. [`init_tracing`] installs the
//! subscriber:
//!
//! ```text
//! tracing macros ─┬─ EnvFilter ─ fmt layer ───────────────────────→ stderr
//!                 └─ EnvFilter ─ OpenTelemetry layer ─ SpanFileExporter → JSON lines
//! ```
//!
//! The OpenTelemetry branch is only attached when `trace_file` is configured.
//! Each finished span becomes one JSON object per line, and the file is
//! rotated once it grows past a size limit.
//!
//! # Configuration
//!
//! Level is resolved from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`crate::Config`]
//! 3. Default: `"info"`

mod exporter;
mod init;

pub use init::init_tracing;
