//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / discovery / cache produce:
//!     → tracing events (cache hits, discovery, snapshot writes)
//!     → metrics.rs (counters through the `metrics` facade)
//!
//! The embedding application owns:
//!     → logging.rs (subscriber installation)
//!     → any metrics exporter
//! ```
//!
//! # Design Decisions
//! - The library only emits; it never installs a global recorder
//! - Metric updates are cheap no-ops when no recorder is installed

pub mod logging;
pub mod metrics;
