//! Telemetry for SkyScene
//!
//! This crate carries the analytics side of the scene: weather updates, city
//! changes, skybox selections and image downloads are reported as
//! [`TelemetryEvent`]s through an optional [`Telemetry`] handle.
//!
//! # Features
//!
//! - **Optional collaborator**: [`Telemetry::disabled()`] turns every call
//!   into a no-op, so components never check for a missing sink
//! - **Fire-and-forget**: recording never blocks and never fails the caller
//! - **Sinks**: [`LogSink`] (tracing), [`MemorySink`] (in-process buffer),
//!   [`HttpSink`] (JSON collector)
//! - **Configuration Extension**: [`AnalyticsConfigExt`] and
//!   [`telemetry_from_config`] when the `skyconfig` feature is enabled
//!
//! # Example
//!
//! ```
//! use skytelemetry::{MemorySink, Telemetry};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let telemetry = Telemetry::new(sink.clone());
//!
//! telemetry.record_fetch_outcome("https://example.com/a.png", true, "");
//! assert_eq!(sink.len(), 1);
//! ```

pub mod error;
pub mod event;
pub mod http;
pub mod sink;

#[cfg(feature = "skyconfig")]
pub mod config_ext;

// Re-exports
pub use error::{Error, Result};
pub use event::{EventEnvelope, TelemetryEvent, EVENT_TIME_FORMAT};
pub use http::{HttpSink, HttpSinkBuilder};
pub use sink::{LogSink, MemorySink, Telemetry, TelemetrySink};

#[cfg(feature = "skyconfig")]
pub use config_ext::{telemetry_from_config, AnalyticsConfigExt};
