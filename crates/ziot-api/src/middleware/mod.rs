//! # HTTP Middleware
//!
//! Prometheus request metrics. Tracing is layered directly in `lib.rs`
//! via `tower_http::trace::TraceLayer`.

pub mod metrics;
