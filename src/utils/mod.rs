//! Utility functions
//!
//! Provides logging setup and the diagnostic sink.

pub mod logging;

pub use logging::{DiagnosticSink, LogSink, MemorySink, setup_logging};
