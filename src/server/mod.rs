//! Server core functionality
//!
//! Listener setup, wiring of the intake pipeline and the accept loop.

pub mod core;

pub use self::core::Server;
