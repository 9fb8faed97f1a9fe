//! Client session handling
//!
//! One task per connection, reading requests until the client quits.

pub mod handler;

pub use handler::{SessionLimits, handle_client};
