//! HTTP request handlers organized by capability
//!
//! Handlers validate their input, call the advisor once, and shape the reply.

pub mod chat;
pub mod home;
pub mod receipts;
pub mod summary;
pub mod transcribe;

// Re-export all handlers for use in router
pub use chat::*;
pub use home::*;
pub use receipts::*;
pub use summary::*;
pub use transcribe::*;
