//! Configuration types
//!
//! Game tuning values. All state is volatile; nothing here is persisted.

pub mod types;

pub use types::*;
