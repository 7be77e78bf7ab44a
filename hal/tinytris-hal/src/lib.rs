//! Tinytris Hardware Abstraction Layer
//!
//! This crate defines the two-wire bus contract that the display driver is
//! written against. Chip-specific crates implement it on top of their
//! peripheral registers, and the `mock` feature provides a recording double
//! for host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tinytris-display (SSD1306 + renderer)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tinytris-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ tinytris-hal- │       │   MockTwi     │
//! │     avr       │       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::TwiMaster`] - Phase-level master operations (start/write/read/stop)

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key types at crate root for convenience
pub use i2c::{BusError, Direction, PollLimit, SpeedClass, TwiConfig, TwiMaster};
#[cfg(any(test, feature = "mock"))]
pub use mock::{BusEvent, MockTwi};
