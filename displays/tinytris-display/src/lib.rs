//! SSD1306 driver and board renderer for Tinytris
//!
//! This crate provides:
//! - [`Ssd1306`], a protocol driver over any [`tinytris_hal::TwiMaster`]:
//!   command transactions, addressing windows and borrow-scoped data streams
//! - A renderer that computes every display byte from the packed
//!   occupancy grid and streams it without a frame buffer
//! - The 3x5 hexadecimal digit font used by the counters
//!
//! # Architecture
//!
//! ```text
//!   GameState ──Frame──▶ renderer ──bytes──▶ Ssd1306 ──phases──▶ TwiMaster
//! ```
//!
//! The renderer only reads game state. A failed transaction aborts the
//! current frame and is returned to the caller, which can ask for a full
//! redraw once the bus recovers.

#![no_std]
#![deny(unsafe_code)]

pub mod error;
pub mod glyphs;
pub mod layout;
pub mod renderer;
pub mod ssd1306;

// Re-export key types
pub use error::DisplayError;
pub use renderer::{render_board, render_frame};
pub use ssd1306::{DataStream, DisplayConfig, Ssd1306};
