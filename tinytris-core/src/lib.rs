//! Board-agnostic game logic for Tinytris
//!
//! This crate contains everything that does not touch the bus:
//!
//! - Packed occupancy grid and the active tile (placement, collision,
//!   line clearing)
//! - Mapping between display pages/rows and grid cells
//! - Game phase machine, scoring, levels and gravity
//! - Input commands and the interrupt-to-loop queue
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod config;
pub mod input;
pub mod rng;
pub mod state;

pub use board::{Board, BoardError, OccupancyGrid, Tile, TileKind};
pub use config::{GameConfig, Radix};
pub use input::{InputCommand, InputQueue};
pub use state::{Frame, GameState, Phase, Redraw};
