//! tinyAVR 0/1-series HAL for the Tinytris firmware
//!
//! This crate implements the `tinytris-hal` bus contract on the TWI0
//! peripheral in polled master mode. It supports the parts that share the
//! TWI0 register layout:
//!
//! - ATtiny202/402/412/...
//! - ATtiny1614/1616/3216/...
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! ```ignore
//! let regs = unsafe { Mmio::twi0() };
//! let mut bus = PolledTwi::new(regs, TwiConfig::FAST_PLUS);
//! bus.start(0x3C, Direction::Write)?;
//! ```
//!
//! The engine only talks to a [`TwiRegisters`] block, so it can be driven
//! by the memory-mapped peripheral or by a simulated register file.

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod regs;

pub use i2c::PolledTwi;
pub use regs::{Mmio, Reg, TwiRegisters, TWI0_BASE};

// Re-export shared types from tinytris-hal
pub use tinytris_hal::{BusError, Direction, PollLimit, SpeedClass, TwiConfig, TwiMaster};
