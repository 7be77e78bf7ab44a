//! Two-wire bus abstractions
//!
//! The display is driven with hand-sequenced transactions rather than
//! whole-buffer writes: a frame is streamed one byte at a time inside a
//! single open transaction, so the contract is expressed per bus phase.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors reported by a single bus phase
///
/// None of these are retried by the bus layer. Retry policy belongs to the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Another master drove the bus during the address phase
    ArbitrationLost,
    /// The receiver did not pull SDA low for the address or data byte
    NotAcknowledged,
    /// A status flag did not rise within the configured poll limit
    Timeout,
}

impl embedded_hal::i2c::Error for BusError {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

        match self {
            BusError::ArbitrationLost => ErrorKind::ArbitrationLoss,
            BusError::NotAcknowledged => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            BusError::Timeout => ErrorKind::Other,
        }
    }
}

/// Transfer direction encoded in the address byte's R/W bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Master transmits (R/W = 0)
    Write,
    /// Master receives (R/W = 1)
    Read,
}

impl Direction {
    /// Value of the R/W bit
    pub const fn bit(self) -> u8 {
        match self {
            Direction::Write => 0,
            Direction::Read => 1,
        }
    }
}

/// Bus clock presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedClass {
    /// 100 kHz
    #[default]
    Standard,
    /// 400 kHz
    Fast,
    /// 800 kHz (fast mode timing, overclocked)
    FastPlus800,
    /// ~1.1 MHz (fast mode plus drive strength)
    FastPlus,
}

impl SpeedClass {
    /// Map a requested rate in kHz onto a preset
    ///
    /// Anything outside the documented set falls back to the slowest class.
    pub const fn from_khz(khz: u16) -> Self {
        match khz {
            100 => SpeedClass::Standard,
            400 => SpeedClass::Fast,
            800 => SpeedClass::FastPlus800,
            1100 => SpeedClass::FastPlus,
            _ => SpeedClass::Standard,
        }
    }

    /// Nominal SCL frequency in Hz
    pub const fn frequency(self) -> u32 {
        match self {
            SpeedClass::Standard => 100_000,
            SpeedClass::Fast => 400_000,
            SpeedClass::FastPlus800 => 800_000,
            SpeedClass::FastPlus => 1_100_000,
        }
    }
}

/// Upper bound on a status-flag busy-wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PollLimit {
    /// Give up after this many status reads
    Iterations(u32),
    /// Spin until the hardware answers
    Unbounded,
}

impl PollLimit {
    /// Whether `spent` status reads have used up the budget
    pub const fn exhausted(self, spent: u32) -> bool {
        match self {
            PollLimit::Iterations(max) => spent >= max,
            PollLimit::Unbounded => false,
        }
    }
}

impl Default for PollLimit {
    fn default() -> Self {
        // Roughly 10 ms at 20 MHz with a handful of cycles per status read
        PollLimit::Iterations(50_000)
    }
}

/// Bus configuration, applied once when the bus is brought up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwiConfig {
    /// Clock preset
    pub speed: SpeedClass,
    /// Poll bound for start/write/read phases
    pub poll_limit: PollLimit,
}

impl Default for TwiConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TwiConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        speed: SpeedClass::Standard,
        poll_limit: PollLimit::Iterations(50_000),
    };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self {
        speed: SpeedClass::Fast,
        poll_limit: PollLimit::Iterations(50_000),
    };

    /// Fast mode plus (~1.1 MHz), what the game runs at
    pub const FAST_PLUS: Self = Self {
        speed: SpeedClass::FastPlus,
        poll_limit: PollLimit::Iterations(50_000),
    };

    /// Same preset with a different poll bound
    pub const fn with_poll_limit(self, poll_limit: PollLimit) -> Self {
        Self {
            speed: self.speed,
            poll_limit,
        }
    }
}

/// Master-mode two-wire bus, one phase per call
///
/// A transaction is `start` → any number of `write_byte`/`read_byte` →
/// `stop`. Only one transaction may be open on the bus at a time and
/// nothing here checks that; callers keep the discipline.
pub trait TwiMaster {
    /// Drive a start condition and the address byte
    ///
    /// # Arguments
    /// * `address` - 7-bit slave address
    /// * `direction` - R/W bit to send with the address
    ///
    /// On `Err(ArbitrationLost)` the bus is not ours and no stop may be
    /// sent. On any error the data phase must not begin.
    fn start(&mut self, address: u8, direction: Direction) -> Result<(), BusError>;

    /// Shift one byte out and report the receiver's acknowledgement
    fn write_byte(&mut self, byte: u8) -> Result<(), BusError>;

    /// Shift one byte in
    ///
    /// `last` answers the byte with NACK so the slave releases SDA for the
    /// stop condition; otherwise the master ACKs and keeps receiving.
    fn read_byte(&mut self, last: bool) -> Result<u8, BusError>;

    /// Issue a stop condition (fire-and-forget)
    fn stop(&mut self);
}

impl<T: TwiMaster + ?Sized> TwiMaster for &mut T {
    fn start(&mut self, address: u8, direction: Direction) -> Result<(), BusError> {
        T::start(self, address, direction)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        T::write_byte(self, byte)
    }

    fn read_byte(&mut self, last: bool) -> Result<u8, BusError> {
        T::read_byte(self, last)
    }

    fn stop(&mut self) {
        T::stop(self)
    }
}
