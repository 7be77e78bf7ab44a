//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest level the gravity table distinguishes
pub const MAX_LEVEL: u8 = 29;

/// How counters are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Radix {
    /// Decimal digits (BCD), saturating at all nines
    #[default]
    Decimal,
    /// Raw hexadecimal nibbles
    Hex,
}

/// Game tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameConfig {
    /// Seed for the tile sequence
    pub seed: u32,
    /// Level a new game starts at (0-29)
    pub start_level: u8,
    /// Cleared lines needed per level up
    pub lines_per_level: u8,
    /// Counter digit style
    pub radix: Radix,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_7E75,
            start_level: 0,
            lines_per_level: 10,
            radix: Radix::Decimal,
        }
    }
}

impl GameConfig {
    /// Clamp out-of-range values into something playable
    pub fn sanitized(self) -> Self {
        Self {
            start_level: self.start_level.min(MAX_LEVEL),
            lines_per_level: self.lines_per_level.max(1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.start_level, 0);
        assert_eq!(config.lines_per_level, 10);
        assert_eq!(config.radix, Radix::Decimal);
    }

    #[test]
    fn test_sanitized() {
        let config = GameConfig {
            start_level: 200,
            lines_per_level: 0,
            ..GameConfig::default()
        }
        .sanitized();
        assert_eq!(config.start_level, MAX_LEVEL);
        assert_eq!(config.lines_per_level, 1);
    }
}
