//! Score, high score, lines and level
//!
//! Counters are drawn as digit pairs: one byte per two digits, most
//! significant pair first, the left digit in the high nibble.

use heapless::Vec;

use crate::config::Radix;

/// Most digit pairs any counter uses
pub const MAX_PAIRS: usize = 2;

/// Digit pairs of one counter, most significant first
pub type DigitPairs = Vec<u8, MAX_PAIRS>;

/// The on-screen counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterKind {
    Score,
    HighScore,
    Lines,
    Level,
}

impl CounterKind {
    /// Every counter, in drawing order
    pub const ALL: [CounterKind; 4] = [
        CounterKind::Score,
        CounterKind::HighScore,
        CounterKind::Lines,
        CounterKind::Level,
    ];

    /// Digits shown
    pub const fn digits(self) -> u8 {
        match self {
            CounterKind::Level => 2,
            _ => 4,
        }
    }

    /// Digit pairs shown
    pub const fn pairs(self) -> usize {
        self.digits() as usize / 2
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A set of counters, used to track which ones need redrawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CounterSet(u8);

impl CounterSet {
    /// No counters
    pub const NONE: Self = Self(0);

    /// Every counter
    pub const ALL: Self = Self(0b1111);

    /// Set holding one counter
    pub const fn single(kind: CounterKind) -> Self {
        Self(kind.bit())
    }

    pub fn insert(&mut self, kind: CounterKind) {
        self.0 |= kind.bit();
    }

    pub const fn contains(&self, kind: CounterKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in drawing order
    pub fn iter(self) -> impl Iterator<Item = CounterKind> {
        CounterKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

/// Encode `value` as `pairs` digit-pair bytes
///
/// Decimal saturates at all nines; hex saturates at all `F`s.
pub fn digit_pairs(value: u32, pairs: usize, radix: Radix) -> DigitPairs {
    let pairs = pairs.min(MAX_PAIRS);
    let base: u32 = match radix {
        Radix::Decimal => 10,
        Radix::Hex => 16,
    };
    let max = base.pow(2 * pairs as u32) - 1;
    let mut rest = value.min(max);

    let mut out = DigitPairs::new();
    for _ in 0..pairs {
        let low = (rest % base) as u8;
        rest /= base;
        let high = (rest % base) as u8;
        rest /= base;
        // Capacity is MAX_PAIRS and `pairs` never exceeds it
        let _ = out.push((high << 4) | low);
    }
    out.reverse();
    out
}

/// Counter values and which of them changed since the last draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counters {
    score: u32,
    high_score: u32,
    lines: u32,
    level: u8,
    dirty: CounterSet,
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

impl Counters {
    pub const fn new() -> Self {
        Self {
            score: 0,
            high_score: 0,
            lines: 0,
            level: 0,
            dirty: CounterSet::ALL,
        }
    }

    /// Zero everything except the high score
    pub fn reset(&mut self, start_level: u8) {
        self.score = 0;
        self.lines = 0;
        self.level = start_level;
        self.dirty = CounterSet::ALL;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Add points, carrying the high score along
    pub fn add_points(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.dirty.insert(CounterKind::Score);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.dirty.insert(CounterKind::HighScore);
        }
    }

    pub fn add_lines(&mut self, lines: u8) {
        if lines > 0 {
            self.lines = self.lines.saturating_add(lines as u32);
            self.dirty.insert(CounterKind::Lines);
        }
    }

    pub fn set_level(&mut self, level: u8) {
        if level != self.level {
            self.level = level;
            self.dirty.insert(CounterKind::Level);
        }
    }

    /// Raw value of one counter
    pub fn value(&self, kind: CounterKind) -> u32 {
        match kind {
            CounterKind::Score => self.score,
            CounterKind::HighScore => self.high_score,
            CounterKind::Lines => self.lines,
            CounterKind::Level => self.level as u32,
        }
    }

    /// Digit pairs of one counter
    pub fn pairs(&self, kind: CounterKind, radix: Radix) -> DigitPairs {
        digit_pairs(self.value(kind), kind.pairs(), radix)
    }

    /// Counters changed since the last call
    pub fn take_dirty(&mut self) -> CounterSet {
        core::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_pairs() {
        assert_eq!(digit_pairs(1234, 2, Radix::Decimal).as_slice(), &[0x12, 0x34]);
        assert_eq!(digit_pairs(7, 2, Radix::Decimal).as_slice(), &[0x00, 0x07]);
        assert_eq!(digit_pairs(42, 1, Radix::Decimal).as_slice(), &[0x42]);
    }

    #[test]
    fn test_decimal_saturates() {
        assert_eq!(digit_pairs(12_345, 2, Radix::Decimal).as_slice(), &[0x99, 0x99]);
        assert_eq!(digit_pairs(100, 1, Radix::Decimal).as_slice(), &[0x99]);
    }

    #[test]
    fn test_hex_pairs() {
        assert_eq!(digit_pairs(0xBEEF, 2, Radix::Hex).as_slice(), &[0xBE, 0xEF]);
        assert_eq!(digit_pairs(0x1_0000, 2, Radix::Hex).as_slice(), &[0xFF, 0xFF]);
        assert_eq!(digit_pairs(29, 1, Radix::Hex).as_slice(), &[0x1D]);
    }

    #[test]
    fn test_high_score_follows_score() {
        let mut counters = Counters::new();
        counters.take_dirty();

        counters.add_points(500);
        assert_eq!(counters.high_score(), 500);
        assert_eq!(
            counters.take_dirty(),
            CounterSet::single(CounterKind::Score).union(CounterSet::single(CounterKind::HighScore))
        );

        counters.reset(3);
        assert_eq!(counters.score(), 0);
        assert_eq!(counters.level(), 3);
        assert_eq!(counters.high_score(), 500);

        counters.take_dirty();
        counters.add_points(100);
        assert_eq!(counters.high_score(), 500);
        assert_eq!(counters.take_dirty(), CounterSet::single(CounterKind::Score));
    }

    #[test]
    fn test_unchanged_values_stay_clean() {
        let mut counters = Counters::new();
        counters.take_dirty();
        counters.add_points(0);
        counters.add_lines(0);
        counters.set_level(0);
        assert!(counters.take_dirty().is_empty());
    }

    #[test]
    fn test_counter_set_iter_order() {
        let mut set = CounterSet::NONE;
        set.insert(CounterKind::Level);
        set.insert(CounterKind::Score);
        let mut iter = set.iter();
        assert_eq!(iter.next(), Some(CounterKind::Score));
        assert_eq!(iter.next(), Some(CounterKind::Level));
        assert_eq!(iter.next(), None);
        assert_eq!(CounterSet::ALL.iter().count(), 4);
    }
}
