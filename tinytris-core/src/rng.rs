//! Tile sequence
//!
//! A 7-bag: every run of seven tiles holds each shape once, shuffled with a
//! small LCG so a given seed always replays the same game.

use crate::board::TileKind;

/// Linear congruential generator (Numerical Recipes constants)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a generator; a zero seed is bumped to 1
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Next raw value
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Value in `0..max`
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are the better-distributed ones
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_range(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

/// Shuffled bag of the seven shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBag {
    bag: [TileKind; 7],
    index: usize,
    rng: SimpleRng,
}

impl TileBag {
    /// Create a bag and shuffle the first round
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: TileKind::ALL,
            index: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = TileKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.index = 0;
    }

    /// Take the next shape, reshuffling when the bag runs out
    pub fn draw(&mut self) -> TileKind {
        let kind = self.bag[self.index];
        self.index += 1;
        if self.index == self.bag.len() {
            self.refill();
        }
        kind
    }
}
