//! What the next render pass has to redraw

use super::counters::CounterSet;

/// Part of the playing field that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Redraw {
    /// Nothing on the field changed
    #[default]
    None,
    /// Grid rows `top..=bottom` changed
    Band { top: u8, bottom: u8 },
    /// The whole field
    Full,
}

impl Redraw {
    /// Band covering a span of grid rows, in either order
    pub fn band(a: u8, b: u8) -> Self {
        Redraw::Band {
            top: a.min(b),
            bottom: a.max(b),
        }
    }

    /// Smallest request covering both
    pub fn merge(self, other: Redraw) -> Redraw {
        match (self, other) {
            (Redraw::Full, _) | (_, Redraw::Full) => Redraw::Full,
            (Redraw::None, r) | (r, Redraw::None) => r,
            (
                Redraw::Band { top: t1, bottom: b1 },
                Redraw::Band { top: t2, bottom: b2 },
            ) => Redraw::Band {
                top: t1.min(t2),
                bottom: b1.max(b2),
            },
        }
    }
}

/// Pending screen updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub redraw: Redraw,
    /// Counters whose digits changed
    pub counters: CounterSet,
    /// Whether the next-tile preview changed
    pub next_tile: bool,
}

impl Frame {
    /// Everything on screen
    pub const fn full() -> Self {
        Self {
            redraw: Redraw::Full,
            counters: CounterSet::ALL,
            next_tile: true,
        }
    }

    /// Whether nothing needs drawing
    pub fn is_empty(&self) -> bool {
        self.redraw == Redraw::None && self.counters.is_empty() && !self.next_tile
    }
}
