//! Tile catalog and rotation geometry
//!
//! Each shape is an 8-bit mask over a 2x4 box. Bit `b` sits at long-axis
//! index `a = b & 3` and short-axis index `s = b >> 2`. The cell offset
//! from the anchor depends on the rotation:
//!
//! | rotation | d-column | d-row  |
//! |----------|----------|--------|
//! | 0        | a - 1    | s - 1  |
//! | 1        | 1 - s    | a - 1  |
//! | 2        | 1 - a    | 1 - s  |
//! | 3        | s - 1    | 1 - a  |
//!
//! Every step maps (x, y) to (-y, x), a clockwise quarter turn with rows
//! growing downward, so four steps are the identity.

/// Column the spawn anchor sits on
pub const SPAWN_COLUMN: i8 = 4;

/// Row the spawn anchor sits on
pub const SPAWN_ROW: i8 = 1;

/// Shape masks, indexed by [`TileKind`]
pub const CATALOG: [u8; 7] = [
    0b0110_0110, // O
    0b1111_0000, // I
    0b0111_0010, // T
    0b0011_0110, // S
    0b0110_0011, // Z
    0b0111_0001, // J
    0b0111_0100, // L
];

/// Catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TileKind {
    O,
    I,
    T,
    S,
    Z,
    J,
    L,
}

impl TileKind {
    /// Every kind, in catalog order
    pub const ALL: [TileKind; 7] = [
        TileKind::O,
        TileKind::I,
        TileKind::T,
        TileKind::S,
        TileKind::Z,
        TileKind::J,
        TileKind::L,
    ];

    /// Kind at a catalog index
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Position in the catalog
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Shape mask
    pub const fn mask(self) -> u8 {
        CATALOG[self as usize]
    }
}

/// Rotation state, 0-3 quarter turns clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rotation(u8);

/// Direction of a quarter turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Turn {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// Rotation from a raw index (taken mod 4)
    pub const fn new(index: u8) -> Self {
        Self(index & 3)
    }

    /// Raw index
    pub const fn index(self) -> u8 {
        self.0
    }

    /// One quarter turn
    pub const fn turned(self, turn: Turn) -> Self {
        match turn {
            Turn::Clockwise => Self::new(self.0 + 1),
            Turn::CounterClockwise => Self::new(self.0 + 3),
        }
    }
}

/// Offset of mask bit `bit` from the anchor under `rotation`
pub const fn offset(bit: u8, rotation: Rotation) -> (i8, i8) {
    let a = (bit & 3) as i8;
    let s = (bit >> 2 & 1) as i8;
    match rotation.0 {
        0 => (a - 1, s - 1),
        1 => (1 - s, a - 1),
        2 => (1 - a, 1 - s),
        _ => (s - 1, 1 - a),
    }
}

/// A shape placed on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tile {
    pub kind: TileKind,
    pub rotation: Rotation,
    /// Anchor column
    pub column: i8,
    /// Anchor row
    pub row: i8,
}

impl Tile {
    /// A tile of `kind` at the spawn anchor, unrotated
    pub const fn spawn(kind: TileKind) -> Self {
        Self {
            kind,
            rotation: Rotation::new(0),
            column: SPAWN_COLUMN,
            row: SPAWN_ROW,
        }
    }

    /// Whether the anchor is the spawn anchor
    pub const fn is_at_spawn(&self) -> bool {
        self.column == SPAWN_COLUMN && self.row == SPAWN_ROW
    }

    /// Grid coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> {
        let mask = self.kind.mask();
        let Tile {
            rotation,
            column,
            row,
            ..
        } = *self;
        (0..8u8)
            .filter(move |bit| mask & (1u8 << *bit) != 0)
            .map(move |bit| {
                let (dx, dy) = offset(bit, rotation);
                // Saturated coordinates are off the grid either way
                (column.saturating_add(dx), row.saturating_add(dy))
            })
    }

    /// Same tile shifted by (dx, dy)
    ///
    /// `None` when the anchor would leave the `i8` range.
    pub const fn moved(self, dx: i8, dy: i8) -> Option<Self> {
        match (self.column.checked_add(dx), self.row.checked_add(dy)) {
            (Some(column), Some(row)) => Some(Self {
                column,
                row,
                ..self
            }),
            _ => None,
        }
    }

    /// Same tile after a quarter turn about the anchor
    pub const fn turned(self, turn: Turn) -> Self {
        Self {
            rotation: self.rotation.turned(turn),
            ..self
        }
    }

    /// Topmost and bottommost rows the tile covers
    pub fn row_span(&self) -> (i8, i8) {
        self.cells()
            .fold((i8::MAX, i8::MIN), |(top, bottom), (_, r)| {
                (top.min(r), bottom.max(r))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sorted_cells(tile: &Tile) -> [(i8, i8); 4] {
        let mut cells = [(0, 0); 4];
        for (slot, cell) in cells.iter_mut().zip(tile.cells()) {
            *slot = cell;
        }
        cells.sort();
        cells
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in TileKind::ALL {
            assert_eq!(kind.mask().count_ones(), 4);
            assert_eq!(Tile::spawn(kind).cells().count(), 4);
        }
    }

    #[test]
    fn test_catalog_order() {
        assert_eq!(TileKind::from_index(1), Some(TileKind::I));
        assert_eq!(TileKind::I.mask(), 0b1111_0000);
        assert_eq!(TileKind::from_index(7), None);
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_index(kind.index()), Some(kind));
        }
    }

    #[test]
    fn test_i_tile_at_spawn() {
        let tile = Tile::spawn(TileKind::I);
        assert_eq!(sorted_cells(&tile), [(3, 1), (4, 1), (5, 1), (6, 1)]);
    }

    #[test]
    fn test_i_tile_quarter_turn_is_vertical() {
        let tile = Tile::spawn(TileKind::I).moved(0, 2).unwrap().turned(Turn::Clockwise);
        assert_eq!(sorted_cells(&tile), [(4, 2), (4, 3), (4, 4), (4, 5)]);
    }

    #[test]
    fn test_t_tile_rotations() {
        // T points up at rotation 0: nub on row above the bar
        let tile = Tile::spawn(TileKind::T).moved(0, 2).unwrap();
        assert_eq!(sorted_cells(&tile), [(3, 3), (4, 2), (4, 3), (5, 3)]);

        // Clockwise quarter turn: bar becomes vertical, nub points right
        let cw = tile.turned(Turn::Clockwise);
        assert_eq!(sorted_cells(&cw), [(4, 2), (4, 3), (4, 4), (5, 3)]);
    }

    #[test]
    fn test_rotation_table() {
        // Bit 6: a = 2, s = 1
        assert_eq!(offset(6, Rotation::new(0)), (1, 0));
        assert_eq!(offset(6, Rotation::new(1)), (0, 1));
        assert_eq!(offset(6, Rotation::new(2)), (-1, 0));
        assert_eq!(offset(6, Rotation::new(3)), (0, -1));
    }

    #[test]
    fn test_turn_round_trip() {
        let r = Rotation::new(3);
        assert_eq!(r.turned(Turn::Clockwise), Rotation::new(0));
        assert_eq!(r.turned(Turn::CounterClockwise), Rotation::new(2));
        assert_eq!(
            r.turned(Turn::Clockwise).turned(Turn::CounterClockwise),
            r
        );
    }

    #[test]
    fn test_row_span() {
        let tile = Tile::spawn(TileKind::O);
        assert_eq!(tile.row_span(), (0, 1));
        let vertical = Tile::spawn(TileKind::I).moved(0, 5).unwrap().turned(Turn::Clockwise);
        assert_eq!(vertical.row_span(), (5, 8));
    }

    proptest! {
        #[test]
        fn prop_four_turns_are_identity(bit in 0u8..8, start in 0u8..4) {
            let mut rotation = Rotation::new(start);
            let original = offset(bit, rotation);
            for _ in 0..4 {
                rotation = rotation.turned(Turn::Clockwise);
            }
            prop_assert_eq!(offset(bit, rotation), original);
        }

        #[test]
        fn prop_each_step_is_a_quarter_turn(bit in 0u8..8, start in 0u8..4) {
            let rotation = Rotation::new(start);
            let (x, y) = offset(bit, rotation);
            prop_assert_eq!(offset(bit, rotation.turned(Turn::Clockwise)), (-y, x));
        }

        #[test]
        fn prop_cells_stay_near_anchor(kind in 0u8..7, rotation in 0u8..4) {
            let tile = Tile {
                kind: TileKind::from_index(kind).unwrap(),
                rotation: Rotation::new(rotation),
                column: 4,
                row: 10,
            };
            for (c, r) in tile.cells() {
                prop_assert!((2..=6).contains(&c));
                prop_assert!((8..=12).contains(&r));
            }
        }
    }
}
