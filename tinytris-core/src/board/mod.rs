//! Playing field and the falling tile
//!
//! The active tile's cells live in the occupancy grid while it falls, so the
//! renderer only ever looks at the grid. Every move lifts the tile off the
//! grid, checks the candidate placement and stamps either the candidate or
//! the original back. A rejected move leaves the grid exactly as it was.

pub mod grid;
pub mod mapping;
pub mod tile;

pub use grid::{OccupancyGrid, GRID_COLUMNS, GRID_ROWS};
pub use mapping::{grid_cell, Side};
pub use tile::{Rotation, Tile, TileKind, Turn};

/// Errors from direct cell access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// Column or row outside the grid
    OutOfBounds,
}

/// Occupancy grid plus the tile currently under player control
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    grid: OccupancyGrid,
    active: Option<Tile>,
    /// Whether the active tile's cells are stamped on the grid
    placed: bool,
}

impl Board {
    /// Create an empty board with no active tile
    pub const fn new() -> Self {
        Self {
            grid: OccupancyGrid::new(),
            active: None,
            placed: false,
        }
    }

    /// Whether a cell is filled
    pub fn is_occupied(&self, column: u8, row: u8) -> Result<bool, BoardError> {
        self.grid.get(column, row)
    }

    /// Fill or empty a cell
    pub fn set_occupied(&mut self, column: u8, row: u8, value: bool) -> Result<(), BoardError> {
        self.grid.set(column, row, value)
    }

    /// The occupancy grid
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// The tile under player control
    pub fn active(&self) -> Option<Tile> {
        self.active
    }

    /// Whether every cell of `tile` is on the grid and empty
    pub fn fits(&self, tile: &Tile) -> bool {
        tile.cells().all(|(c, r)| !self.grid.is_blocked(c, r))
    }

    fn stamp(&mut self, tile: &Tile, value: bool) {
        for (c, r) in tile.cells() {
            if c >= 0 && r >= 0 {
                // Off-grid cells never get stamped; callers check `fits` first
                let _ = self.grid.set(c as u8, r as u8, value);
            }
        }
    }

    /// Put a new tile of `kind` at the spawn anchor
    ///
    /// The tile becomes active either way. Returns whether it fit and was
    /// stamped; a tile that did not fit makes [`check_game_over`] true.
    ///
    /// [`check_game_over`]: Board::check_game_over
    pub fn inject(&mut self, kind: TileKind) -> bool {
        let tile = Tile::spawn(kind);
        self.placed = self.fits(&tile);
        if self.placed {
            self.stamp(&tile, true);
        }
        self.active = Some(tile);
        self.placed
    }

    /// Whether the active tile is stuck at the spawn anchor
    pub fn check_game_over(&self) -> bool {
        match self.active {
            Some(tile) => tile.is_at_spawn() && !self.placed && !self.fits(&tile),
            None => false,
        }
    }

    /// Shift the active tile by (dx, dy)
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        self.try_place(|tile| tile.moved(dx, dy))
    }

    /// Rotate the active tile a quarter turn about its anchor
    pub fn try_rotate(&mut self, turn: Turn) -> bool {
        self.try_place(|tile| Some(tile.turned(turn)))
    }

    fn try_place(&mut self, transform: impl FnOnce(Tile) -> Option<Tile>) -> bool {
        let Some(current) = self.active else {
            return false;
        };
        if !self.placed {
            return false;
        }

        let Some(candidate) = transform(current) else {
            return false;
        };
        self.stamp(&current, false);
        if self.fits(&candidate) {
            self.stamp(&candidate, true);
            self.active = Some(candidate);
            true
        } else {
            self.stamp(&current, true);
            false
        }
    }

    /// Move the active tile down until it rests on something
    ///
    /// Returns the number of rows travelled.
    pub fn drop_to_floor(&mut self) -> u8 {
        let mut rows = 0;
        while self.try_move(0, 1) {
            rows += 1;
        }
        rows
    }

    /// Whether the active tile can fall one more row
    pub fn can_fall(&self) -> bool {
        let Some(tile) = self.active else {
            return false;
        };
        if !self.placed {
            return false;
        }
        let Some(below) = tile.moved(0, 1) else {
            return false;
        };
        below.cells().all(|(c, r)| {
            // The tile's own cells are not an obstacle
            tile.cells().any(|own| own == (c, r)) || !self.grid.is_blocked(c, r)
        })
    }

    /// Release the active tile, leaving its cells on the grid
    pub fn lock(&mut self) -> Option<Tile> {
        self.placed = false;
        self.active.take()
    }

    /// Remove full rows and compact the field downward
    ///
    /// Call after [`lock`](Board::lock); a still active tile would be
    /// shifted along with the stack.
    pub fn scan_completed_lines(&mut self) -> u8 {
        let cleared = self.grid.remove_full_rows();
        if cleared > 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!("cleared {} lines", cleared);
        }
        cleared
    }

    /// Empty the grid and drop the active tile
    pub fn clear(&mut self) {
        self.grid.clear();
        self.active = None;
        self.placed = false;
    }
}

/// Grid rows covered by a tile, clamped to the grid
///
/// Returns `None` when the tile has no cell on the grid.
pub fn extent(tile: &Tile) -> Option<(u8, u8)> {
    let (top, bottom) = tile.row_span();
    if bottom < 0 || top >= GRID_ROWS as i8 {
        return None;
    }
    Some((top.max(0) as u8, bottom.min(GRID_ROWS as i8 - 1) as u8))
}
