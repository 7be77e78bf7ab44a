//! Packed occupancy grid
//!
//! One bit per cell, stored column-major in groups of eight rows:
//! `bytes[row >> 3][column]`, bit `row & 7`. A column is therefore a 24-bit
//! word with row 0 in bit 0, which turns line compaction into a shift.

use super::BoardError;

/// Grid width in cells
pub const GRID_COLUMNS: u8 = 10;

/// Grid height in cells
pub const GRID_ROWS: u8 = 24;

/// Bytes per column
const ROW_BYTES: usize = (GRID_ROWS as usize).div_ceil(8);

/// Bits of a column word that map to real rows
const COLUMN_MASK: u32 = (1 << GRID_ROWS) - 1;

/// Occupancy of every cell on the playing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    bytes: [[u8; GRID_COLUMNS as usize]; ROW_BYTES],
}

impl Default for OccupancyGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl OccupancyGrid {
    /// Create an empty grid
    pub const fn new() -> Self {
        Self {
            bytes: [[0; GRID_COLUMNS as usize]; ROW_BYTES],
        }
    }

    fn check(column: u8, row: u8) -> Result<(), BoardError> {
        if column < GRID_COLUMNS && row < GRID_ROWS {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds)
        }
    }

    /// Whether the cell is filled
    pub fn get(&self, column: u8, row: u8) -> Result<bool, BoardError> {
        Self::check(column, row)?;
        Ok(self.bytes[(row >> 3) as usize][column as usize] & (1 << (row & 7)) != 0)
    }

    /// Fill or empty a cell
    pub fn set(&mut self, column: u8, row: u8, value: bool) -> Result<(), BoardError> {
        Self::check(column, row)?;
        let byte = &mut self.bytes[(row >> 3) as usize][column as usize];
        if value {
            *byte |= 1 << (row & 7);
        } else {
            *byte &= !(1 << (row & 7));
        }
        Ok(())
    }

    /// Cell lookup for coordinates that may be off the grid
    ///
    /// Anything outside counts as filled, which is what collision wants.
    pub fn is_blocked(&self, column: i8, row: i8) -> bool {
        if column < 0 || row < 0 {
            return true;
        }
        self.get(column as u8, row as u8).unwrap_or(true)
    }

    fn column(&self, column: usize) -> u32 {
        self.bytes
            .iter()
            .enumerate()
            .fold(0, |word, (i, group)| word | (group[column] as u32) << (i * 8))
    }

    fn set_column(&mut self, column: usize, word: u32) {
        for (i, group) in self.bytes.iter_mut().enumerate() {
            group[column] = (word >> (i * 8)) as u8;
        }
    }

    /// Whether every cell in the row is filled
    pub fn is_row_full(&self, row: u8) -> bool {
        row < GRID_ROWS
            && (0..GRID_COLUMNS as usize).all(|c| self.column(c) & (1 << row) != 0)
    }

    /// Remove a row and drop everything above it by one
    ///
    /// Rows below are untouched and the top row comes back empty.
    pub fn remove_row(&mut self, row: u8) {
        if row >= GRID_ROWS {
            return;
        }
        let above = (1u32 << row) - 1;
        let below = COLUMN_MASK & !((1u32 << (row + 1)) - 1);
        for c in 0..GRID_COLUMNS as usize {
            let word = self.column(c);
            self.set_column(c, ((word & above) << 1) | (word & below));
        }
    }

    /// Remove all full rows, compacting the grid downward
    ///
    /// Returns the number of rows removed.
    pub fn remove_full_rows(&mut self) -> u8 {
        let mut removed = 0;
        let mut row = GRID_ROWS;
        while row > 0 {
            if self.is_row_full(row - 1) {
                // The row above just slid into `row - 1`; look at it again
                self.remove_row(row - 1);
                removed += 1;
            } else {
                row -= 1;
            }
        }
        removed
    }

    /// Whether no cell is filled
    pub fn is_empty(&self) -> bool {
        self.bytes.iter().flatten().all(|&b| b == 0)
    }

    /// Number of filled cells
    pub fn count(&self) -> u32 {
        self.bytes.iter().flatten().map(|b| b.count_ones()).sum()
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.bytes = [[0; GRID_COLUMNS as usize]; ROW_BYTES];
    }
}
