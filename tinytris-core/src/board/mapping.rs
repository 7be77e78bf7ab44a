//! Display geometry of the playing field
//!
//! The panel is mounted rotated: a display *column* is a game row and the
//! eight bits of a byte run across the field. Each page (one byte wide)
//! carries two grid columns, one per nibble, and each grid row is four
//! display columns tall.
//!
//! ```text
//! page      0        1        2     ...     5
//!        ┌───┬───┬───┬───┬───┬───┐     ┌───┬───┐
//! half   │ L │ R │ L │ R │ L │ R │     │ L │ R │
//! column │ ║ │ 0 │ 1 │ 2 │ 3 │ 4 │     │ 9 │ ║ │
//!        └───┴───┴───┴───┴───┴───┘     └───┴───┘
//! ```
//!
//! The two outer half-columns hold the borders.

use super::grid::{GRID_COLUMNS, GRID_ROWS};

/// First page of the field
pub const FIRST_PAGE: u8 = 0;

/// Last page of the field
pub const LAST_PAGE: u8 = (GRID_COLUMNS + 1) / 2;

/// Display rows per grid row
pub const ROWS_PER_CELL: u8 = 4;

/// Display row of grid row 0
pub const FIELD_START_ROW: u8 = 28;

/// First display row past the field (the baseline starts here)
pub const FIELD_END_ROW: u8 = FIELD_START_ROW + GRID_ROWS * ROWS_PER_CELL;

/// Last display row the board window covers
pub const LAST_ROW: u8 = 127;

/// Which nibble of a page byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    /// Low nibble
    Left,
    /// High nibble
    Right,
}

/// Grid cell shown at a page half and display row
///
/// Returns `(column, grid_row)`, or `None` for the border half-columns and
/// for rows outside the field.
pub fn grid_cell(page: u8, row: u8, side: Side) -> Option<(u8, u8)> {
    if !(FIRST_PAGE..=LAST_PAGE).contains(&page) {
        return None;
    }
    if !(FIELD_START_ROW..FIELD_END_ROW).contains(&row) {
        return None;
    }

    let column = match side {
        Side::Left if page == FIRST_PAGE => return None,
        Side::Right if page == LAST_PAGE => return None,
        Side::Left => page * 2 - 1,
        Side::Right => page * 2,
    };

    Some((column, (row - FIELD_START_ROW) / ROWS_PER_CELL))
}

/// First and last display row of a span of grid rows
///
/// Rows are clamped to the grid.
pub fn display_rows(top: u8, bottom: u8) -> (u8, u8) {
    let top = top.min(GRID_ROWS - 1);
    let bottom = bottom.clamp(top, GRID_ROWS - 1);
    (
        FIELD_START_ROW + top * ROWS_PER_CELL,
        FIELD_START_ROW + bottom * ROWS_PER_CELL + ROWS_PER_CELL - 1,
    )
}
