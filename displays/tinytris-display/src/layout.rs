//! Screen layout
//!
//! Pages 0-5 hold the playing field (see `tinytris_core::board::mapping`).
//! Pages 6-7 form the side panel: four counters and the next-tile preview.
//!
//! ```text
//! rows    page 6   page 7
//!  2- 6   score    score
//! 10-14   high     high
//! 18-22   lines    lines
//! 26-30   level
//! 40-55   next tile preview
//! ```

use tinytris_core::state::CounterKind;

use crate::glyphs::GLYPH_ROWS;

/// First page of the side panel
pub const PANEL_FIRST_PAGE: u8 = 6;

/// Last page of the side panel
pub const PANEL_LAST_PAGE: u8 = 7;

/// First display row of the preview box
pub const PREVIEW_FIRST_ROW: u8 = 40;

/// Preview box size in cells (both axes)
pub const PREVIEW_CELLS: u8 = 4;

/// Where a counter is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CounterWindow {
    pub page_start: u8,
    pub page_end: u8,
    pub row_start: u8,
    pub row_end: u8,
}

/// Window of a counter, one page per digit pair
pub const fn counter_window(kind: CounterKind) -> CounterWindow {
    let row_start = match kind {
        CounterKind::Score => 2,
        CounterKind::HighScore => 10,
        CounterKind::Lines => 18,
        CounterKind::Level => 26,
    };
    CounterWindow {
        page_start: PANEL_FIRST_PAGE,
        page_end: PANEL_FIRST_PAGE + kind.pairs() as u8 - 1,
        row_start,
        row_end: row_start + GLYPH_ROWS - 1,
    }
}
