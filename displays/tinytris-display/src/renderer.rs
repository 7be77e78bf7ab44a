//! Board, counter and preview rendering
//!
//! Every byte is computed on the fly from the occupancy grid and streamed
//! straight into the display window. A render call is always one
//! `set_window` followed by one data stream with exactly one byte per
//! (page, row) of the window, pages outer and rows inner.

use tinytris_core::board::mapping::{
    display_rows, grid_cell, Side, FIELD_END_ROW, FIELD_START_ROW, FIRST_PAGE, LAST_PAGE,
    LAST_ROW, ROWS_PER_CELL,
};
use tinytris_core::board::{OccupancyGrid, Rotation, Tile, TileKind};
use tinytris_core::config::Radix;
use tinytris_core::state::{CounterKind, Counters, Frame, GameState, Redraw};
use tinytris_hal::TwiMaster;

use crate::error::DisplayError;
use crate::glyphs::{pair_row, GLYPH_ROWS};
use crate::layout::{
    counter_window, PANEL_FIRST_PAGE, PANEL_LAST_PAGE, PREVIEW_CELLS, PREVIEW_FIRST_ROW,
};
use crate::ssd1306::Ssd1306;

/// Cell pixels for each of the four display rows of a grid row, right half
///
/// The first row of every cell is left blank as a gap.
pub const TILE_ROW_MASK: [u8; 4] = [0x00, 0xE0, 0xE0, 0xE0];

/// Left wall, drawn in the low half of the first page
pub const LEFT_BORDER: u8 = 0x0E;

/// Right wall, drawn in the high half of the last page
pub const RIGHT_BORDER: u8 = 0xE0;

/// Filler below the field on the first page
pub const BASELINE_FIRST_PAGE: u8 = 0xFE;

/// Filler below the field on every other page
pub const BASELINE: u8 = 0xFF;

/// Pixels of one half-column cell at a sub-row
fn cell_bits(side: Side, sub_row: u8) -> u8 {
    let mask = TILE_ROW_MASK[(sub_row & 3) as usize];
    match side {
        Side::Left => mask >> 4,
        Side::Right => mask,
    }
}

/// The byte the board shows at a page and display row
pub fn board_byte(grid: &OccupancyGrid, page: u8, row: u8) -> u8 {
    if row >= FIELD_END_ROW {
        return if page == FIRST_PAGE {
            BASELINE_FIRST_PAGE
        } else {
            BASELINE
        };
    }

    let mut byte = match page {
        FIRST_PAGE => LEFT_BORDER,
        LAST_PAGE => RIGHT_BORDER,
        _ => 0,
    };

    if row >= FIELD_START_ROW {
        let sub_row = row - FIELD_START_ROW;
        for side in [Side::Left, Side::Right] {
            let filled = grid_cell(page, row, side)
                .and_then(|(column, grid_row)| grid.get(column, grid_row).ok())
                .unwrap_or(false);
            if filled {
                byte |= cell_bits(side, sub_row);
            }
        }
    }
    byte
}

/// Stream the board between two display rows (inclusive)
pub fn render_rows<B: TwiMaster>(
    display: &mut Ssd1306<B>,
    grid: &OccupancyGrid,
    first_row: u8,
    last_row: u8,
) -> Result<(), DisplayError> {
    display.set_window(FIRST_PAGE, LAST_PAGE, first_row, last_row)?;
    let mut stream = display.begin_data_stream()?;
    for page in FIRST_PAGE..=LAST_PAGE {
        for row in first_row..=last_row {
            stream.write_data_byte(board_byte(grid, page, row))?;
        }
    }
    stream.end_data_stream()
}

/// Stream the whole board window
pub fn render_board<B: TwiMaster>(
    display: &mut Ssd1306<B>,
    grid: &OccupancyGrid,
) -> Result<(), DisplayError> {
    render_rows(display, grid, 0, LAST_ROW)
}

/// Stream the display rows covering grid rows `top..=bottom`
pub fn render_band<B: TwiMaster>(
    display: &mut Ssd1306<B>,
    grid: &OccupancyGrid,
    top: u8,
    bottom: u8,
) -> Result<(), DisplayError> {
    let (first_row, last_row) = display_rows(top, bottom);
    render_rows(display, grid, first_row, last_row)
}

/// Stream one counter's digits
pub fn render_counter<B: TwiMaster>(
    display: &mut Ssd1306<B>,
    counters: &Counters,
    kind: CounterKind,
    radix: Radix,
) -> Result<(), DisplayError> {
    let window = counter_window(kind);
    display.set_window(
        window.page_start,
        window.page_end,
        window.row_start,
        window.row_end,
    )?;
    let mut stream = display.begin_data_stream()?;
    for pair in counters.pairs(kind, radix) {
        for row in 0..GLYPH_ROWS {
            stream.write_data_byte(pair_row(pair, row))?;
        }
    }
    stream.end_data_stream()
}

/// The byte the preview box shows at a page and display row
pub fn preview_byte(kind: Option<TileKind>, page: u8, row: u8) -> u8 {
    let Some(kind) = kind else {
        return 0;
    };
    let sub_row = row.wrapping_sub(PREVIEW_FIRST_ROW);
    if !(PANEL_FIRST_PAGE..=PANEL_LAST_PAGE).contains(&page) || sub_row >= PREVIEW_CELLS * ROWS_PER_CELL
    {
        return 0;
    }

    // Anchor so the unrotated 2x4 box sits centred in the 4x4 preview
    let tile = Tile {
        kind,
        rotation: Rotation::new(0),
        column: 1,
        row: 2,
    };
    let cell_row = (sub_row / ROWS_PER_CELL) as i8;
    let first_column = ((page - PANEL_FIRST_PAGE) * 2) as i8;

    let mut byte = 0;
    for (offset, side) in [(0, Side::Left), (1, Side::Right)] {
        let column = first_column + offset;
        if tile.cells().any(|cell| cell == (column, cell_row)) {
            byte |= cell_bits(side, sub_row);
        }
    }
    byte
}

/// Stream the next-tile preview (blank for `None`)
pub fn render_next<B: TwiMaster>(
    display: &mut Ssd1306<B>,
    kind: Option<TileKind>,
) -> Result<(), DisplayError> {
    let last_row = PREVIEW_FIRST_ROW + PREVIEW_CELLS * ROWS_PER_CELL - 1;
    display.set_window(PANEL_FIRST_PAGE, PANEL_LAST_PAGE, PREVIEW_FIRST_ROW, last_row)?;
    let mut stream = display.begin_data_stream()?;
    for page in PANEL_FIRST_PAGE..=PANEL_LAST_PAGE {
        for row in PREVIEW_FIRST_ROW..=last_row {
            stream.write_data_byte(preview_byte(kind, page, row))?;
        }
    }
    stream.end_data_stream()
}

/// Draw everything a frame asks for
///
/// Stops at the first failed transaction; the rest of the frame is left for
/// the caller to request again.
pub fn render_frame<B: TwiMaster>(
    display: &mut Ssd1306<B>,
    game: &GameState,
    frame: &Frame,
) -> Result<(), DisplayError> {
    let grid = game.board().grid();
    match frame.redraw {
        Redraw::None => {}
        Redraw::Band { top, bottom } => render_band(display, grid, top, bottom)?,
        Redraw::Full => render_board(display, grid)?,
    }

    let radix = game.config().radix;
    for kind in frame.counters.iter() {
        render_counter(display, game.counters(), kind, radix)?;
    }

    if frame.next_tile {
        render_next(display, Some(game.next_tile()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssd1306::{DisplayConfig, DATA_MARKER};
    use proptest::prelude::*;
    use tinytris_core::board::{GRID_COLUMNS, GRID_ROWS};
    use tinytris_core::state::CounterSet;
    use tinytris_core::GameConfig;
    use tinytris_hal::{BusError, MockTwi};

    fn driver() -> Ssd1306<MockTwi> {
        Ssd1306::new(MockTwi::new(), DisplayConfig::default())
    }

    fn first_field_row(grid_row: u8) -> u8 {
        FIELD_START_ROW + grid_row * ROWS_PER_CELL
    }

    #[test]
    fn test_empty_board_borders() {
        let grid = OccupancyGrid::new();
        for row in 0..FIELD_END_ROW {
            assert_eq!(board_byte(&grid, 0, row), LEFT_BORDER);
            assert_eq!(board_byte(&grid, 5, row), RIGHT_BORDER);
            for page in 1..5 {
                assert_eq!(board_byte(&grid, page, row), 0);
            }
        }
    }

    #[test]
    fn test_cell_halves() {
        let mut grid = OccupancyGrid::new();
        grid.set(0, 3, true).unwrap(); // page 0, right half
        grid.set(1, 3, true).unwrap(); // page 1, left half
        grid.set(9, 3, true).unwrap(); // page 5, left half

        let gap = first_field_row(3);
        assert_eq!(board_byte(&grid, 0, gap), LEFT_BORDER);
        assert_eq!(board_byte(&grid, 1, gap), 0x00);

        for row in gap + 1..gap + ROWS_PER_CELL {
            assert_eq!(board_byte(&grid, 0, row), 0xEE);
            assert_eq!(board_byte(&grid, 1, row), 0x0E);
            assert_eq!(board_byte(&grid, 5, row), 0xEE);
        }
        // Neighbouring grid rows are untouched
        assert_eq!(board_byte(&grid, 1, gap - 1), 0x00);
        assert_eq!(board_byte(&grid, 1, gap + ROWS_PER_CELL + 1), 0x00);
    }

    #[test]
    fn test_full_board_render_framing() {
        let mut display = driver();
        let mut grid = OccupancyGrid::new();
        grid.set(4, GRID_ROWS - 1, true).unwrap();

        render_board(&mut display, &grid).unwrap();

        let bus = display.bus();
        assert_eq!(bus.transaction_count(), 2);
        assert_eq!(bus.written(0).as_slice(), &[0x00, 0x22, 0, 5, 0x21, 0, 127]);

        let data = bus.written(1);
        assert_eq!(data[0], DATA_MARKER);
        assert_eq!(data.len(), 1 + 6 * 128);
        // Raster order: page outer, row inner
        let byte_at = |page: usize, row: usize| data[1 + page * 128 + row];
        assert_eq!(byte_at(0, 0), LEFT_BORDER);
        assert_eq!(byte_at(0, 127), BASELINE_FIRST_PAGE);
        assert_eq!(byte_at(3, 127), BASELINE);
        // Column 4 is the right half of page 2
        assert_eq!(byte_at(2, first_field_row(GRID_ROWS - 1) as usize + 1), 0xE0);
        assert!(!bus.is_open());
        assert_eq!(bus.violations(), 0);
    }

    #[test]
    fn test_band_render_window() {
        let mut display = driver();
        let grid = OccupancyGrid::new();
        render_band(&mut display, &grid, 2, 3).unwrap();

        let bus = display.bus();
        assert_eq!(bus.written(0).as_slice(), &[0x00, 0x22, 0, 5, 0x21, 36, 43]);
        assert_eq!(bus.written(1).len(), 1 + 6 * 8);
    }

    #[test]
    fn test_render_aborts_on_nack() {
        let mut bus = MockTwi::new();
        // Window transaction is 7 writes, then the marker and 10 pixels
        bus.fail_write(7 + 1 + 10, BusError::NotAcknowledged);
        let mut display = Ssd1306::new(bus, DisplayConfig::default());

        let result = render_board(&mut display, &OccupancyGrid::new());
        assert_eq!(result, Err(DisplayError::Bus(BusError::NotAcknowledged)));

        let bus = display.bus();
        assert_eq!(bus.written(1).len(), 1 + 10);
        assert!(!bus.is_open());
        assert_eq!(bus.violations(), 0);
    }

    #[test]
    fn test_counter_bytes() {
        let mut display = driver();
        let mut counters = Counters::new();
        counters.add_points(1234);

        render_counter(&mut display, &counters, CounterKind::Score, Radix::Decimal).unwrap();

        let bus = display.bus();
        assert_eq!(bus.written(0).as_slice(), &[0x00, 0x22, 6, 7, 0x21, 2, 6]);
        let data = bus.written(1);
        assert_eq!(data.len(), 1 + 10);
        for row in 0..GLYPH_ROWS {
            assert_eq!(data[1 + row as usize], pair_row(0x12, row));
            assert_eq!(data[6 + row as usize], pair_row(0x34, row));
        }
    }

    #[test]
    fn test_zero_and_f_counters_differ() {
        let mut zeros = driver();
        let mut effs = driver();
        let mut counters = Counters::new();
        render_counter(&mut zeros, &counters, CounterKind::Score, Radix::Hex).unwrap();
        counters.add_points(0xFFFF);
        render_counter(&mut effs, &counters, CounterKind::Score, Radix::Hex).unwrap();

        let a = zeros.bus().written(1);
        let b = effs.bus().written(1);
        for i in 1..=5 {
            assert_ne!(a[i], b[i]);
        }
    }

    #[test]
    fn test_preview_i_tile() {
        // I bar lies on preview row 2 across all four half-columns
        let kind = Some(TileKind::I);
        let row = PREVIEW_FIRST_ROW + 2 * ROWS_PER_CELL + 1;
        assert_eq!(preview_byte(kind, 6, row), 0xEE);
        assert_eq!(preview_byte(kind, 7, row), 0xEE);
        assert_eq!(preview_byte(kind, 6, row - 1), 0x00);
        assert_eq!(preview_byte(kind, 6, row - ROWS_PER_CELL), 0x00);
        assert_eq!(preview_byte(None, 6, row), 0x00);
        assert_eq!(preview_byte(kind, 5, row), 0x00);
    }

    #[test]
    fn test_preview_cell_count() {
        for kind in TileKind::ALL {
            let lit = (PANEL_FIRST_PAGE..=PANEL_LAST_PAGE)
                .flat_map(|page| {
                    (0..PREVIEW_CELLS).map(move |cell| {
                        preview_byte(Some(kind), page, PREVIEW_FIRST_ROW + cell * ROWS_PER_CELL + 1)
                    })
                })
                .map(|b| (b & 0x0F != 0) as u32 + (b & 0xF0 != 0) as u32)
                .sum::<u32>();
            assert_eq!(lit, 4);
        }
    }

    #[test]
    fn test_render_full_frame() {
        let mut game = GameState::new(GameConfig::default());
        game.start();
        let frame = game.take_frame();
        assert_eq!(frame, Frame::full());

        let mut display = driver();
        render_frame(&mut display, &game, &frame).unwrap();

        // Board, four counters and the preview: a window and a stream each
        let bus = display.bus();
        assert_eq!(bus.transaction_count(), 12);
        assert!(!bus.overflowed());
        assert_eq!(bus.violations(), 0);
    }

    #[test]
    fn test_render_band_frame() {
        let game = GameState::new(GameConfig::default());
        let frame = Frame {
            redraw: Redraw::band(0, 1),
            counters: CounterSet::single(CounterKind::Level),
            next_tile: false,
        };

        let mut display = driver();
        render_frame(&mut display, &game, &frame).unwrap();

        let bus = display.bus();
        assert_eq!(bus.transaction_count(), 4);
        assert_eq!(bus.written(0).as_slice(), &[0x00, 0x22, 0, 5, 0x21, 28, 35]);
        assert_eq!(bus.written(2).as_slice(), &[0x00, 0x22, 6, 6, 0x21, 26, 30]);
    }

    #[test]
    fn test_empty_frame_sends_nothing() {
        let game = GameState::new(GameConfig::default());
        let mut display = driver();
        render_frame(&mut display, &game, &Frame::default()).unwrap();
        assert!(display.bus().events().is_empty());
    }

    proptest! {
        #[test]
        fn prop_baseline_filler(
            page in FIRST_PAGE..=LAST_PAGE,
            row in FIELD_END_ROW..=LAST_ROW,
            cells in proptest::collection::vec((0..GRID_COLUMNS, 0..GRID_ROWS), 0..100),
        ) {
            let mut grid = OccupancyGrid::new();
            for (c, r) in cells {
                grid.set(c, r, true).unwrap();
            }
            let expected = if page == 0 { 0xFE } else { 0xFF };
            prop_assert_eq!(board_byte(&grid, page, row), expected);
        }

        #[test]
        fn prop_cell_gap_row_is_border_only(
            page in FIRST_PAGE..=LAST_PAGE,
            grid_row in 0..GRID_ROWS,
            cells in proptest::collection::vec((0..GRID_COLUMNS, 0..GRID_ROWS), 0..100),
        ) {
            let mut grid = OccupancyGrid::new();
            for (c, r) in cells {
                grid.set(c, r, true).unwrap();
            }
            let border = match page {
                0 => LEFT_BORDER,
                5 => RIGHT_BORDER,
                _ => 0,
            };
            prop_assert_eq!(board_byte(&grid, page, first_field_row(grid_row)), border);
        }
    }
}
