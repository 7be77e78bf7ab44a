//! 3x5 hexadecimal digit font
//!
//! Each glyph is five rows of four bits, two rows per byte (the earlier row
//! in the low nibble). Within a row bit 0 is the spacing column and bits 1-3
//! are pixels from left to right, the same layout a board half-column uses.

/// Rows per glyph
pub const GLYPH_ROWS: u8 = 5;

/// Packed glyphs for 0-9 and A-F
pub const DIGIT_GLYPHS: [[u8; 3]; 16] = [
    [0xA4, 0xAA, 0x04], // 0
    [0x64, 0x44, 0x0E], // 1
    [0x86, 0x24, 0x0E], // 2
    [0x86, 0x84, 0x06], // 3
    [0xAA, 0x8E, 0x08], // 4
    [0x2E, 0x86, 0x06], // 5
    [0x2C, 0xA6, 0x04], // 6
    [0x8E, 0x44, 0x04], // 7
    [0xA4, 0xA4, 0x04], // 8
    [0xA4, 0x8C, 0x06], // 9
    [0xA4, 0xAE, 0x0A], // A
    [0xA6, 0xA6, 0x06], // B
    [0x2C, 0x22, 0x0C], // C
    [0xA6, 0xAA, 0x06], // D
    [0x2E, 0x26, 0x0E], // E
    [0x2E, 0x26, 0x02], // F
];

/// One row of a digit's glyph as a nibble
///
/// Digits above 0xF use their low nibble; rows past the glyph are blank.
pub fn glyph_row(digit: u8, row: u8) -> u8 {
    if row >= GLYPH_ROWS {
        return 0;
    }
    let packed = DIGIT_GLYPHS[(digit & 0x0F) as usize][(row >> 1) as usize];
    if row & 1 == 0 {
        packed & 0x0F
    } else {
        packed >> 4
    }
}

/// One display byte of a digit pair
///
/// The pair's high nibble is the left digit and lands in the low half of
/// the byte.
pub fn pair_row(pair: u8, row: u8) -> u8 {
    glyph_row(pair >> 4, row) | (glyph_row(pair & 0x0F, row) << 4)
}
