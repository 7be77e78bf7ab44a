//! Scoring, levels and gravity

use crate::config::MAX_LEVEL;

/// Base points for clearing 1-4 lines at once
pub const LINE_POINTS: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points per row of soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row of hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Frames a tile waits before falling one row, indexed by level
pub const GRAVITY_FRAMES: [u8; MAX_LEVEL as usize + 1] = [
    48, 43, 38, 33, 28, 23, 18, 13, 8, 6, // 0-9
    5, 5, 5, 4, 4, 4, 3, 3, 3, 2, // 10-19
    2, 2, 2, 2, 2, 2, 2, 2, 2, 1, // 20-29
];

/// Points for a line clear at `level`
pub fn line_clear_points(lines: u8, level: u8) -> u32 {
    let base = LINE_POINTS.get(lines as usize).copied().unwrap_or(0);
    base * (level as u32 + 1)
}

/// Level reached after clearing `lines`
pub fn level_for(start_level: u8, lines: u32, lines_per_level: u8) -> u8 {
    let gained = lines / lines_per_level.max(1) as u32;
    (start_level as u32 + gained).min(MAX_LEVEL as u32) as u8
}

/// Frames per row at `level`
pub fn gravity_frames(level: u8) -> u8 {
    GRAVITY_FRAMES[level.min(MAX_LEVEL) as usize]
}
