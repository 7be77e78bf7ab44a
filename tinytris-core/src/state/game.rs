//! Owned game state threaded through the main loop
//!
//! One [`GameState`] holds everything the game needs between frames: the
//! board, the tile sequence, the counters, the phase and the gravity timer.
//! The loop feeds it commands and ticks, then renders the [`Frame`] it hands
//! back.

use super::counters::Counters;
use super::events::Event;
use super::frame::{Frame, Redraw};
use super::machine::Phase;
use super::scoring::{
    gravity_frames, level_for, line_clear_points, HARD_DROP_POINTS, SOFT_DROP_POINTS,
};
use crate::board::{extent, Board, Tile, TileKind, Turn};
use crate::config::GameConfig;
use crate::input::{InputCommand, InputSource};
use crate::rng::TileBag;

/// Everything the game loop owns
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    bag: TileBag,
    next: TileKind,
    counters: Counters,
    phase: Phase,
    gravity_timer: u8,
    pending: Frame,
}

impl GameState {
    /// Create an idle game
    pub fn new(config: GameConfig) -> Self {
        let config = config.sanitized();
        let mut bag = TileBag::new(config.seed);
        let next = bag.draw();
        let mut counters = Counters::new();
        counters.reset(config.start_level);

        Self {
            config,
            board: Board::new(),
            bag,
            next,
            counters,
            phase: Phase::Idle,
            gravity_timer: 0,
            pending: Frame::full(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Shape that spawns after the active one
    pub fn next_tile(&self) -> TileKind {
        self.next
    }

    /// Begin a fresh game
    ///
    /// Only has an effect from [`Phase::Idle`] or [`Phase::GameOver`]. The
    /// high score carries over.
    pub fn start(&mut self) -> bool {
        if !self.phase.can_start() {
            return false;
        }
        self.board.clear();
        self.counters.reset(self.config.start_level);
        self.phase = self.phase.transition(Event::Start);
        self.pending = Frame::full();

        #[cfg(feature = "defmt")]
        defmt::info!("game started at level {}", self.config.start_level);

        self.spawn();
        true
    }

    /// Apply one player command
    pub fn handle(&mut self, command: InputCommand) {
        match command {
            InputCommand::Start => {
                self.start();
            }
            InputCommand::Pause => {
                let event = if self.phase == Phase::Paused {
                    Event::Resume
                } else {
                    Event::Pause
                };
                self.phase = self.phase.transition(event);
            }
            _ if !self.phase.is_active() => {}
            InputCommand::Left => {
                self.shift(|board| board.try_move(-1, 0));
            }
            InputCommand::Right => {
                self.shift(|board| board.try_move(1, 0));
            }
            InputCommand::RotateCw => {
                self.shift(|board| board.try_rotate(Turn::Clockwise));
            }
            InputCommand::RotateCcw => {
                self.shift(|board| board.try_rotate(Turn::CounterClockwise));
            }
            InputCommand::Down => {
                if self.step_down() {
                    self.counters.add_points(SOFT_DROP_POINTS);
                    self.gravity_timer = 0;
                }
            }
            InputCommand::Drop => self.hard_drop(),
        }
    }

    /// Apply every command waiting in the input queue
    pub fn drain(&mut self, source: &mut InputSource<'_>) {
        while let Some(command) = source.pop() {
            self.handle(command);
        }
    }

    /// Advance one frame of gravity
    pub fn tick(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        self.gravity_timer = self.gravity_timer.saturating_add(1);
        if self.gravity_timer >= gravity_frames(self.counters.level()) {
            self.gravity_timer = 0;
            self.step_down();
        }
    }

    /// Drop the active tile one row, settling it if it cannot fall
    ///
    /// Returns whether the tile moved. Does nothing unless a game is in
    /// play.
    pub fn step_down(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        if self.shift(|board| board.try_move(0, 1)) {
            true
        } else {
            self.settle();
            false
        }
    }

    fn hard_drop(&mut self) {
        let before = self.board.active();
        let rows = self.board.drop_to_floor();
        if rows > 0 {
            self.mark_tile(before);
            self.mark_tile(self.board.active());
            self.counters.add_points(HARD_DROP_POINTS * rows as u32);
        }
        self.settle();
    }

    fn shift(&mut self, action: impl FnOnce(&mut Board) -> bool) -> bool {
        let before = self.board.active();
        let moved = action(&mut self.board);
        if moved {
            self.mark_tile(before);
            self.mark_tile(self.board.active());
        }
        moved
    }

    fn mark_tile(&mut self, tile: Option<Tile>) {
        if let Some((top, bottom)) = tile.as_ref().and_then(extent) {
            self.pending.redraw = self.pending.redraw.merge(Redraw::band(top, bottom));
        }
    }

    fn settle(&mut self) {
        self.board.lock();
        let cleared = self.board.scan_completed_lines();
        if cleared > 0 {
            let level = self.counters.level();
            self.counters.add_points(line_clear_points(cleared, level));
            self.counters.add_lines(cleared);

            let new_level = level_for(
                self.config.start_level,
                self.counters.lines(),
                self.config.lines_per_level,
            )
            .max(level);
            if new_level != level {
                #[cfg(feature = "defmt")]
                defmt::info!("level up: {}", new_level);
            }
            self.counters.set_level(new_level);

            // Everything above the cleared rows moved
            self.pending.redraw = Redraw::Full;
        }
        self.spawn();
    }

    fn spawn(&mut self) {
        let kind = self.next;
        self.next = self.bag.draw();
        self.pending.next_tile = true;
        self.gravity_timer = 0;

        if self.board.inject(kind) {
            self.mark_tile(self.board.active());
        } else if self.board.check_game_over() {
            self.phase = self.phase.transition(Event::SpawnBlocked);
            #[cfg(feature = "defmt")]
            defmt::info!("game over, score {}", self.counters.score());
        }
    }

    /// Collect and reset the updates since the last call
    pub fn take_frame(&mut self) -> Frame {
        let mut frame = core::mem::take(&mut self.pending);
        frame.counters = frame.counters.union(self.counters.take_dirty());
        frame
    }
}
