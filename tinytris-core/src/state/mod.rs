//! Game state
//!
//! The phase machine is explicit, finite and deterministic. Everything the
//! loop carries between frames lives in one owned [`GameState`].

pub mod counters;
pub mod events;
pub mod frame;
pub mod game;
pub mod machine;
pub mod scoring;

pub use counters::{digit_pairs, CounterKind, CounterSet, Counters, DigitPairs};
pub use events::Event;
pub use frame::{Frame, Redraw};
pub use game::GameState;
pub use machine::Phase;
