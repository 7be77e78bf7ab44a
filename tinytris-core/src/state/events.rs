//! Events that trigger phase transitions

/// Events that can trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Player pressed start
    Start,
    /// Player paused a running game
    Pause,
    /// Player resumed a paused game
    Resume,
    /// A freshly injected tile did not fit at the spawn anchor
    SpawnBlocked,
}
