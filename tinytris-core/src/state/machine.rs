//! Game phase machine
//!
//! Whether the loop applies gravity and movement is a function of the
//! current phase alone.

use super::events::Event;

/// Game phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Power-on, waiting for the first start
    #[default]
    Idle,
    /// A tile is falling
    Playing,
    /// Play suspended by the player
    Paused,
    /// A new tile could not be placed
    GameOver,
}

impl Phase {
    /// Check if gravity and movement apply in this phase
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Playing)
    }

    /// Check if a start command begins a fresh game from here
    pub fn can_start(&self) -> bool {
        matches!(self, Phase::Idle | Phase::GameOver)
    }

    /// Process an event and return the next phase
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Phase::*;

        match (self, event) {
            (Idle, Start) => Playing,

            (Playing, Pause) => Paused,
            (Playing, SpawnBlocked) => GameOver,

            (Paused, Resume) => Playing,

            (GameOver, Start) => Playing,

            // Default: stay in current phase
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_to_playing() {
        assert_eq!(Phase::Idle.transition(Event::Start), Phase::Playing);
    }

    #[test]
    fn test_pause_flow() {
        let paused = Phase::Playing.transition(Event::Pause);
        assert_eq!(paused, Phase::Paused);
        assert!(!paused.is_active());

        let playing = paused.transition(Event::Resume);
        assert_eq!(playing, Phase::Playing);
        assert!(playing.is_active());
    }

    #[test]
    fn test_game_over_and_restart() {
        let over = Phase::Playing.transition(Event::SpawnBlocked);
        assert_eq!(over, Phase::GameOver);
        assert!(over.can_start());
        assert_eq!(over.transition(Event::Start), Phase::Playing);
    }

    #[test]
    fn test_ignored_events() {
        assert_eq!(Phase::Idle.transition(Event::Pause), Phase::Idle);
        assert_eq!(Phase::Paused.transition(Event::Start), Phase::Paused);
        assert_eq!(Phase::Paused.transition(Event::SpawnBlocked), Phase::Paused);
        assert_eq!(Phase::Playing.transition(Event::Start), Phase::Playing);
        assert_eq!(Phase::GameOver.transition(Event::Resume), Phase::GameOver);
    }
}
