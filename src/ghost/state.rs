//! The ghost mode machine.
//!
//! [`GhostState::next`] is the whole transition table. Every (state, trigger) pair is spelled out so
//! adding a trigger forces a decision for each state.

use smallvec::SmallVec;
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::constants::ghost::{CHASE_TICKS, SCATTER_TICKS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum GhostState {
    /// Waiting inside the den. Every ghost starts here.
    House,
    Scatter,
    Chase,
    Frightened,
    /// Caught while frightened; only the eyes travel back to the den.
    Eaten,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ModeTrigger {
    ModeTimerExpired,
    FrightenedTimerExpired,
    EnteredHouseZone,
    ExitedHouseZone,
    PowerPelletEaten,
    CaughtByPlayer,
}

impl GhostState {
    /// Applies `trigger`. Triggers a state does not handle leave it unchanged.
    ///
    /// `chasing` selects where House and Frightened resume: Chase when set, Scatter otherwise.
    pub fn next(self, trigger: ModeTrigger, chasing: bool) -> GhostState {
        use GhostState::*;
        use ModeTrigger::*;

        let resume = if chasing { Chase } else { Scatter };
        match self {
            House => match trigger {
                ExitedHouseZone => resume,
                PowerPelletEaten => Frightened,
                ModeTimerExpired | FrightenedTimerExpired | EnteredHouseZone | CaughtByPlayer => House,
            },
            Scatter => match trigger {
                ModeTimerExpired => Chase,
                PowerPelletEaten => Frightened,
                FrightenedTimerExpired | EnteredHouseZone | ExitedHouseZone | CaughtByPlayer => Scatter,
            },
            Chase => match trigger {
                ModeTimerExpired => Scatter,
                PowerPelletEaten => Frightened,
                FrightenedTimerExpired | EnteredHouseZone | ExitedHouseZone | CaughtByPlayer => Chase,
            },
            Frightened => match trigger {
                FrightenedTimerExpired => resume,
                CaughtByPlayer => Eaten,
                PowerPelletEaten => Frightened,
                ModeTimerExpired | EnteredHouseZone | ExitedHouseZone => Frightened,
            },
            Eaten => match trigger {
                EnteredHouseZone => House,
                PowerPelletEaten => Frightened,
                ModeTimerExpired | FrightenedTimerExpired | ExitedHouseZone | CaughtByPlayer => Eaten,
            },
        }
    }

    /// Whether the mode timer runs in this state.
    pub fn is_roaming(self) -> bool {
        matches!(self, GhostState::Scatter | GhostState::Chase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GhostState,
    pub to: GhostState,
    pub trigger: ModeTrigger,
}

/// A ghost's current state together with the timers that drive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeMachine {
    state: GhostState,
    mode_timer: u32,
    frightened_timer: u32,
    chasing: bool,
    /// Set once the ghost reaches the den exit, cleared when it re-enters the den center.
    released: bool,
    frightened_duration: u32,
    warning_threshold: u32,
}

impl ModeMachine {
    pub fn new(frightened_duration: u32, warning_threshold: u32) -> Self {
        Self {
            state: GhostState::House,
            mode_timer: 0,
            frightened_timer: 0,
            chasing: false,
            released: false,
            frightened_duration,
            warning_threshold,
        }
    }

    pub fn state(&self) -> GhostState {
        self.state
    }

    pub fn mode_timer(&self) -> u32 {
        self.mode_timer
    }

    pub fn frightened_timer(&self) -> u32 {
        self.frightened_timer
    }

    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Ghosts still inside the den and eaten ghosts heading back may pass through the den door.
    pub fn passes_house_door(&self) -> bool {
        !self.released || self.state == GhostState::Eaten
    }

    pub fn frightened_duration(&self) -> u32 {
        self.frightened_duration
    }

    pub fn warning_threshold(&self) -> u32 {
        self.warning_threshold
    }

    /// Whether the frightened sprite should be in its flashing phase this tick.
    pub fn is_flashing(&self) -> bool {
        use crate::constants::ghost::{ANIMATION_FRAME_TICKS, FEAR_CYCLE_TICKS};

        self.state == GhostState::Frightened
            && self.frightened_timer > self.warning_threshold
            && self.frightened_timer % FEAR_CYCLE_TICKS <= ANIMATION_FRAME_TICKS
    }

    pub fn fire(&mut self, trigger: ModeTrigger) -> Option<Transition> {
        match trigger {
            ModeTrigger::ExitedHouseZone => self.released = true,
            ModeTrigger::EnteredHouseZone => self.released = false,
            _ => {}
        }
        let from = self.state;
        let to = from.next(trigger, self.chasing);
        self.state = to;
        (from != to).then_some(Transition { from, to, trigger })
    }

    /// Enters (or re-enters) Frightened with a fresh timer.
    pub fn frighten(&mut self) -> Option<Transition> {
        self.frightened_timer = 0;
        self.fire(ModeTrigger::PowerPelletEaten)
    }

    /// Advances the frightened and mode timers by one tick, firing their expiry triggers.
    ///
    /// The checks run in sequence against the live state, so a frightened interlude that ends this
    /// tick already counts the first tick of the resumed mode.
    pub fn tick_timers(&mut self) -> SmallVec<[Transition; 2]> {
        let mut fired = SmallVec::new();

        if self.state == GhostState::Frightened {
            self.frightened_timer += 1;
            if self.frightened_timer >= self.frightened_duration {
                fired.extend(self.fire(ModeTrigger::FrightenedTimerExpired));
            }
        }

        if self.state.is_roaming() {
            self.mode_timer += 1;
            let threshold = if self.chasing { CHASE_TICKS } else { SCATTER_TICKS };
            if self.mode_timer >= threshold {
                fired.extend(self.fire(ModeTrigger::ModeTimerExpired));
                self.mode_timer = 0;
                self.chasing = !self.chasing;
            }
        }

        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_power_pellet_frightens_every_state() {
        for state in GhostState::iter() {
            assert_eq!(state.next(ModeTrigger::PowerPelletEaten, false), GhostState::Frightened);
        }
    }

    #[test]
    fn test_only_frightened_ghosts_can_be_eaten() {
        for state in GhostState::iter() {
            let next = state.next(ModeTrigger::CaughtByPlayer, true);
            if state == GhostState::Frightened {
                assert_eq!(next, GhostState::Eaten);
            } else {
                assert_eq!(next, state);
            }
        }
    }

    #[test]
    fn test_fire_reports_no_transition_for_ignored_trigger() {
        let mut machine = ModeMachine::new(420, 294);
        assert_eq!(machine.fire(ModeTrigger::ModeTimerExpired), None);
        assert_eq!(machine.state(), GhostState::House);
    }

    #[test]
    fn test_release_survives_frightened_interlude() {
        let mut machine = ModeMachine::new(420, 294);
        machine.frighten();
        assert!(machine.passes_house_door());

        machine.fire(ModeTrigger::ExitedHouseZone);
        assert_eq!(machine.state(), GhostState::Frightened);
        assert!(machine.is_released());
        assert!(!machine.passes_house_door());

        machine.fire(ModeTrigger::CaughtByPlayer);
        assert!(machine.passes_house_door());
        machine.fire(ModeTrigger::EnteredHouseZone);
        assert!(!machine.is_released());
    }
}
