//! Gameplay events and the observers that consume them.

use std::sync::Arc;

use glam::IVec2;
use parking_lot::Mutex;
use tracing::trace;

use crate::constants::score;
use crate::ghost::Personality;
use crate::item::PowerItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PelletEaten { position: IVec2 },
    PowerItemEaten { item: PowerItem, position: IVec2 },
    /// The player caught a frightened ghost.
    GhostEaten { ghost: Personality },
    /// A roaming ghost caught the player.
    GameOver { ghost: Personality },
    /// Every item on the board has been collected.
    LevelCleared,
}

impl GameEvent {
    /// Points awarded for this event.
    pub fn score_value(&self) -> Option<u32> {
        match self {
            GameEvent::PelletEaten { .. } => Some(score::PELLET),
            GameEvent::PowerItemEaten { .. } => Some(score::POWER_ITEM),
            GameEvent::GhostEaten { .. } => Some(score::GHOST),
            GameEvent::GameOver { .. } | GameEvent::LevelCleared => None,
        }
    }
}

pub trait GameObserver {
    fn notify(&mut self, event: &GameEvent);
}

/// Shared observers, so the caller can keep a handle and read results after the run.
impl<T: GameObserver> GameObserver for Arc<Mutex<T>> {
    fn notify(&mut self, event: &GameEvent) {
        self.lock().notify(event);
    }
}

/// Fans each event out to every subscriber, in subscription order.
#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn GameObserver>>,
}

impl EventBus {
    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify(&mut self, event: GameEvent) {
        trace!(event = ?event, observers = self.observers.len(), "Dispatching event");
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}

/// Running score and counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u32,
    pub pellets: u32,
    pub power_items: u32,
    pub ghosts: u32,
    pub game_over: bool,
    pub cleared: bool,
}

impl GameObserver for Scoreboard {
    fn notify(&mut self, event: &GameEvent) {
        self.score += event.score_value().unwrap_or(0);
        match event {
            GameEvent::PelletEaten { .. } => self.pellets += 1,
            GameEvent::PowerItemEaten { .. } => self.power_items += 1,
            GameEvent::GhostEaten { .. } => self.ghosts += 1,
            GameEvent::GameOver { .. } => self.game_over = true,
            GameEvent::LevelCleared => self.cleared = true,
        }
    }
}

/// Records every event it sees.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl GameObserver for EventLog {
    fn notify(&mut self, event: &GameEvent) {
        self.events.push(*event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoreboard_totals() {
        let mut board = Scoreboard::default();
        board.notify(&GameEvent::PelletEaten { position: IVec2::ZERO });
        board.notify(&GameEvent::PowerItemEaten {
            item: PowerItem::Shield,
            position: IVec2::ZERO,
        });
        board.notify(&GameEvent::GhostEaten {
            ghost: Personality::Inky,
        });
        assert_eq!(board.score, 610);
        assert_eq!((board.pellets, board.power_items, board.ghosts), (1, 1, 1));
    }

    #[test]
    fn test_shared_observer_sees_events() {
        let log = Arc::new(Mutex::new(EventLog::default()));
        let mut bus = EventBus::default();
        bus.subscribe(Box::new(log.clone()));
        bus.notify(GameEvent::LevelCleared);
        assert_eq!(log.lock().events, vec![GameEvent::LevelCleared]);
    }
}
