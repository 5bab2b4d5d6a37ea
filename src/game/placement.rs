use glam::IVec2;

use crate::collision::WallGrid;
use crate::error::{GameError, GameResult};
use crate::ghost::{Den, Personality};
use crate::item::PowerItem;

/// Resolved level data: where everything starts, in pixels. Map formats are the caller's business.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub level: u32,
    pub walls: WallGrid,
    pub den: Den,
    pub player: IVec2,
    /// Ghosts in update order.
    pub ghosts: Vec<(Personality, IVec2)>,
    pub pellets: Vec<IVec2>,
    pub power_items: Vec<(PowerItem, IVec2)>,
}

impl Placement {
    pub fn new(level: u32, walls: WallGrid, player: IVec2) -> Self {
        Self {
            level,
            walls,
            den: Den::default(),
            player,
            ghosts: Vec::new(),
            pellets: Vec::new(),
            power_items: Vec::new(),
        }
    }

    pub fn with_den(mut self, den: Den) -> Self {
        self.den = den;
        self
    }

    pub fn with_ghost(mut self, personality: Personality, position: IVec2) -> Self {
        self.ghosts.push((personality, position));
        self
    }

    pub fn with_pellet(mut self, position: IVec2) -> Self {
        self.pellets.push(position);
        self
    }

    pub fn with_power_item(mut self, item: PowerItem, position: IVec2) -> Self {
        self.power_items.push((item, position));
        self
    }

    /// Every entity must start on the board.
    pub fn validate(&self) -> GameResult<()> {
        let bounds = self.walls.pixel_size();
        let inside = |p: IVec2| p.x >= 0 && p.y >= 0 && p.x < bounds.x && p.y < bounds.y;

        if !inside(self.player) {
            return Err(GameError::Placement(format!("player at {} is outside the {bounds} board", self.player)));
        }
        if let Some((ghost, position)) = self.ghosts.iter().find(|(_, p)| !inside(*p)) {
            return Err(GameError::Placement(format!("{ghost} at {position} is outside the {bounds} board")));
        }
        let items = self.pellets.iter().chain(self.power_items.iter().map(|(_, p)| p));
        if let Some(position) = items.copied().find(|p| !inside(*p)) {
            return Err(GameError::Placement(format!("item at {position} is outside the {bounds} board")));
        }
        Ok(())
    }
}
