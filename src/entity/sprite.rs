//! Sprite selection and the render hook.
//!
//! The core never rasterizes anything; it only decides which sprite an entity shows and where.

use glam::IVec2;

use crate::entity::Direction;
use crate::ghost::Personality;
use crate::item::PowerItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostSprite {
    Body {
        personality: Personality,
        heading: Option<Direction>,
        frame: u8,
    },
    /// `flash` is set during the closing warning phase of the frightened timer.
    Frightened { frame: u8, flash: bool },
    Eyes { heading: Option<Direction> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSprite {
    Pacman { heading: Option<Direction>, frame: u8 },
    Shielded { heading: Option<Direction>, frame: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Pellet,
    PowerItem(PowerItem),
    Player(PlayerSprite),
    Ghost(GhostSprite),
}

impl From<GhostSprite> for Sprite {
    fn from(sprite: GhostSprite) -> Self {
        Sprite::Ghost(sprite)
    }
}

impl From<PlayerSprite> for Sprite {
    fn from(sprite: PlayerSprite) -> Self {
        Sprite::Player(sprite)
    }
}

/// Receives draw calls from entities.
pub trait Canvas {
    fn draw(&mut self, sprite: Sprite, position: IVec2);
}

/// A canvas that records every draw call, in order.
#[derive(Debug, Default, Clone)]
pub struct FrameRecorder {
    pub draws: Vec<(Sprite, IVec2)>,
}

impl FrameRecorder {
    pub fn clear(&mut self) {
        self.draws.clear();
    }

    pub fn ghost_draws(&self) -> impl Iterator<Item = &(Sprite, IVec2)> {
        self.draws.iter().filter(|(sprite, _)| matches!(sprite, Sprite::Ghost(_)))
    }
}

impl Canvas for FrameRecorder {
    fn draw(&mut self, sprite: Sprite, position: IVec2) {
        self.draws.push((sprite, position));
    }
}
