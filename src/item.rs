//! Collectible items placed on the board.

use glam::IVec2;
use strum_macros::{Display, EnumIter};

use crate::collision::Hitbox;
use crate::constants::{CELL_SIZE, PELLET_SIZE};

/// Which side of the board a power item affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemTarget {
    /// Dispatched to every ghost.
    Ghosts,
    /// Dispatched to the player.
    Player,
}

/// The four power item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PowerItem {
    /// Frightens every ghost.
    FrightenGhosts,
    /// Throttles ghost movement for a while.
    SlowGhosts,
    /// Makes the player immune to ghost contact for a while.
    Shield,
    /// Multiplies player speed for a while.
    FastMove,
}

impl PowerItem {
    pub fn target(self) -> ItemTarget {
        match self {
            PowerItem::FrightenGhosts | PowerItem::SlowGhosts => ItemTarget::Ghosts,
            PowerItem::Shield | PowerItem::FastMove => ItemTarget::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Pellet,
    Power(PowerItem),
}

/// A collectible at a fixed cell. Destroyed items stay in the list so indices remain stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub position: IVec2,
    pub collected: bool,
}

impl Item {
    pub fn new(kind: ItemKind, position: IVec2) -> Self {
        Self {
            kind,
            position,
            collected: false,
        }
    }

    /// Pellets occupy a small box in the middle of their cell; power items fill it.
    pub fn hitbox(&self) -> Hitbox {
        match self.kind {
            ItemKind::Pellet => {
                let inset = (CELL_SIZE - PELLET_SIZE) / 2;
                Hitbox::new(self.position + IVec2::splat(inset), IVec2::splat(PELLET_SIZE))
            }
            ItemKind::Power(_) => Hitbox::new(self.position, IVec2::splat(CELL_SIZE)),
        }
    }
}
