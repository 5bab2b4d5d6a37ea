//! The movable entity base shared by ghosts and the player.

use glam::IVec2;
use rand::rngs::SmallRng;

use crate::collision::{CollisionDetector, Hitbox};
use crate::constants::{ghost::ANIMATION_FRAME_TICKS, CELL_SIZE, ENTITY_SIZE};
use crate::ghost::steering::TargetView;

pub mod direction;
pub mod sprite;

pub use direction::{Direction, DIRECTIONS};
pub use sprite::{Canvas, FrameRecorder, GhostSprite, PlayerSprite, Sprite};

/// Position, velocity and animation state of a movable entity.
///
/// Only the innermost entity of a decorator chain owns a body; wrappers read and write it through
/// the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub position: IVec2,
    pub velocity: IVec2,
    pub speed: i32,
    pub size: i32,
    /// Board size in pixels; positions wrap around it. A zero axis disables wrapping.
    bounds: IVec2,
    anim_ticks: u32,
}

impl Body {
    pub fn new(position: IVec2, speed: i32, bounds: IVec2) -> Self {
        Self {
            position,
            velocity: IVec2::ZERO,
            speed,
            size: ENTITY_SIZE,
            bounds,
            anim_ticks: 0,
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.position, IVec2::splat(self.size))
    }

    /// Whether the entity sits exactly on a cell; direction changes only happen here.
    pub fn on_the_grid(&self) -> bool {
        self.position.x % CELL_SIZE == 0 && self.position.y % CELL_SIZE == 0
    }

    pub fn bounds(&self) -> IVec2 {
        self.bounds
    }

    /// Applies one tick of movement, wrapping through the tunnels at the board edges.
    pub fn advance(&mut self, velocity: IVec2) {
        let mut next = self.position + velocity;
        if self.bounds.x > 0 {
            next.x = next.x.rem_euclid(self.bounds.x);
        }
        if self.bounds.y > 0 {
            next.y = next.y.rem_euclid(self.bounds.y);
        }
        self.position = next;

        if velocity != IVec2::ZERO {
            self.anim_ticks = self.anim_ticks.wrapping_add(1);
        }
    }

    /// Two-frame walk animation index.
    pub fn frame(&self) -> u8 {
        ((self.anim_ticks / ANIMATION_FRAME_TICKS) % 2) as u8
    }
}

/// Everything an entity hook may read during one tick.
///
/// Built by the update loop; hooks never reach into global state.
pub struct TickContext<'a> {
    pub tick: u64,
    /// Movement and timers stay frozen until the player has given the first input.
    pub first_input: bool,
    pub detector: &'a dyn CollisionDetector,
    pub targets: TargetView,
    pub rng: &'a mut SmallRng,
}

impl<'a> TickContext<'a> {
    pub fn new(detector: &'a dyn CollisionDetector, rng: &'a mut SmallRng) -> Self {
        Self {
            tick: 0,
            first_input: false,
            detector,
            targets: TargetView::default(),
            rng,
        }
    }

    pub fn with_input(mut self) -> Self {
        self.first_input = true;
        self
    }

    pub fn with_targets(mut self, targets: TargetView) -> Self {
        self.targets = targets;
        self
    }
}
