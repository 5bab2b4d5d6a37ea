use glam::IVec2;
use tracing::{debug, trace};

use crate::collision::{CollisionDetector, CollisionLayer, EntityRef};
use crate::constants::{ghost::TELEPORT_CELLS, CELL_SIZE};
use crate::entity::{Direction, TickContext};
use crate::ghost::{GhostDecorator, GhostEntity, GhostLayer};
use crate::level::LevelStrategy;

/// Result of one teleport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportOutcome {
    Moved { from: IVec2, to: IVec2 },
    /// The ghost had no heading.
    Stationary,
    /// A wall or door lies on the path.
    Blocked(EntityRef),
    /// The landing cell is off the board.
    OutOfBounds(IVec2),
}

/// Periodically jumps the ghost a fixed number of cells ahead along its heading.
///
/// Attempts that would cross a wall or leave the board are skipped; the interval is re-sampled either way.
pub struct Teleport {
    inner: Box<dyn GhostEntity>,
    strategy: LevelStrategy,
    timer: u32,
    next_teleport: u32,
    last_outcome: Option<TeleportOutcome>,
}

impl Teleport {
    /// `stagger` is the initial timer value, so ghosts built together do not jump in unison.
    pub fn new<R: rand::Rng + ?Sized>(
        inner: Box<dyn GhostEntity>,
        strategy: LevelStrategy,
        stagger: u32,
        rng: &mut R,
    ) -> Self {
        let next_teleport = strategy.teleport_interval(rng);
        Self {
            inner,
            strategy,
            timer: stagger,
            next_teleport,
            last_outcome: None,
        }
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn next_teleport(&self) -> u32 {
        self.next_teleport
    }

    pub fn last_outcome(&self) -> Option<TeleportOutcome> {
        self.last_outcome
    }

    fn attempt(&mut self, detector: &dyn CollisionDetector) -> TeleportOutcome {
        let from = self.inner.position();
        let Some(heading) = Direction::from_velocity(self.inner.velocity()) else {
            return TeleportOutcome::Stationary;
        };

        let solid = if self.inner.machine().passes_house_door() {
            CollisionLayer::WALL
        } else {
            CollisionLayer::SOLID
        };
        let step = heading.as_ivec2() * CELL_SIZE;
        let hitbox = self.inner.hitbox();
        for cells in 1..=TELEPORT_CELLS {
            if let Some(hit) = detector.check_collision(hitbox.translated(step * cells), solid) {
                return TeleportOutcome::Blocked(hit);
            }
        }

        let to = from + step * TELEPORT_CELLS;
        let bounds = detector.bounds();
        if to.x < 0 || to.y < 0 || to.x >= bounds.x || to.y >= bounds.y {
            return TeleportOutcome::OutOfBounds(to);
        }

        self.inner.reposition(to);
        TeleportOutcome::Moved { from, to }
    }
}

impl GhostDecorator for Teleport {
    fn layer(&self) -> GhostLayer {
        GhostLayer::Teleport
    }

    fn inner(&self) -> &dyn GhostEntity {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn GhostEntity {
        self.inner.as_mut()
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        self.inner.pre_update(ctx);

        if !ctx.first_input || !self.strategy.teleport_enabled() {
            return;
        }

        self.timer += 1;
        if self.timer < self.next_teleport {
            return;
        }

        self.timer = 0;
        let outcome = self.attempt(ctx.detector);
        match outcome {
            TeleportOutcome::Moved { from, to } => {
                debug!(ghost = %self.inner.personality(), from = ?from, to = ?to, "Ghost teleported")
            }
            other => trace!(ghost = %self.inner.personality(), outcome = ?other, "Teleport skipped"),
        }
        self.last_outcome = Some(outcome);
        self.next_teleport = self.strategy.teleport_interval(&mut *ctx.rng);
    }
}
