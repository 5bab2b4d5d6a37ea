//! Runtime behavior modifiers stacked around a ghost.

use rand::Rng;

use crate::constants::ghost::TELEPORT_STAGGER_TICKS;
use crate::error::GameResult;
use crate::ghost::{validate_ghost_chain, Ghost, GhostEntity};
use crate::level::LevelStrategy;

mod invisible;
mod slow;
mod speed_boost;
mod teleport;

pub use invisible::Invisible;
pub use slow::Slow;
pub use speed_boost::SpeedBoost;
pub use teleport::{Teleport, TeleportOutcome};

/// Wraps a ghost layer by layer. [`GhostBuilder::build`] rejects chains out of canonical order.
pub struct GhostBuilder {
    ghost: Box<dyn GhostEntity>,
}

impl GhostBuilder {
    pub fn new(ghost: impl GhostEntity + 'static) -> Self {
        Self { ghost: Box::new(ghost) }
    }

    pub fn speed_boost(self, strategy: &LevelStrategy) -> Self {
        Self {
            ghost: Box::new(SpeedBoost::new(self.ghost, strategy)),
        }
    }

    pub fn slow(self, ratio: u32) -> GameResult<Self> {
        Ok(Self {
            ghost: Box::new(Slow::new(self.ghost, ratio)?),
        })
    }

    /// Adds a teleport layer with a random initial stagger.
    pub fn teleport<R: Rng + ?Sized>(self, strategy: &LevelStrategy, rng: &mut R) -> Self {
        let stagger = rng.random_range(0..TELEPORT_STAGGER_TICKS);
        self.teleport_staggered(strategy, stagger, rng)
    }

    pub fn teleport_staggered<R: Rng + ?Sized>(self, strategy: &LevelStrategy, stagger: u32, rng: &mut R) -> Self {
        Self {
            ghost: Box::new(Teleport::new(self.ghost, strategy.clone(), stagger, rng)),
        }
    }

    pub fn invisible<R: Rng + ?Sized>(self, strategy: &LevelStrategy, rng: &mut R) -> Self {
        Self {
            ghost: Box::new(Invisible::new(self.ghost, strategy.clone(), rng)),
        }
    }

    pub fn build(self) -> GameResult<Box<dyn GhostEntity>> {
        validate_ghost_chain(self.ghost.as_ref())?;
        Ok(self.ghost)
    }
}

/// Builds the level's ghost chain: SpeedBoost and Slow always, Teleport and Invisible when the level
/// enables them.
pub fn decorate_for_level<R: Rng + ?Sized>(
    ghost: Ghost,
    strategy: &LevelStrategy,
    slow_ratio: u32,
    rng: &mut R,
) -> GameResult<Box<dyn GhostEntity>> {
    let mut builder = GhostBuilder::new(ghost).speed_boost(strategy).slow(slow_ratio)?;
    if strategy.teleport_enabled() {
        builder = builder.teleport(strategy, rng);
    }
    if strategy.invisibility_enabled() {
        builder = builder.invisible(strategy, rng);
    }
    builder.build()
}
