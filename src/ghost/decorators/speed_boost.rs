use glam::IVec2;
use tracing::debug;

use crate::entity::TickContext;
use crate::ghost::{GhostDecorator, GhostEntity, GhostLayer};
use crate::level::LevelStrategy;

/// Raises ghost speed by the level's increase rate.
///
/// The boosted value is computed once from the inner speed. After the inner hook has picked a heading,
/// every non-zero velocity axis is rewritten to the boosted magnitude, keeping its sign.
pub struct SpeedBoost {
    inner: Box<dyn GhostEntity>,
    boosted: i32,
}

impl SpeedBoost {
    pub fn new(inner: Box<dyn GhostEntity>, strategy: &LevelStrategy) -> Self {
        let base = inner.speed();
        let boosted = strategy.boosted_speed(base);
        debug!(ghost = %inner.personality(), base, boosted, "Speed boost applied");
        Self { inner, boosted }
    }

    pub fn boosted_speed(&self) -> i32 {
        self.boosted
    }
}

impl GhostDecorator for SpeedBoost {
    fn layer(&self) -> GhostLayer {
        GhostLayer::SpeedBoost
    }

    fn inner(&self) -> &dyn GhostEntity {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn GhostEntity {
        self.inner.as_mut()
    }

    fn speed(&self) -> i32 {
        self.boosted
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        self.inner.pre_update(ctx);

        let velocity = self.inner.velocity();
        let boosted = IVec2::new(velocity.x.signum(), velocity.y.signum()) * self.boosted;
        if boosted != velocity {
            self.inner.set_velocity(boosted);
        }
    }
}
