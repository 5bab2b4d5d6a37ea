use glam::IVec2;
use tracing::debug;

use crate::constants::ghost::SLOW_TICKS;
use crate::entity::TickContext;
use crate::error::{GameError, GameResult};
use crate::ghost::{GhostDecorator, GhostEntity, GhostLayer};
use crate::item::PowerItem;

/// Throttles movement after a SlowGhosts item: while active, the ghost only moves on ticks where the
/// effect counter is a multiple of `ratio`.
pub struct Slow {
    inner: Box<dyn GhostEntity>,
    ratio: u32,
    active: bool,
    timer: u32,
}

impl Slow {
    pub fn new(inner: Box<dyn GhostEntity>, ratio: u32) -> GameResult<Self> {
        if ratio == 0 {
            return Err(GameError::InvalidComposition("slow ratio must be at least 1".into()));
        }
        Ok(Self {
            inner,
            ratio,
            active: false,
            timer: 0,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }
}

impl GhostDecorator for Slow {
    fn layer(&self) -> GhostLayer {
        GhostLayer::Slow
    }

    fn inner(&self) -> &dyn GhostEntity {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn GhostEntity {
        self.inner.as_mut()
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        if self.active {
            self.timer += 1;
            if self.timer >= SLOW_TICKS {
                self.timer = 0;
                self.active = false;
                debug!(ghost = %self.inner.personality(), "Slow effect expired");
            }
        }
        self.inner.pre_update(ctx);
    }

    fn update_position(&mut self, velocity: IVec2) {
        if !self.active || self.timer % self.ratio == 0 {
            self.inner.update_position(velocity);
        }
    }

    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()> {
        if item == PowerItem::SlowGhosts {
            self.timer = 0;
            self.active = true;
            debug!(ghost = %self.inner.personality(), ratio = self.ratio, "Slow effect started");
        }
        self.inner.power_item_eaten(item)
    }
}
