use tracing::debug;

use crate::collision::Hitbox;
use crate::entity::{Canvas, TickContext};
use crate::ghost::{GhostDecorator, GhostEntity, GhostLayer};
use crate::level::LevelStrategy;

/// Makes the ghost vanish for a while at sampled intervals. While invisible it is not drawn and its
/// hitbox has zero area, so the player passes straight through it.
pub struct Invisible {
    inner: Box<dyn GhostEntity>,
    strategy: LevelStrategy,
    invisible: bool,
    timer: u32,
    elapsed: u32,
    next_invisible: u32,
}

impl Invisible {
    pub fn new<R: rand::Rng + ?Sized>(inner: Box<dyn GhostEntity>, strategy: LevelStrategy, rng: &mut R) -> Self {
        let next_invisible = strategy.invisible_interval(rng);
        Self {
            inner,
            strategy,
            invisible: false,
            timer: 0,
            elapsed: 0,
            next_invisible,
        }
    }

    pub fn is_invisible(&self) -> bool {
        self.invisible
    }

    pub fn next_invisible(&self) -> u32 {
        self.next_invisible
    }
}

impl GhostDecorator for Invisible {
    fn layer(&self) -> GhostLayer {
        GhostLayer::Invisible
    }

    fn inner(&self) -> &dyn GhostEntity {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn GhostEntity {
        self.inner.as_mut()
    }

    fn hitbox(&self) -> Hitbox {
        if self.invisible {
            Hitbox::EMPTY
        } else {
            self.inner.hitbox()
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        if !self.invisible {
            self.inner.render(canvas);
        }
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        self.inner.pre_update(ctx);

        if !ctx.first_input || !self.strategy.invisibility_enabled() {
            return;
        }

        if self.invisible {
            self.elapsed += 1;
            if self.elapsed >= self.strategy.invisible_duration() {
                self.invisible = false;
                self.elapsed = 0;
                self.timer = 0;
                self.next_invisible = self.strategy.invisible_interval(&mut *ctx.rng);
                debug!(ghost = %self.inner.personality(), next = self.next_invisible, "Ghost visible again");
            }
        } else {
            self.timer += 1;
            if self.timer >= self.next_invisible {
                self.invisible = true;
                self.timer = 0;
                debug!(ghost = %self.inner.personality(), "Ghost turned invisible");
            }
        }
    }
}
