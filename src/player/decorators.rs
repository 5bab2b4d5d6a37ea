use glam::IVec2;
use tracing::debug;

use crate::collision::{CollisionDetector, Contacts};
use crate::constants::player::{FAST_MOVE_TICKS, SHIELD_TICKS};
use crate::constants::CELL_SIZE;
use crate::entity::{PlayerSprite, TickContext};
use crate::error::{GameError, GameResult};
use crate::item::PowerItem;
use crate::player::{PlayerDecorator, PlayerEntity, PlayerLayer};

/// Ignores ghost contact for a while after a Shield item. Pellets and power items still register.
pub struct Shield {
    inner: Box<dyn PlayerEntity>,
    active: bool,
    timer: u32,
}

impl Shield {
    pub fn new(inner: Box<dyn PlayerEntity>) -> Self {
        Self {
            inner,
            active: false,
            timer: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl PlayerDecorator for Shield {
    fn layer(&self) -> PlayerLayer {
        PlayerLayer::Shield
    }

    fn inner(&self) -> &dyn PlayerEntity {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn PlayerEntity {
        self.inner.as_mut()
    }

    fn sprite(&self) -> PlayerSprite {
        match self.inner.sprite() {
            PlayerSprite::Pacman { heading, frame } if self.active => PlayerSprite::Shielded { heading, frame },
            sprite => sprite,
        }
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        if self.active {
            self.timer += 1;
            if self.timer >= SHIELD_TICKS {
                self.timer = 0;
                self.active = false;
                debug!("Shield expired");
            }
        }
        self.inner.pre_update(ctx);
    }

    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()> {
        if item == PowerItem::Shield {
            self.timer = 0;
            self.active = true;
            debug!("Shield raised");
        }
        self.inner.power_item_eaten(item)
    }

    fn contacts(&self, detector: &dyn CollisionDetector) -> Contacts {
        let mut contacts = self.inner.contacts(detector);
        if self.active {
            contacts.ghost = None;
        }
        contacts
    }
}

/// Multiplies speed and velocity by `ratio` for a while after a FastMove item, but only on grid cells
/// so the player never skips past a turn.
pub struct FastMove {
    inner: Box<dyn PlayerEntity>,
    ratio: i32,
    active: bool,
    timer: u32,
}

impl FastMove {
    pub fn new(inner: Box<dyn PlayerEntity>, ratio: i32) -> GameResult<Self> {
        if ratio < 1 {
            return Err(GameError::InvalidComposition(format!("fast move ratio must be at least 1, got {ratio}")));
        }
        // Walls are checked one pixel ahead, so a boosted step must not reach the next cell.
        if inner.speed().saturating_mul(ratio) >= CELL_SIZE {
            return Err(GameError::InvalidComposition(format!(
                "fast move ratio {ratio} would step a full cell at speed {}",
                inner.speed()
            )));
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

    fn multiplier(&self) -> i32 {
        if self.active && self.inner.on_the_grid() {
            self.ratio
        } else {
            1
        }
    }
}

impl PlayerDecorator for FastMove {
    fn layer(&self) -> PlayerLayer {
        PlayerLayer::FastMove
    }

    fn inner(&self) -> &dyn PlayerEntity {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn PlayerEntity {
        self.inner.as_mut()
    }

    fn speed(&self) -> i32 {
        self.inner.speed() * self.multiplier()
    }

    fn velocity(&self) -> IVec2 {
        self.inner.velocity() * self.multiplier()
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        if self.active {
            self.timer += 1;
            if self.timer >= FAST_MOVE_TICKS {
                self.timer = 0;
                self.active = false;
                debug!("Fast move expired");
            }
        }
        self.inner.pre_update(ctx);
    }

    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()> {
        if item == PowerItem::FastMove {
            self.timer = 0;
            self.active = true;
            debug!(ratio = self.ratio, "Fast move started");
        }
        self.inner.power_item_eaten(item)
    }
}
