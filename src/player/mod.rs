//! The player entity and its decorator chain.
//!
//! Mirrors the ghost side: [`Pacman`] owns the body, [`PlayerDecorator`] layers forward everything they
//! don't override. Unlike ghosts, rendering always uses the outermost sprite so a layer can swap it.

use glam::IVec2;
use smallvec::SmallVec;
use strum_macros::Display;
use tracing::trace;

use crate::collision::{CollisionDetector, CollisionLayer, Contacts, Hitbox};
use crate::constants::BASE_SPEED;
use crate::entity::{Body, Canvas, Direction, PlayerSprite, TickContext};
use crate::error::{GameError, GameResult, Recipient};
use crate::item::{ItemTarget, PowerItem};

mod decorators;

pub use decorators::{FastMove, Shield};

/// The kind of a layer in a player chain, ordered innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum PlayerLayer {
    Base,
    Shield,
    FastMove,
}

pub trait PlayerEntity {
    fn layer(&self) -> PlayerLayer;
    fn decorated(&self) -> Option<&dyn PlayerEntity>;

    fn position(&self) -> IVec2;
    fn reposition(&mut self, position: IVec2);
    fn velocity(&self) -> IVec2;
    fn set_velocity(&mut self, velocity: IVec2);
    fn speed(&self) -> i32;
    fn size(&self) -> i32;
    fn hitbox(&self) -> Hitbox;
    fn on_the_grid(&self) -> bool;
    fn heading(&self) -> Option<Direction>;
    fn sprite(&self) -> PlayerSprite;

    /// Buffers a desired direction; it is taken at the next cell where it is open.
    fn steer(&mut self, direction: Direction);
    fn pre_update(&mut self, ctx: &mut TickContext<'_>);
    fn update_position(&mut self, velocity: IVec2);
    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()>;
    /// Items and ghosts touched this tick. Layers may filter what gets reported.
    fn contacts(&self, detector: &dyn CollisionDetector) -> Contacts;

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw(self.sprite().into(), self.position());
    }
}

pub trait PlayerDecorator {
    fn layer(&self) -> PlayerLayer;
    fn inner(&self) -> &dyn PlayerEntity;
    fn inner_mut(&mut self) -> &mut dyn PlayerEntity;

    fn position(&self) -> IVec2 {
        self.inner().position()
    }

    fn reposition(&mut self, position: IVec2) {
        self.inner_mut().reposition(position)
    }

    fn velocity(&self) -> IVec2 {
        self.inner().velocity()
    }

    fn set_velocity(&mut self, velocity: IVec2) {
        self.inner_mut().set_velocity(velocity)
    }

    fn speed(&self) -> i32 {
        self.inner().speed()
    }

    fn size(&self) -> i32 {
        self.inner().size()
    }

    fn hitbox(&self) -> Hitbox {
        self.inner().hitbox()
    }

    fn on_the_grid(&self) -> bool {
        self.inner().on_the_grid()
    }

    fn heading(&self) -> Option<Direction> {
        self.inner().heading()
    }

    fn sprite(&self) -> PlayerSprite {
        self.inner().sprite()
    }

    fn steer(&mut self, direction: Direction) {
        self.inner_mut().steer(direction)
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        self.inner_mut().pre_update(ctx)
    }

    fn update_position(&mut self, velocity: IVec2) {
        self.inner_mut().update_position(velocity)
    }

    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()> {
        self.inner_mut().power_item_eaten(item)
    }

    fn contacts(&self, detector: &dyn CollisionDetector) -> Contacts {
        self.inner().contacts(detector)
    }
}

impl<T: PlayerDecorator> PlayerEntity for T {
    fn layer(&self) -> PlayerLayer {
        PlayerDecorator::layer(self)
    }

    fn decorated(&self) -> Option<&dyn PlayerEntity> {
        Some(PlayerDecorator::inner(self))
    }

    fn position(&self) -> IVec2 {
        PlayerDecorator::position(self)
    }

    fn reposition(&mut self, position: IVec2) {
        PlayerDecorator::reposition(self, position)
    }

    fn velocity(&self) -> IVec2 {
        PlayerDecorator::velocity(self)
    }

    fn set_velocity(&mut self, velocity: IVec2) {
        PlayerDecorator::set_velocity(self, velocity)
    }

    fn speed(&self) -> i32 {
        PlayerDecorator::speed(self)
    }

    fn size(&self) -> i32 {
        PlayerDecorator::size(self)
    }

    fn hitbox(&self) -> Hitbox {
        PlayerDecorator::hitbox(self)
    }

    fn on_the_grid(&self) -> bool {
        PlayerDecorator::on_the_grid(self)
    }

    fn heading(&self) -> Option<Direction> {
        PlayerDecorator::heading(self)
    }

    fn sprite(&self) -> PlayerSprite {
        PlayerDecorator::sprite(self)
    }

    fn steer(&mut self, direction: Direction) {
        PlayerDecorator::steer(self, direction)
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        PlayerDecorator::pre_update(self, ctx)
    }

    fn update_position(&mut self, velocity: IVec2) {
        PlayerDecorator::update_position(self, velocity)
    }

    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()> {
        PlayerDecorator::power_item_eaten(self, item)
    }

    fn contacts(&self, detector: &dyn CollisionDetector) -> Contacts {
        PlayerDecorator::contacts(self, detector)
    }
}

/// Layer kinds from the outermost wrapper inwards.
pub fn chain_layers(player: &dyn PlayerEntity) -> SmallVec<[PlayerLayer; 3]> {
    let mut layers = SmallVec::new();
    let mut current = Some(player);
    while let Some(entity) = current {
        layers.push(entity.layer());
        current = entity.decorated();
    }
    layers
}

/// Checks the canonical order (Shield inside FastMove), each layer at most once, around one base.
pub fn validate_player_chain(player: &dyn PlayerEntity) -> GameResult<()> {
    let layers = chain_layers(player);
    match layers.split_last() {
        Some((PlayerLayer::Base, wrappers))
            if !wrappers.contains(&PlayerLayer::Base) && wrappers.windows(2).all(|pair| pair[0] > pair[1]) =>
        {
            Ok(())
        }
        _ => Err(GameError::InvalidComposition(format!(
            "player layers must be ordered Shield < FastMove around one base, found {layers:?}"
        ))),
    }
}

/// Builds the standard player chain: Shield, then FastMove.
pub fn decorate_player(pacman: Pacman, fast_ratio: i32) -> GameResult<Box<dyn PlayerEntity>> {
    let shielded: Box<dyn PlayerEntity> = Box::new(Shield::new(Box::new(pacman)));
    let player: Box<dyn PlayerEntity> = Box::new(FastMove::new(shielded, fast_ratio)?);
    validate_player_chain(player.as_ref())?;
    Ok(player)
}

/// The undecorated player.
#[derive(Debug, Clone)]
pub struct Pacman {
    body: Body,
    desired: Option<Direction>,
    heading: Option<Direction>,
}

impl Pacman {
    pub fn new(position: IVec2, bounds: IVec2) -> Self {
        Self {
            body: Body::new(position, BASE_SPEED, bounds),
            desired: None,
            heading: None,
        }
    }

    fn is_blocked(&self, detector: &dyn CollisionDetector, direction: Direction) -> bool {
        detector.is_blocked(self.body.hitbox().translated(direction.as_ivec2()), CollisionLayer::SOLID)
    }
}

impl PlayerEntity for Pacman {
    fn layer(&self) -> PlayerLayer {
        PlayerLayer::Base
    }

    fn decorated(&self) -> Option<&dyn PlayerEntity> {
        None
    }

    fn position(&self) -> IVec2 {
        self.body.position
    }

    fn reposition(&mut self, position: IVec2) {
        self.body.position = position;
    }

    fn velocity(&self) -> IVec2 {
        self.body.velocity
    }

    fn set_velocity(&mut self, velocity: IVec2) {
        self.body.velocity = velocity;
    }

    fn speed(&self) -> i32 {
        self.body.speed
    }

    fn size(&self) -> i32 {
        self.body.size
    }

    fn hitbox(&self) -> Hitbox {
        self.body.hitbox()
    }

    fn on_the_grid(&self) -> bool {
        self.body.on_the_grid()
    }

    fn heading(&self) -> Option<Direction> {
        self.heading
    }

    fn sprite(&self) -> PlayerSprite {
        PlayerSprite::Pacman {
            heading: self.heading,
            frame: self.body.frame(),
        }
    }

    fn steer(&mut self, direction: Direction) {
        self.desired = Some(direction);
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        let moving = Direction::from_velocity(self.body.velocity);

        // Reversing is allowed anywhere; other turns wait for a cell.
        if let (Some(desired), Some(current)) = (self.desired, moving) {
            if desired == current.opposite() {
                self.body.velocity = desired.as_ivec2() * self.body.speed;
                self.heading = Some(desired);
                return;
            }
        }

        if !self.body.on_the_grid() {
            return;
        }

        if let Some(desired) = self.desired {
            if !self.is_blocked(ctx.detector, desired) {
                if self.heading != Some(desired) {
                    trace!(direction = %desired, position = ?self.body.position, "Player turned");
                }
                self.body.velocity = desired.as_ivec2() * self.body.speed;
                self.heading = Some(desired);
                return;
            }
        }

        if let Some(current) = moving {
            if self.is_blocked(ctx.detector, current) {
                self.body.velocity = IVec2::ZERO;
            }
        }
    }

    fn update_position(&mut self, velocity: IVec2) {
        self.body.advance(velocity);
    }

    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()> {
        match item.target() {
            ItemTarget::Player => Ok(()),
            ItemTarget::Ghosts => Err(GameError::MisroutedPowerItem {
                item,
                recipient: Recipient::Player,
            }),
        }
    }

    fn contacts(&self, detector: &dyn CollisionDetector) -> Contacts {
        Contacts::query(detector, self.hitbox())
    }
}
