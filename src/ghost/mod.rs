//! Ghosts: the base entity, its mode machine and the decorator chain around it.
//!
//! A ghost is always handled as a `Box<dyn GhostEntity>`. The innermost value is a [`Ghost`], which owns
//! the body and the mode machine; every layer around it is a [`GhostDecorator`] that overrides the few
//! operations it changes and forwards the rest.

use glam::IVec2;
use smallvec::SmallVec;
use strum_macros::{Display, EnumIter};
use tracing::{debug, trace};

use crate::collision::{CollisionLayer, Hitbox};
use crate::constants::{ghost::ANIMATION_FRAME_TICKS, BASE_SPEED, HOUSE_CENTER, HOUSE_EXIT};
use crate::entity::{Body, Canvas, Direction, GhostSprite, TickContext};
use crate::error::{GameError, GameResult, Recipient};
use crate::item::{ItemTarget, PowerItem};
use crate::level::LevelStrategy;

pub mod decorators;
pub mod state;
pub mod steering;

use state::{GhostState, ModeMachine, ModeTrigger, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Personality {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

/// The kind of a layer in a ghost chain, ordered innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum GhostLayer {
    Base,
    SpeedBoost,
    Slow,
    Teleport,
    Invisible,
}

/// The den cells that drive House transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Den {
    /// Reaching this cell exactly releases a House ghost.
    pub exit: IVec2,
    /// Reaching this cell exactly returns an Eaten ghost to the House.
    pub center: IVec2,
}

impl Default for Den {
    fn default() -> Self {
        Self {
            exit: HOUSE_EXIT,
            center: HOUSE_CENTER,
        }
    }
}

/// The capability surface every layer of a ghost chain exposes.
pub trait GhostEntity {
    fn layer(&self) -> GhostLayer;
    /// The entity this layer wraps, or `None` for the base ghost.
    fn decorated(&self) -> Option<&dyn GhostEntity>;

    fn personality(&self) -> Personality;
    fn machine(&self) -> &ModeMachine;
    fn position(&self) -> IVec2;
    /// Moves the base ghost directly, bypassing movement hooks.
    fn reposition(&mut self, position: IVec2);
    fn velocity(&self) -> IVec2;
    fn set_velocity(&mut self, velocity: IVec2);
    fn speed(&self) -> i32;
    fn size(&self) -> i32;
    fn hitbox(&self) -> Hitbox;
    fn on_the_grid(&self) -> bool;
    fn sprite(&self) -> GhostSprite;
    fn render(&self, canvas: &mut dyn Canvas);

    /// Per-tick hook run before movement: timers, mode triggers and direction choice.
    fn pre_update(&mut self, ctx: &mut TickContext<'_>);
    fn update_position(&mut self, velocity: IVec2);
    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()>;
    fn caught_by_player(&mut self) -> Option<Transition>;

    fn state(&self) -> GhostState {
        self.machine().state()
    }
}

/// A layer around another ghost entity. Every operation forwards to [`GhostDecorator::inner`] unless
/// overridden.
pub trait GhostDecorator {
    fn layer(&self) -> GhostLayer;
    fn inner(&self) -> &dyn GhostEntity;
    fn inner_mut(&mut self) -> &mut dyn GhostEntity;

    fn personality(&self) -> Personality {
        self.inner().personality()
    }

    fn machine(&self) -> &ModeMachine {
        self.inner().machine()
    }

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

    fn sprite(&self) -> GhostSprite {
        self.inner().sprite()
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        self.inner().render(canvas)
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

    fn caught_by_player(&mut self) -> Option<Transition> {
        self.inner_mut().caught_by_player()
    }
}

impl<T: GhostDecorator> GhostEntity for T {
    fn layer(&self) -> GhostLayer {
        GhostDecorator::layer(self)
    }

    fn decorated(&self) -> Option<&dyn GhostEntity> {
        Some(GhostDecorator::inner(self))
    }

    fn personality(&self) -> Personality {
        GhostDecorator::personality(self)
    }

    fn machine(&self) -> &ModeMachine {
        GhostDecorator::machine(self)
    }

    fn position(&self) -> IVec2 {
        GhostDecorator::position(self)
    }

    fn reposition(&mut self, position: IVec2) {
        GhostDecorator::reposition(self, position)
    }

    fn velocity(&self) -> IVec2 {
        GhostDecorator::velocity(self)
    }

    fn set_velocity(&mut self, velocity: IVec2) {
        GhostDecorator::set_velocity(self, velocity)
    }

    fn speed(&self) -> i32 {
        GhostDecorator::speed(self)
    }

    fn size(&self) -> i32 {
        GhostDecorator::size(self)
    }

    fn hitbox(&self) -> Hitbox {
        GhostDecorator::hitbox(self)
    }

    fn on_the_grid(&self) -> bool {
        GhostDecorator::on_the_grid(self)
    }

    fn sprite(&self) -> GhostSprite {
        GhostDecorator::sprite(self)
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        GhostDecorator::render(self, canvas)
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        GhostDecorator::pre_update(self, ctx)
    }

    fn update_position(&mut self, velocity: IVec2) {
        GhostDecorator::update_position(self, velocity)
    }

    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()> {
        GhostDecorator::power_item_eaten(self, item)
    }

    fn caught_by_player(&mut self) -> Option<Transition> {
        GhostDecorator::caught_by_player(self)
    }
}

/// Layer kinds from the outermost wrapper inwards.
pub fn chain_layers(ghost: &dyn GhostEntity) -> SmallVec<[GhostLayer; 5]> {
    let mut layers = SmallVec::new();
    let mut current = Some(ghost);
    while let Some(entity) = current {
        layers.push(entity.layer());
        current = entity.decorated();
    }
    layers
}

/// The base ghost at the bottom of a chain.
pub fn innermost(ghost: &dyn GhostEntity) -> &dyn GhostEntity {
    let mut current = ghost;
    while let Some(inner) = current.decorated() {
        current = inner;
    }
    current
}

/// Checks that layers appear in canonical order (SpeedBoost, Slow, Teleport, Invisible from the inside
/// out), each at most once, around exactly one base ghost.
pub fn validate_ghost_chain(ghost: &dyn GhostEntity) -> GameResult<()> {
    let layers = chain_layers(ghost);
    let (base, wrappers) = layers
        .split_last()
        .ok_or_else(|| GameError::InvalidComposition("empty ghost chain".into()))?;
    if *base != GhostLayer::Base || wrappers.contains(&GhostLayer::Base) {
        return Err(GameError::InvalidComposition(format!(
            "ghost chain must end in exactly one base ghost, found {layers:?}"
        )));
    }
    // Outermost first, so ranks must strictly decrease.
    if let Some(pair) = wrappers.windows(2).find(|pair| pair[0] <= pair[1]) {
        return Err(GameError::InvalidComposition(format!(
            "{} cannot wrap {}; ghost layers must be ordered SpeedBoost < Slow < Teleport < Invisible",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

/// The undecorated ghost. Owns the body and the mode machine.
#[derive(Debug, Clone)]
pub struct Ghost {
    personality: Personality,
    body: Body,
    machine: ModeMachine,
    den: Den,
}

impl Ghost {
    pub fn new(personality: Personality, position: IVec2, strategy: &LevelStrategy, bounds: IVec2) -> Self {
        Self {
            personality,
            body: Body::new(position, BASE_SPEED, bounds),
            machine: ModeMachine::new(strategy.frightened_duration(), strategy.warning_threshold()),
            den: Den::default(),
        }
    }

    pub fn with_den(mut self, den: Den) -> Self {
        self.den = den;
        self
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.body.speed = speed;
        self
    }

    pub fn den(&self) -> Den {
        self.den
    }

    /// Direct access to the mode machine, for driving a ghost into a given state.
    pub fn machine_mut(&mut self) -> &mut ModeMachine {
        &mut self.machine
    }

    fn fire(&mut self, trigger: ModeTrigger) {
        if let Some(transition) = self.machine.fire(trigger) {
            self.log_transition(transition);
        }
    }

    fn log_transition(&self, transition: Transition) {
        debug!(
            ghost = %self.personality,
            from = %transition.from,
            to = %transition.to,
            trigger = %transition.trigger,
            "Ghost mode transition"
        );
    }

    fn target(&self, ctx: &TickContext<'_>) -> IVec2 {
        let bounds = ctx.detector.bounds();
        match self.machine.state() {
            GhostState::House => self.den.exit,
            GhostState::Eaten => self.den.center,
            GhostState::Scatter | GhostState::Frightened => self.personality.scatter_target(bounds),
            GhostState::Chase => self.personality.chase_target(self.body.position, &ctx.targets, bounds),
        }
    }

    /// Picks the next heading. Only acts on grid cells.
    fn steer(&mut self, ctx: &mut TickContext<'_>) {
        if !self.body.on_the_grid() {
            return;
        }

        let state = self.machine.state();
        let solid = if self.machine.passes_house_door() {
            CollisionLayer::WALL
        } else {
            CollisionLayer::SOLID
        };
        let heading = Direction::from_velocity(self.body.velocity);
        let candidates = steering::candidate_directions(ctx.detector, self.body.hitbox(), heading, solid);

        let choice = match state {
            GhostState::Eaten => steering::path_step(ctx.detector, self.body.position, self.den.center, solid)
                .or_else(|| steering::closest_to(&candidates, self.body.position, self.den.center)),
            // Still inside the den: head for the exit whatever the mode.
            _ if !self.machine.is_released() => steering::closest_to(&candidates, self.body.position, self.den.exit),
            GhostState::Frightened => steering::random_choice(&candidates, &mut *ctx.rng),
            _ => steering::closest_to(&candidates, self.body.position, self.target(ctx)),
        };

        if let Some(direction) = choice {
            if heading != Some(direction) {
                trace!(ghost = %self.personality, state = %state, direction = %direction, "Ghost turned");
            }
            self.body.velocity = direction.as_ivec2() * self.body.speed;
        }
    }
}

impl GhostEntity for Ghost {
    fn layer(&self) -> GhostLayer {
        GhostLayer::Base
    }

    fn decorated(&self) -> Option<&dyn GhostEntity> {
        None
    }

    fn personality(&self) -> Personality {
        self.personality
    }

    fn machine(&self) -> &ModeMachine {
        &self.machine
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

    fn sprite(&self) -> GhostSprite {
        let heading = Direction::from_velocity(self.body.velocity);
        match self.machine.state() {
            GhostState::Frightened => GhostSprite::Frightened {
                frame: ((self.machine.frightened_timer() / ANIMATION_FRAME_TICKS) % 2) as u8,
                flash: self.machine.is_flashing(),
            },
            GhostState::Eaten => GhostSprite::Eyes { heading },
            _ => GhostSprite::Body {
                personality: self.personality,
                heading,
                frame: self.body.frame(),
            },
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw(self.sprite().into(), self.body.position);
    }

    fn pre_update(&mut self, ctx: &mut TickContext<'_>) {
        if !ctx.first_input {
            return;
        }

        for transition in self.machine.tick_timers() {
            self.log_transition(transition);
        }

        if self.body.position == self.den.exit {
            self.fire(ModeTrigger::ExitedHouseZone);
        }
        if self.body.position == self.den.center {
            self.fire(ModeTrigger::EnteredHouseZone);
        }

        self.steer(ctx);
    }

    fn update_position(&mut self, velocity: IVec2) {
        self.body.advance(velocity);
    }

    fn power_item_eaten(&mut self, item: PowerItem) -> GameResult<()> {
        if item.target() != ItemTarget::Ghosts {
            return Err(GameError::MisroutedPowerItem {
                item,
                recipient: Recipient::Ghost,
            });
        }

        if item == PowerItem::FrightenGhosts {
            match self.machine.frighten() {
                Some(transition) => self.log_transition(transition),
                None => trace!(ghost = %self.personality, "Frightened timer restarted"),
            }
        }
        Ok(())
    }

    fn caught_by_player(&mut self) -> Option<Transition> {
        let transition = self.machine.fire(ModeTrigger::CaughtByPlayer);
        if let Some(transition) = transition {
            self.log_transition(transition);
        }
        transition
    }
}
