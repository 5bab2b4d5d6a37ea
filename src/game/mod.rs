//! The fixed-timestep update loop.

use glam::IVec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use strum_macros::Display;
use tracing::{debug, info, info_span, warn};

use crate::collision::{ArenaSnapshot, WallGrid};
use crate::config::Config;
use crate::constants::{ghost::DEFAULT_SLOW_RATIO, player::DEFAULT_FAST_RATIO, POWER_ITEM_BLINK_TICKS};
use crate::entity::{Canvas, Direction, Sprite, TickContext};
use crate::error::GameResult;
use crate::events::{EventBus, GameEvent, GameObserver};
use crate::ghost::decorators::decorate_for_level;
use crate::ghost::state::GhostState;
use crate::ghost::steering::TargetView;
use crate::ghost::{Ghost, GhostEntity, Personality};
use crate::item::{Item, ItemKind, ItemTarget};
use crate::level::LevelStrategy;
use crate::player::{decorate_player, Pacman, PlayerEntity};

mod placement;

pub use placement::Placement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GameStage {
    Playing,
    GameOver,
    LevelCleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    /// Seed for the simulation RNG; drawn from the OS when unset.
    pub seed: Option<u64>,
    pub slow_ratio: u32,
    pub fast_ratio: i32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            seed: None,
            slow_ratio: DEFAULT_SLOW_RATIO,
            fast_ratio: DEFAULT_FAST_RATIO,
        }
    }
}

impl From<&Config> for GameOptions {
    fn from(config: &Config) -> Self {
        Self {
            seed: config.seed,
            slow_ratio: config.slow_ratio,
            fast_ratio: config.fast_ratio,
        }
    }
}

/// One level in progress: the entity chains, the board and the event channel.
pub struct Game {
    strategy: LevelStrategy,
    stage: GameStage,
    tick: u64,
    first_input: bool,
    rng: SmallRng,
    walls: WallGrid,
    player: Box<dyn PlayerEntity>,
    ghosts: SmallVec<[Box<dyn GhostEntity>; 4]>,
    items: Vec<Item>,
    remaining: usize,
    events: EventBus,
}

impl Game {
    pub fn new(placement: Placement, options: GameOptions) -> GameResult<Self> {
        placement.validate()?;

        let strategy = LevelStrategy::for_level(placement.level);
        let mut rng = options.seed.map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        let bounds = placement.walls.pixel_size();

        let player = decorate_player(Pacman::new(placement.player, bounds), options.fast_ratio)?;
        let ghosts = placement
            .ghosts
            .iter()
            .map(|(personality, position)| {
                let ghost = Ghost::new(*personality, *position, &strategy, bounds).with_den(placement.den);
                decorate_for_level(ghost, &strategy, options.slow_ratio, &mut rng)
            })
            .collect::<GameResult<SmallVec<[_; 4]>>>()?;

        let items: Vec<Item> = placement
            .pellets
            .iter()
            .map(|position| Item::new(ItemKind::Pellet, *position))
            .chain(
                placement
                    .power_items
                    .iter()
                    .map(|(item, position)| Item::new(ItemKind::Power(*item), *position)),
            )
            .collect();

        info!(
            level = strategy.level(),
            name = strategy.name(),
            ghosts = ghosts.len(),
            items = items.len(),
            "Level loaded"
        );

        Ok(Self {
            strategy,
            stage: GameStage::Playing,
            tick: 0,
            first_input: false,
            rng,
            walls: placement.walls,
            player,
            ghosts,
            remaining: items.len(),
            items,
            events: EventBus::default(),
        })
    }

    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) {
        self.events.subscribe(Box::new(observer));
    }

    /// Forwards a direction to the player. The first call starts the simulation.
    pub fn steer(&mut self, direction: Direction) {
        self.player.steer(direction);
        if !self.first_input {
            self.first_input = true;
            info!(tick = self.tick, "First input received");
        }
    }

    /// Advances the level by one tick.
    ///
    /// A misrouted power item is a wiring bug and aborts the tick with an error.
    pub fn tick(&mut self) -> GameResult<GameStage> {
        if self.stage != GameStage::Playing {
            return Ok(self.stage);
        }
        self.tick += 1;
        let _span = info_span!("tick", tick = self.tick).entered();

        let first_input = self.first_input;
        let snapshot = ArenaSnapshot::walls_only(&self.walls)
            .with_items(&self.items)
            .with_ghosts(self.ghosts.iter().map(|ghost| ghost.hitbox()))
            .with_player(self.player.hitbox());
        let targets = TargetView {
            player: self.player.position(),
            player_heading: self.player.heading(),
            blinky: self
                .ghosts
                .iter()
                .find(|ghost| ghost.personality() == Personality::Blinky)
                .map(|ghost| ghost.position()),
        };
        let mut ctx = TickContext {
            tick: self.tick,
            first_input,
            detector: &snapshot,
            targets,
            rng: &mut self.rng,
        };

        self.player.pre_update(&mut ctx);
        if first_input {
            let velocity = self.player.velocity();
            self.player.update_position(velocity);
        }

        let contacts = self.player.contacts(&snapshot);
        if let Some(index) = contacts.pellet {
            let item = &mut self.items[index];
            item.collected = true;
            self.remaining -= 1;
            self.events.notify(GameEvent::PelletEaten { position: item.position });
        }

        if let Some(index) = contacts.power_item {
            let item = &mut self.items[index];
            item.collected = true;
            self.remaining -= 1;
            if let ItemKind::Power(kind) = item.kind {
                debug!(item = %kind, position = ?item.position, "Power item eaten");
                self.events.notify(GameEvent::PowerItemEaten {
                    item: kind,
                    position: item.position,
                });
                match kind.target() {
                    ItemTarget::Ghosts => {
                        for ghost in self.ghosts.iter_mut() {
                            ghost.power_item_eaten(kind)?;
                        }
                    }
                    ItemTarget::Player => self.player.power_item_eaten(kind)?,
                }
            }
        }

        if let Some(index) = contacts.ghost {
            let ghost = &mut self.ghosts[index];
            let personality = ghost.personality();
            match ghost.state() {
                GhostState::Frightened => match ghost.caught_by_player() {
                    Some(_) => self.events.notify(GameEvent::GhostEaten { ghost: personality }),
                    None => warn!(ghost = %personality, "Frightened ghost could not be eaten"),
                },
                GhostState::Eaten => {}
                GhostState::House | GhostState::Scatter | GhostState::Chase => {
                    info!(ghost = %personality, "Player caught");
                    self.events.notify(GameEvent::GameOver { ghost: personality });
                    self.stage = GameStage::GameOver;
                    return Ok(self.stage);
                }
            }
        }

        for ghost in self.ghosts.iter_mut() {
            ghost.pre_update(&mut ctx);
            if first_input {
                let velocity = ghost.velocity();
                ghost.update_position(velocity);
            }
        }

        if self.remaining == 0 {
            info!("Level cleared");
            self.events.notify(GameEvent::LevelCleared);
            self.stage = GameStage::LevelCleared;
        }

        Ok(self.stage)
    }

    /// Draws items, then the player, then ghosts in update order.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        let power_visible = self.tick % POWER_ITEM_BLINK_TICKS < POWER_ITEM_BLINK_TICKS / 2;
        for item in self.items.iter().filter(|item| !item.collected) {
            match item.kind {
                ItemKind::Pellet => canvas.draw(Sprite::Pellet, item.position),
                ItemKind::Power(kind) if power_visible => canvas.draw(Sprite::PowerItem(kind), item.position),
                ItemKind::Power(_) => {}
            }
        }
        self.player.render(canvas);
        for ghost in &self.ghosts {
            ghost.render(canvas);
        }
    }

    pub fn stage(&self) -> GameStage {
        self.stage
    }

    pub fn strategy(&self) -> &LevelStrategy {
        &self.strategy
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn has_started(&self) -> bool {
        self.first_input
    }

    pub fn player(&self) -> &dyn PlayerEntity {
        self.player.as_ref()
    }

    pub fn ghosts(&self) -> &[Box<dyn GhostEntity>] {
        &self.ghosts
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn remaining_items(&self) -> usize {
        self.remaining
    }

    pub fn player_position(&self) -> IVec2 {
        self.player.position()
    }
}
