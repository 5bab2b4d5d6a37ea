//! Collision queries against the board and the entities on it.
//!
//! Entities never query each other directly. Every hook receives a [`CollisionDetector`], which the
//! update loop backs with an [`ArenaSnapshot`] captured at the start of the tick.

use bitflags::bitflags;
use glam::IVec2;
use smallvec::SmallVec;

use crate::constants::CELL_SIZE;
use crate::item::{Item, ItemKind};

bitflags! {
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CollisionLayer: u8 {
        const WALL = 1 << 0;
        /// The den door. Blocks the player and roaming ghosts but not ghosts entering or leaving the house.
        const HOUSE_DOOR = 1 << 1;
        const PELLET = 1 << 2;
        const POWER_ITEM = 1 << 3;
        const GHOST = 1 << 4;
        const PLAYER = 1 << 5;

        const SOLID = Self::WALL.bits() | Self::HOUSE_DOOR.bits();
    }
}

/// Axis-aligned pixel rectangle. A rectangle with zero area never intersects anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hitbox {
    pub min: IVec2,
    pub size: IVec2,
}

impl Hitbox {
    pub const EMPTY: Hitbox = Hitbox {
        min: IVec2::ZERO,
        size: IVec2::ZERO,
    };

    pub fn new(min: IVec2, size: IVec2) -> Self {
        Self { min, size }
    }

    /// The hitbox covering exactly one cell.
    pub fn cell(cell: IVec2) -> Self {
        Self::new(cell * CELL_SIZE, IVec2::splat(CELL_SIZE))
    }

    pub fn max(&self) -> IVec2 {
        self.min + self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    pub fn translated(&self, offset: IVec2) -> Self {
        Self::new(self.min + offset, self.size)
    }

    pub fn intersects(&self, other: &Hitbox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// What a collision query hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Wall(IVec2),
    HouseDoor(IVec2),
    /// Index into the level's item list.
    Item(usize),
    /// Index into the level's ghost list, in update order.
    Ghost(usize),
    Player,
}

/// Answers "does this box touch anything in these layers".
pub trait CollisionDetector {
    fn check_collision(&self, hitbox: Hitbox, layers: CollisionLayer) -> Option<EntityRef>;

    /// Board size in pixels.
    fn bounds(&self) -> IVec2;

    /// Whether a box would overlap any solid cell in `layers`.
    fn is_blocked(&self, hitbox: Hitbox, layers: CollisionLayer) -> bool {
        self.check_collision(hitbox, layers & CollisionLayer::SOLID).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    #[default]
    Open,
    Wall,
    HouseDoor,
}

/// The static layout of a board, one entry per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallGrid {
    size: IVec2,
    cells: Vec<CellKind>,
}

impl WallGrid {
    /// An open board of `width` x `height` cells.
    pub fn new(width: i32, height: i32) -> Self {
        let size = IVec2::new(width.max(0), height.max(0));
        Self {
            size,
            cells: vec![CellKind::Open; (size.x * size.y) as usize],
        }
    }

    pub fn cell_size(&self) -> IVec2 {
        self.size
    }

    pub fn pixel_size(&self) -> IVec2 {
        self.size * CELL_SIZE
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        let inside = cell.x >= 0 && cell.y >= 0 && cell.x < self.size.x && cell.y < self.size.y;
        inside.then(|| (cell.y * self.size.x + cell.x) as usize)
    }

    /// Sets a cell; writes outside the board are ignored.
    pub fn set(&mut self, cell: IVec2, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = kind;
        }
    }

    /// Cells outside the board are open so tunnels can wrap.
    pub fn kind(&self, cell: IVec2) -> CellKind {
        self.index(cell).map(|i| self.cells[i]).unwrap_or_default()
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        self.index(cell).is_some()
    }

    /// Finds the first solid cell overlapped by `hitbox` whose kind is selected by `layers`.
    pub fn collide(&self, hitbox: Hitbox, layers: CollisionLayer) -> Option<EntityRef> {
        if hitbox.is_empty() || !layers.intersects(CollisionLayer::SOLID) {
            return None;
        }
        let first = hitbox.min.div_euclid(IVec2::splat(CELL_SIZE));
        let last = (hitbox.max() - IVec2::ONE).div_euclid(IVec2::splat(CELL_SIZE));
        for y in first.y..=last.y {
            for x in first.x..=last.x {
                let cell = IVec2::new(x, y);
                match self.kind(cell) {
                    CellKind::Wall if layers.contains(CollisionLayer::WALL) => return Some(EntityRef::Wall(cell)),
                    CellKind::HouseDoor if layers.contains(CollisionLayer::HOUSE_DOOR) => {
                        return Some(EntityRef::HouseDoor(cell))
                    }
                    _ => {}
                }
            }
        }
        None
    }
}

/// Entity positions frozen at the start of a tick.
///
/// Decorators and steering read this instead of live entities, so update order within a tick never
/// changes what an entity observes about the others.
#[derive(Debug, Clone)]
pub struct ArenaSnapshot<'a> {
    walls: &'a WallGrid,
    items: Vec<(usize, Hitbox, ItemKind)>,
    ghosts: SmallVec<[(usize, Hitbox); 4]>,
    player: Option<Hitbox>,
}

impl<'a> ArenaSnapshot<'a> {
    pub fn walls_only(walls: &'a WallGrid) -> Self {
        Self {
            walls,
            items: Vec::new(),
            ghosts: SmallVec::new(),
            player: None,
        }
    }

    /// Records every item that has not been collected yet.
    pub fn with_items(mut self, items: &[Item]) -> Self {
        self.items = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.collected)
            .map(|(index, item)| (index, item.hitbox(), item.kind))
            .collect();
        self
    }

    pub fn with_ghosts(mut self, hitboxes: impl IntoIterator<Item = Hitbox>) -> Self {
        self.ghosts = hitboxes.into_iter().enumerate().collect();
        self
    }

    pub fn with_player(mut self, hitbox: Hitbox) -> Self {
        self.player = Some(hitbox);
        self
    }
}

impl CollisionDetector for ArenaSnapshot<'_> {
    fn check_collision(&self, hitbox: Hitbox, layers: CollisionLayer) -> Option<EntityRef> {
        if let Some(hit) = self.walls.collide(hitbox, layers) {
            return Some(hit);
        }

        let item_hit = self.items.iter().find(|(_, item_box, kind)| {
            let wanted = match kind {
                ItemKind::Pellet => CollisionLayer::PELLET,
                ItemKind::Power(_) => CollisionLayer::POWER_ITEM,
            };
            layers.contains(wanted) && hitbox.intersects(item_box)
        });
        if let Some((index, _, _)) = item_hit {
            return Some(EntityRef::Item(*index));
        }

        if layers.contains(CollisionLayer::GHOST) {
            if let Some((index, _)) = self.ghosts.iter().find(|(_, ghost)| hitbox.intersects(ghost)) {
                return Some(EntityRef::Ghost(*index));
            }
        }

        match self.player {
            Some(player) if layers.contains(CollisionLayer::PLAYER) && hitbox.intersects(&player) => Some(EntityRef::Player),
            _ => None,
        }
    }

    fn bounds(&self) -> IVec2 {
        self.walls.pixel_size()
    }
}

/// Everything the player touched this tick, at most one of each kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Contacts {
    pub pellet: Option<usize>,
    pub power_item: Option<usize>,
    pub ghost: Option<usize>,
}

impl Contacts {
    pub fn query(detector: &dyn CollisionDetector, hitbox: Hitbox) -> Self {
        let item = |layer| match detector.check_collision(hitbox, layer) {
            Some(EntityRef::Item(index)) => Some(index),
            _ => None,
        };
        let ghost = match detector.check_collision(hitbox, CollisionLayer::GHOST) {
            Some(EntityRef::Ghost(index)) => Some(index),
            _ => None,
        };
        Self {
            pellet: item(CollisionLayer::PELLET),
            power_item: item(CollisionLayer::POWER_ITEM),
            ghost,
        }
    }
}
