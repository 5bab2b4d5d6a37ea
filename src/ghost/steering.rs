//! Target selection and direction choice for ghosts.
//!
//! Direction changes only happen on grid cells. A ghost never reverses unless the way forward is
//! closed, and picks the open direction whose next cell is closest to its target.

use glam::IVec2;
use pathfinding::prelude::bfs;
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;

use crate::collision::{CollisionDetector, CollisionLayer, Hitbox};
use crate::constants::CELL_SIZE;
use crate::entity::{Direction, DIRECTIONS};
use crate::ghost::Personality;

/// Read-only facts about other entities, taken from the start-of-tick snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetView {
    pub player: IVec2,
    pub player_heading: Option<Direction>,
    /// Blinky's position; Inky's chase target pivots around it.
    pub blinky: Option<IVec2>,
}

/// Clyde gives up the chase when closer than this to the player.
const CLYDE_SHY_DISTANCE: i32 = 8 * CELL_SIZE;

impl Personality {
    /// Each ghost retreats towards its own corner, just outside the board.
    pub fn scatter_target(self, bounds: IVec2) -> IVec2 {
        let cells = bounds / CELL_SIZE;
        let corner = match self {
            Personality::Blinky => IVec2::new(cells.x - 3, -3),
            Personality::Pinky => IVec2::new(2, -3),
            Personality::Inky => IVec2::new(cells.x - 1, cells.y + 1),
            Personality::Clyde => IVec2::new(0, cells.y + 1),
        };
        corner * CELL_SIZE
    }

    pub fn chase_target(self, position: IVec2, view: &TargetView, bounds: IVec2) -> IVec2 {
        let ahead = |cells: i32| view.player + view.player_heading.map_or(IVec2::ZERO, |d| d.as_ivec2() * cells * CELL_SIZE);
        match self {
            Personality::Blinky => view.player,
            Personality::Pinky => ahead(4),
            Personality::Inky => {
                let pivot = ahead(2);
                pivot * 2 - view.blinky.unwrap_or(view.player)
            }
            Personality::Clyde => {
                if (position - view.player).length_squared() > CLYDE_SHY_DISTANCE * CLYDE_SHY_DISTANCE {
                    view.player
                } else {
                    self.scatter_target(bounds)
                }
            }
        }
    }
}

/// Open directions from `hitbox`, excluding a reversal of `heading` unless nothing else is open.
pub fn candidate_directions(
    detector: &dyn CollisionDetector,
    hitbox: Hitbox,
    heading: Option<Direction>,
    solid: CollisionLayer,
) -> SmallVec<[Direction; 4]> {
    let open: SmallVec<[Direction; 4]> = DIRECTIONS
        .into_iter()
        .filter(|dir| !detector.is_blocked(hitbox.translated(dir.as_ivec2()), solid))
        .collect();
    let forward: SmallVec<[Direction; 4]> = open
        .iter()
        .copied()
        .filter(|dir| heading.is_none_or(|h| *dir != h.opposite()))
        .collect();

    if forward.is_empty() {
        open
    } else {
        forward
    }
}

/// The candidate whose neighbouring cell is closest to `target`. Ties keep [`DIRECTIONS`] order.
pub fn closest_to(candidates: &[Direction], position: IVec2, target: IVec2) -> Option<Direction> {
    candidates
        .iter()
        .copied()
        .min_by_key(|dir| (position + dir.as_ivec2() * CELL_SIZE - target).length_squared())
}

pub fn random_choice<R: Rng + ?Sized>(candidates: &[Direction], rng: &mut R) -> Option<Direction> {
    candidates.choose(rng).copied()
}

/// First step of the shortest cell path from `from` to `goal`, or `None` when already there or unreachable.
pub fn path_step(detector: &dyn CollisionDetector, from: IVec2, goal: IVec2, solid: CollisionLayer) -> Option<Direction> {
    let start = from.div_euclid(IVec2::splat(CELL_SIZE));
    let goal = goal.div_euclid(IVec2::splat(CELL_SIZE));
    let cells = detector.bounds() / CELL_SIZE;
    let inside = |cell: IVec2| cell.x >= 0 && cell.y >= 0 && cell.x < cells.x && cell.y < cells.y;

    let path = bfs(
        &start,
        |cell| {
            DIRECTIONS
                .into_iter()
                .map(|dir| *cell + dir.as_ivec2())
                .filter(|next| inside(*next) && !detector.is_blocked(Hitbox::cell(*next), solid))
                .collect::<SmallVec<[IVec2; 4]>>()
        },
        |cell| *cell == goal,
    )?;

    let next = *path.get(1)?;
    DIRECTIONS.into_iter().find(|dir| start + dir.as_ivec2() == next)
}
