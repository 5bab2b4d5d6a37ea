#![allow(dead_code)]

use glam::IVec2;
use pacgum::collision::{ArenaSnapshot, CellKind, WallGrid};
use pacgum::constants::CELL_SIZE;
use pacgum::entity::TickContext;
use pacgum::game::{Game, GameOptions, Placement};
use pacgum::ghost::{GhostEntity, Personality};
use pacgum::item::PowerItem;
use pacgum::player::PlayerEntity;
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub const SEED: u64 = 0x5eed;

/// Pixel position of a cell.
pub fn cell(x: i32, y: i32) -> IVec2 {
    IVec2::new(x, y) * CELL_SIZE
}

pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64(SEED)
}

/// `#` is a wall, `-` a den door, anything else is open.
pub fn walls(rows: &[&str]) -> WallGrid {
    let mut grid = WallGrid::new(rows[0].len() as i32, rows.len() as i32);
    for (y, row) in rows.iter().enumerate() {
        for (x, symbol) in row.chars().enumerate() {
            let kind = match symbol {
                '#' => CellKind::Wall,
                '-' => CellKind::HouseDoor,
                _ => continue,
            };
            grid.set(IVec2::new(x as i32, y as i32), kind);
        }
    }
    grid
}

/// A level from an ASCII board.
///
/// `P` is the player, `B`/`K`/`I`/`C` are Blinky, Pinky, Inky and Clyde, `.` is a pellet and `f`/`s`/`h`/`m`
/// are the FrightenGhosts, SlowGhosts, Shield and FastMove power items.
pub fn placement(level: u32, rows: &[&str]) -> Placement {
    let mut player = IVec2::ZERO;
    let mut ghosts = Vec::new();
    let mut pellets = Vec::new();
    let mut power_items = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        for (x, symbol) in row.chars().enumerate() {
            let position = cell(x as i32, y as i32);
            match symbol {
                'P' => player = position,
                'B' => ghosts.push((Personality::Blinky, position)),
                'K' => ghosts.push((Personality::Pinky, position)),
                'I' => ghosts.push((Personality::Inky, position)),
                'C' => ghosts.push((Personality::Clyde, position)),
                '.' => pellets.push(position),
                'f' => power_items.push((PowerItem::FrightenGhosts, position)),
                's' => power_items.push((PowerItem::SlowGhosts, position)),
                'h' => power_items.push((PowerItem::Shield, position)),
                'm' => power_items.push((PowerItem::FastMove, position)),
                _ => {}
            }
        }
    }

    let mut placement = Placement::new(level, walls(rows), player);
    placement.ghosts = ghosts;
    placement.pellets = pellets;
    placement.power_items = power_items;
    placement
}

pub fn game(level: u32, rows: &[&str]) -> Game {
    let options = GameOptions {
        seed: Some(SEED),
        ..GameOptions::default()
    };
    Game::new(placement(level, rows), options).unwrap()
}

/// Runs `ticks` ticks of pre-update and movement for a lone ghost on `grid`, after the first input.
pub fn run_ghost(ghost: &mut dyn GhostEntity, grid: &WallGrid, rng: &mut SmallRng, ticks: u32) {
    for _ in 0..ticks {
        let snapshot = ArenaSnapshot::walls_only(grid);
        let mut ctx = TickContext::new(&snapshot, rng).with_input();
        ghost.pre_update(&mut ctx);
        let velocity = ghost.velocity();
        ghost.update_position(velocity);
    }
}

/// Same as [`run_ghost`] for the player chain.
pub fn run_player(player: &mut dyn PlayerEntity, grid: &WallGrid, rng: &mut SmallRng, ticks: u32) {
    for _ in 0..ticks {
        let snapshot = ArenaSnapshot::walls_only(grid);
        let mut ctx = TickContext::new(&snapshot, rng).with_input();
        player.pre_update(&mut ctx);
        let velocity = player.velocity();
        player.update_position(velocity);
    }
}
