//! This module contains all the constants used by the simulation.

use std::time::Duration;

use glam::IVec2;

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: u32 = 60;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / TICKS_PER_SECOND as f64) as u64);

/// The size of each cell, in pixels.
pub const CELL_SIZE: i32 = 8;

/// Side length of player and ghost hitboxes, in pixels.
pub const ENTITY_SIZE: i32 = CELL_SIZE;

/// Side length of a pellet hitbox, centered in its cell.
pub const PELLET_SIZE: i32 = 4;

/// Pixels moved per tick by an undecorated entity.
pub const BASE_SPEED: i32 = 2;

/// The cell just outside the ghost den; reaching it exactly releases a ghost from the house.
pub const HOUSE_EXIT: IVec2 = IVec2::new(208, 168);
/// The center of the ghost den; eaten ghosts reaching it exactly re-enter the house.
pub const HOUSE_CENTER: IVec2 = IVec2::new(208, 200);

pub mod ghost {
    /// Ticks spent in Scatter before switching to Chase.
    pub const SCATTER_TICKS: u32 = 300;
    /// Ticks spent in Chase before switching to Scatter.
    pub const CHASE_TICKS: u32 = 1200;
    /// Frightened duration before any level reduction.
    pub const FRIGHTENED_BASE_TICKS: u32 = 420;
    /// Full cycle of the frightened sprite alternation.
    pub const FEAR_CYCLE_TICKS: u32 = 20;
    /// Ticks per animation frame (two frames per fear cycle).
    pub const ANIMATION_FRAME_TICKS: u32 = 10;

    pub const SLOW_TICKS: u32 = 420;
    pub const DEFAULT_SLOW_RATIO: u32 = 2;

    /// Distance of a teleport jump, in cells.
    pub const TELEPORT_CELLS: i32 = 6;
    /// Upper bound (exclusive) of the random initial teleport timer, so ghosts don't jump in unison.
    pub const TELEPORT_STAGGER_TICKS: u32 = 120;
}

pub mod player {
    pub const SHIELD_TICKS: u32 = 300;
    pub const FAST_MOVE_TICKS: u32 = 300;
    pub const DEFAULT_FAST_RATIO: i32 = 3;
    /// Largest fast-move ratio whose step still stays within one cell, so wall checks cannot be skipped.
    pub const MAX_FAST_RATIO: i32 = (super::CELL_SIZE - 1) / super::BASE_SPEED;
}

pub mod score {
    pub const PELLET: u32 = 10;
    pub const POWER_ITEM: u32 = 100;
    pub const GHOST: u32 = 500;
}

/// Power items are drawn during the first half of each cycle.
pub const POWER_ITEM_BLINK_TICKS: u64 = 60;
