//! Pac-Man entity behavior core: ghost mode machine, decorator chains and per-level difficulty.

pub mod collision;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod ghost;
pub mod item;
pub mod level;
pub mod logging;
pub mod player;
pub mod ranking;
