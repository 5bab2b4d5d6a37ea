//! Per-level difficulty parameters.
//!
//! A [`LevelStrategy`] is a plain value. Interval getters draw a fresh sample from the caller's RNG on
//! every call, so decorators re-sample after each activation instead of repeating one period.

use std::ops::RangeInclusive;

use rand::Rng;
use tracing::warn;

use crate::constants::ghost::FRIGHTENED_BASE_TICKS;

/// Fraction of the frightened duration after which the warning flash starts, as tenths.
const WARNING_TENTHS: u32 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct LevelStrategy {
    level: u32,
    name: &'static str,
    teleport_interval: Option<RangeInclusive<u32>>,
    invisible_interval: Option<RangeInclusive<u32>>,
    invisible_duration: u32,
    speed_increase_rate: f64,
    frightened_timer_reduction: f64,
}

impl LevelStrategy {
    /// Parameters for level `level`; unknown levels fall back to level 1.
    pub fn for_level(level: u32) -> Self {
        match level {
            1 => Self::basic(),
            2 => Self {
                level: 2,
                name: "Level 2: Teleport Mode (Speed +10%, Frightened Time -20%)",
                teleport_interval: Some(60..=300),
                speed_increase_rate: 0.1,
                frightened_timer_reduction: 0.2,
                ..Self::basic()
            },
            3 => Self {
                level: 3,
                name: "Level 3: Teleport + Invisible Mode (Speed +20%, Frightened Time -40%)",
                teleport_interval: Some(60..=300),
                invisible_interval: Some(120..=480),
                invisible_duration: 60,
                speed_increase_rate: 0.2,
                frightened_timer_reduction: 0.4,
            },
            unknown => {
                warn!(level = unknown, "Unknown level, falling back to level 1 parameters");
                Self::basic()
            }
        }
    }

    fn basic() -> Self {
        Self {
            level: 1,
            name: "Level 1: Basic Mode (Speed +0%, Frightened Time -0%)",
            teleport_interval: None,
            invisible_interval: None,
            invisible_duration: 0,
            speed_increase_rate: 0.0,
            frightened_timer_reduction: 0.0,
        }
    }

    /// Pins the teleport interval range, e.g. `60..=60` for an exact period.
    pub fn with_teleport_interval(mut self, range: RangeInclusive<u32>) -> Self {
        self.teleport_interval = Some(range);
        self
    }

    pub fn with_invisible_interval(mut self, range: RangeInclusive<u32>, duration: u32) -> Self {
        self.invisible_interval = Some(range);
        self.invisible_duration = duration;
        self
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ticks until the next teleport attempt; 0 means teleporting is disabled.
    pub fn teleport_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        sample(&self.teleport_interval, rng)
    }

    /// Ticks until the next invisibility window; 0 means invisibility is disabled.
    pub fn invisible_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        sample(&self.invisible_interval, rng)
    }

    pub fn invisible_duration(&self) -> u32 {
        self.invisible_duration
    }

    pub fn teleport_enabled(&self) -> bool {
        self.teleport_interval.as_ref().is_some_and(|r| !r.is_empty() && *r.end() > 0)
    }

    pub fn invisibility_enabled(&self) -> bool {
        self.invisible_interval.as_ref().is_some_and(|r| !r.is_empty() && *r.end() > 0) && self.invisible_duration > 0
    }

    pub fn speed_increase_rate(&self) -> f64 {
        self.speed_increase_rate
    }

    pub fn frightened_timer_reduction(&self) -> f64 {
        self.frightened_timer_reduction
    }

    /// Ghost speed after the level's increase, rounded half away from zero.
    pub fn boosted_speed(&self, base: i32) -> i32 {
        (f64::from(base) * (1.0 + self.speed_increase_rate)).round() as i32
    }

    pub fn frightened_duration(&self) -> u32 {
        (f64::from(FRIGHTENED_BASE_TICKS) * (1.0 - self.frightened_timer_reduction)).round() as u32
    }

    /// Frightened tick after which the sprite starts flashing.
    pub fn warning_threshold(&self) -> u32 {
        self.frightened_duration() * WARNING_TENTHS / 10
    }
}

impl Default for LevelStrategy {
    fn default() -> Self {
        Self::basic()
    }
}

fn sample<R: Rng + ?Sized>(range: &Option<RangeInclusive<u32>>, rng: &mut R) -> u32 {
    match range {
        Some(range) if !range.is_empty() => rng.random_range(range.clone()),
        _ => 0,
    }
}
