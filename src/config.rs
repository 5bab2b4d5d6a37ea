use std::path::PathBuf;

use figment::{providers::Env, Figment};
use serde::Deserialize;

use crate::constants::ghost::DEFAULT_SLOW_RATIO;
use crate::constants::player::{DEFAULT_FAST_RATIO, MAX_FAST_RATIO};
use crate::error::ConfigError;

/// Runner configuration, read from `PACGUM_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct Config {
    /// Difficulty level; unknown levels play as level 1.
    pub level: u32,
    /// RNG seed; a fresh one is drawn from the OS when unset.
    pub seed: Option<u64>,
    pub slow_ratio: u32,
    pub fast_ratio: i32,
    /// Hard stop for headless runs.
    pub max_ticks: u64,
    /// Pace ticks at 60 Hz instead of running flat out.
    pub realtime: bool,
    pub nickname: String,
    pub map_name: String,
    pub score_log: PathBuf,
}

/// Raw configuration loaded directly from environment variables, validated into [`Config`].
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_level")]
    level: u32,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_slow_ratio")]
    slow_ratio: i64,
    #[serde(default = "default_fast_ratio")]
    fast_ratio: i64,
    #[serde(default = "default_max_ticks")]
    max_ticks: u64,
    #[serde(default)]
    realtime: bool,
    #[serde(default = "default_nickname")]
    nickname: String,
    #[serde(default = "default_map_name")]
    map_name: String,
    #[serde(default = "default_score_log")]
    score_log: PathBuf,
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let slow_ratio = ratio("slow_ratio", raw.slow_ratio)?;
        let fast_ratio = ratio("fast_ratio", raw.fast_ratio)?;
        if fast_ratio > i64::from(MAX_FAST_RATIO) {
            return Err(ConfigError::RatioTooLarge {
                name: "fast_ratio",
                value: fast_ratio,
                max: i64::from(MAX_FAST_RATIO),
            });
        }
        if raw.nickname.trim().is_empty() {
            return Err(ConfigError::Empty("nickname"));
        }

        Ok(Config {
            level: raw.level,
            seed: raw.seed,
            slow_ratio: slow_ratio as u32,
            fast_ratio: fast_ratio as i32,
            max_ticks: raw.max_ticks,
            realtime: raw.realtime,
            nickname: raw.nickname,
            map_name: raw.map_name,
            score_log: raw.score_log,
        })
    }
}

fn ratio(name: &'static str, value: i64) -> Result<i64, ConfigError> {
    if (1..=i64::from(i32::MAX)).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidRatio { name, value })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: default_level(),
            seed: None,
            slow_ratio: DEFAULT_SLOW_RATIO,
            fast_ratio: DEFAULT_FAST_RATIO,
            max_ticks: default_max_ticks(),
            realtime: false,
            nickname: default_nickname(),
            map_name: default_map_name(),
            score_log: default_score_log(),
        }
    }
}

fn default_level() -> u32 {
    1
}

fn default_slow_ratio() -> i64 {
    i64::from(DEFAULT_SLOW_RATIO)
}

fn default_fast_ratio() -> i64 {
    i64::from(DEFAULT_FAST_RATIO)
}

fn default_max_ticks() -> u64 {
    60 * 60 * 3
}

fn default_nickname() -> String {
    "player".to_string()
}

fn default_map_name() -> String {
    "demo".to_string()
}

fn default_score_log() -> PathBuf {
    PathBuf::from("ranking.csv")
}

pub fn load_config() -> Result<Config, figment::Error> {
    Figment::new().merge(Env::prefixed("PACGUM_")).extract()
}
