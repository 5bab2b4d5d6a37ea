use std::path::PathBuf;

use figment::Jail;
use pacgum::config::{load_config, Config};
use pacgum::constants::player::MAX_FAST_RATIO;
use pacgum::game::GameOptions;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

#[test]
fn test_defaults_without_environment() {
    Jail::expect_with(|_jail| {
        let config = load_config()?;
        assert_eq!(config, Config::default());
        assert_that(&config.slow_ratio).is_equal_to(2);
        assert_that(&config.fast_ratio).is_equal_to(3);
        Ok(())
    });
}

#[test]
fn test_environment_overrides() {
    Jail::expect_with(|jail| {
        jail.set_env("PACGUM_LEVEL", "3");
        jail.set_env("PACGUM_SEED", "42");
        jail.set_env("PACGUM_FAST_RATIO", "2");
        jail.set_env("PACGUM_NICKNAME", "clyde");
        jail.set_env("PACGUM_SCORE_LOG", "scores.csv");

        let config = load_config()?;
        assert_that(&config.level).is_equal_to(3);
        assert_that(&config.seed).is_equal_to(Some(42));
        assert_that(&config.nickname).is_equal_to("clyde".to_string());
        assert_that(&config.score_log).is_equal_to(PathBuf::from("scores.csv"));

        let options = GameOptions::from(&config);
        assert_that(&options.fast_ratio).is_equal_to(2);
        assert_that(&options.seed).is_equal_to(Some(42));
        Ok(())
    });
}

#[test]
fn test_zero_ratio_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("PACGUM_SLOW_RATIO", "0");
        let error = load_config().expect_err("slow ratio of zero must fail");
        assert_that(&error.to_string()).contains("slow_ratio");
        Ok(())
    });
}

#[test]
fn test_fast_ratio_that_skips_cells_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("PACGUM_FAST_RATIO", (MAX_FAST_RATIO + 1).to_string());
        let error = load_config().expect_err("fast ratio past one cell must fail");
        assert_that(&error.to_string()).contains("fast_ratio");

        jail.set_env("PACGUM_FAST_RATIO", MAX_FAST_RATIO.to_string());
        assert_that(&load_config().map(|config| config.fast_ratio)).is_ok_containing(MAX_FAST_RATIO);
        Ok(())
    });
}

#[test]
fn test_blank_nickname_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("PACGUM_NICKNAME", "   ");
        assert_that(&load_config().is_err()).is_true();
        Ok(())
    });
}
