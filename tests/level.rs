use pacgum::level::LevelStrategy;
use speculoos::prelude::*;

mod common;

#[test]
fn test_level_parameters() {
    let basic = LevelStrategy::for_level(1);
    assert_that(&basic.teleport_enabled()).is_false();
    assert_that(&basic.invisibility_enabled()).is_false();
    assert_that(&basic.speed_increase_rate()).is_equal_to(0.0);

    let teleport = LevelStrategy::for_level(2);
    assert_that(&teleport.teleport_enabled()).is_true();
    assert_that(&teleport.invisibility_enabled()).is_false();
    assert_that(&teleport.speed_increase_rate()).is_equal_to(0.1);
    assert_that(&teleport.frightened_timer_reduction()).is_equal_to(0.2);

    let invisible = LevelStrategy::for_level(3);
    assert_that(&invisible.teleport_enabled()).is_true();
    assert_that(&invisible.invisibility_enabled()).is_true();
    assert_that(&invisible.invisible_duration()).is_equal_to(60);
    assert_that(&invisible.speed_increase_rate()).is_equal_to(0.2);
    assert_that(&invisible.frightened_timer_reduction()).is_equal_to(0.4);
}

#[test]
fn test_frightened_duration_and_warning() {
    let expected = [(1, 420, 294), (2, 336, 235), (3, 252, 176)];
    for (level, duration, warning) in expected {
        let strategy = LevelStrategy::for_level(level);
        assert_that(&strategy.frightened_duration()).is_equal_to(duration);
        assert_that(&strategy.warning_threshold()).is_equal_to(warning);
    }
}

#[test]
fn test_difficulty_never_decreases() {
    let levels: Vec<LevelStrategy> = (1..=3).map(LevelStrategy::for_level).collect();
    for pair in levels.windows(2) {
        assert_that(&(pair[1].speed_increase_rate() >= pair[0].speed_increase_rate())).is_true();
        assert_that(&(pair[1].frightened_duration() <= pair[0].frightened_duration())).is_true();
    }
}

#[test]
fn test_base_speed_survives_boost() {
    for level in 1..=3 {
        assert_that(&LevelStrategy::for_level(level).boosted_speed(2)).is_equal_to(2);
    }
    assert_that(&LevelStrategy::for_level(3).boosted_speed(10)).is_equal_to(12);
}

#[test]
fn test_sampled_intervals_stay_in_range() {
    let strategy = LevelStrategy::for_level(3);
    let mut rng = common::rng();
    for _ in 0..200 {
        assert_that(&strategy.teleport_interval(&mut rng)).is_greater_than_or_equal_to(60);
        assert_that(&strategy.teleport_interval(&mut rng)).is_less_than_or_equal_to(300);
        let invisible = strategy.invisible_interval(&mut rng);
        assert_that(&(120..=480).contains(&invisible)).is_true();
    }
}

#[test]
fn test_disabled_intervals_sample_zero() {
    let strategy = LevelStrategy::for_level(1);
    let mut rng = common::rng();
    assert_that(&strategy.teleport_interval(&mut rng)).is_equal_to(0);
    assert_that(&strategy.invisible_interval(&mut rng)).is_equal_to(0);
}

#[test]
fn test_pinned_interval_is_exact() {
    let strategy = LevelStrategy::for_level(2).with_teleport_interval(60..=60);
    let mut rng = common::rng();
    assert_that(&strategy.teleport_interval(&mut rng)).is_equal_to(60);
}

#[test]
fn test_unknown_level_plays_as_basic() {
    let strategy = LevelStrategy::for_level(99);
    assert_that(&strategy.level()).is_equal_to(1);
    assert_that(&strategy).is_equal_to(LevelStrategy::default());
}
