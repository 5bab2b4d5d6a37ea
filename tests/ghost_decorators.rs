use glam::IVec2;
use pacgum::collision::{ArenaSnapshot, EntityRef, Hitbox, WallGrid};
use pacgum::entity::{FrameRecorder, TickContext};
use pacgum::error::GameError;
use pacgum::ghost::decorators::{decorate_for_level, GhostBuilder, Invisible, Slow, Teleport, TeleportOutcome};
use pacgum::ghost::state::GhostState;
use pacgum::ghost::{chain_layers, innermost, Den, Ghost, GhostEntity, GhostLayer, Personality};
use pacgum::item::PowerItem;
use pacgum::level::LevelStrategy;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

const CORRIDOR: [&str; 3] = [
    "##############################",
    "#                            #",
    "##############################",
];

const CELL_BOX: [&str; 3] = ["###", "# #", "###"];

fn corridor_ghost(grid: &WallGrid) -> Ghost {
    let den = Den {
        exit: common::cell(28, 1),
        center: common::cell(28, 1),
    };
    Ghost::new(Personality::Blinky, common::cell(1, 1), &LevelStrategy::default(), grid.pixel_size()).with_den(den)
}

fn teleporting(ghost: Ghost) -> Teleport {
    let strategy = LevelStrategy::for_level(2).with_teleport_interval(60..=60);
    Teleport::new(Box::new(ghost), strategy, 0, &mut common::rng())
}

#[test]
fn test_level_chains_keep_base_speed() {
    let grid = WallGrid::new(11, 11);
    let mut rng = common::rng();
    for level in 1..=3 {
        let strategy = LevelStrategy::for_level(level);
        let ghost = Ghost::new(Personality::Pinky, IVec2::ZERO, &strategy, grid.pixel_size());
        let chain = decorate_for_level(ghost, &strategy, 2, &mut rng).unwrap();
        assert_that(&chain.speed()).is_equal_to(2);
    }
}

#[test]
fn test_speed_boost_preserves_heading() {
    let grid = WallGrid::new(11, 11);
    let den = Den {
        exit: common::cell(5, 3),
        center: common::cell(5, 5),
    };
    let strategy = LevelStrategy::for_level(3);
    let ghost = Ghost::new(Personality::Blinky, den.exit, &strategy, grid.pixel_size())
        .with_den(den)
        .with_speed(5);
    let mut chain = GhostBuilder::new(ghost).speed_boost(&strategy).build().unwrap();

    common::run_ghost(chain.as_mut(), &grid, &mut common::rng(), 1);

    assert_that(&chain.speed()).is_equal_to(6);
    assert_that(&chain.velocity()).is_equal_to(IVec2::new(0, -6));
    assert_that(&chain.position()).is_equal_to(den.exit + IVec2::new(0, -6));
}

#[test]
fn test_slow_moves_every_other_tick() {
    let strategy = LevelStrategy::default();
    let ghost = Ghost::new(Personality::Clyde, IVec2::ZERO, &strategy, IVec2::ZERO);
    let mut slow = Slow::new(Box::new(ghost), 2).unwrap();
    GhostEntity::set_velocity(&mut slow, IVec2::new(2, 0));
    GhostEntity::power_item_eaten(&mut slow, PowerItem::SlowGhosts).unwrap();

    let grid = WallGrid::new(1, 1);
    let mut rng = common::rng();
    let mut moved_on = Vec::new();
    for tick in 1..=6 {
        let snapshot = ArenaSnapshot::walls_only(&grid);
        let mut ctx = TickContext::new(&snapshot, &mut rng);
        let before = GhostEntity::position(&slow);
        GhostEntity::pre_update(&mut slow, &mut ctx);
        let velocity = GhostEntity::velocity(&slow);
        GhostEntity::update_position(&mut slow, velocity);
        if GhostEntity::position(&slow) != before {
            moved_on.push(tick);
        }
    }
    assert_eq!(moved_on, vec![2, 4, 6]);
}

#[test]
fn test_slow_expires() {
    let strategy = LevelStrategy::default();
    let ghost = Ghost::new(Personality::Clyde, IVec2::ZERO, &strategy, IVec2::ZERO);
    let mut slow = Slow::new(Box::new(ghost), 2).unwrap();
    GhostEntity::set_velocity(&mut slow, IVec2::new(2, 0));
    GhostEntity::power_item_eaten(&mut slow, PowerItem::SlowGhosts).unwrap();

    let grid = WallGrid::new(1, 1);
    let mut rng = common::rng();
    for tick in 1..=420 {
        let snapshot = ArenaSnapshot::walls_only(&grid);
        let mut ctx = TickContext::new(&snapshot, &mut rng);
        GhostEntity::pre_update(&mut slow, &mut ctx);
        let velocity = GhostEntity::velocity(&slow);
        GhostEntity::update_position(&mut slow, velocity);
        if tick == 419 {
            assert_that(&slow.is_active()).is_true();
        }
    }

    assert_that(&slow.is_active()).is_false();
    // 209 throttled moves, then the expiry tick moves freely.
    assert_that(&GhostEntity::position(&slow)).is_equal_to(IVec2::new(420, 0));
}

#[test]
fn test_slow_rejects_zero_ratio() {
    let ghost = Ghost::new(Personality::Clyde, IVec2::ZERO, &LevelStrategy::default(), IVec2::ZERO);
    let result = Slow::new(Box::new(ghost), 0);
    assert_that(&matches!(result, Err(GameError::InvalidComposition(_)))).is_true();
}

#[test]
fn test_teleport_jumps_ahead() {
    let grid = common::walls(&CORRIDOR);
    let mut teleport = teleporting(corridor_ghost(&grid));

    common::run_ghost(&mut teleport, &grid, &mut common::rng(), 59);
    assert_that(&teleport.last_outcome()).is_none();

    common::run_ghost(&mut teleport, &grid, &mut common::rng(), 1);
    assert_that(&teleport.last_outcome()).is_equal_to(Some(TeleportOutcome::Moved {
        from: IVec2::new(126, 8),
        to: IVec2::new(174, 8),
    }));
    assert_that(&GhostEntity::position(&teleport)).is_equal_to(IVec2::new(176, 8));
    assert_that(&teleport.timer()).is_equal_to(0);
    assert_that(&teleport.next_teleport()).is_equal_to(60);
}

#[test]
fn test_teleport_blocked_by_wall() {
    let mut rows = CORRIDOR;
    rows[1] = "#                 #          #";
    let grid = common::walls(&rows);
    let mut teleport = teleporting(corridor_ghost(&grid));

    common::run_ghost(&mut teleport, &grid, &mut common::rng(), 60);

    assert_that(&teleport.last_outcome()).is_equal_to(Some(TeleportOutcome::Blocked(EntityRef::Wall(IVec2::new(18, 1)))));
    assert_that(&GhostEntity::position(&teleport)).is_equal_to(IVec2::new(128, 8));
}

#[test]
fn test_teleport_cancelled_off_board() {
    let rows = ["####################", "#                   ", "####################"];
    let grid = common::walls(&rows);
    let mut teleport = teleporting(corridor_ghost(&grid).with_den(Den {
        exit: common::cell(18, 1),
        center: common::cell(18, 1),
    }));

    common::run_ghost(&mut teleport, &grid, &mut common::rng(), 60);

    assert_that(&teleport.last_outcome()).is_equal_to(Some(TeleportOutcome::OutOfBounds(IVec2::new(174, 8))));
    assert_that(&GhostEntity::position(&teleport)).is_equal_to(IVec2::new(128, 8));
}

#[test]
fn test_teleport_needs_a_heading() {
    let grid = common::walls(&CELL_BOX);
    let ghost = Ghost::new(Personality::Inky, common::cell(1, 1), &LevelStrategy::default(), grid.pixel_size());
    let mut teleport = teleporting(ghost);

    common::run_ghost(&mut teleport, &grid, &mut common::rng(), 60);

    assert_that(&teleport.last_outcome()).is_equal_to(Some(TeleportOutcome::Stationary));
    assert_that(&GhostEntity::position(&teleport)).is_equal_to(common::cell(1, 1));
}

#[test]
fn test_teleport_waits_for_first_input() {
    let grid = common::walls(&CORRIDOR);
    let mut teleport = teleporting(corridor_ghost(&grid));
    let mut rng = common::rng();

    for _ in 0..120 {
        let snapshot = ArenaSnapshot::walls_only(&grid);
        let mut ctx = TickContext::new(&snapshot, &mut rng);
        GhostEntity::pre_update(&mut teleport, &mut ctx);
    }

    assert_that(&teleport.timer()).is_equal_to(0);
    assert_that(&teleport.last_outcome()).is_none();
}

#[test]
fn test_invisible_ghost_cannot_be_seen_or_touched() {
    let grid = common::walls(&CELL_BOX);
    let strategy = LevelStrategy::for_level(3).with_invisible_interval(30..=30, 60);
    let ghost = Ghost::new(Personality::Pinky, common::cell(1, 1), &strategy, grid.pixel_size());
    let mut invisible = Invisible::new(Box::new(ghost), strategy, &mut common::rng());
    let mut rng = common::rng();

    common::run_ghost(&mut invisible, &grid, &mut rng, 29);
    assert_that(&invisible.is_invisible()).is_false();
    assert_that(&GhostEntity::hitbox(&invisible).is_empty()).is_false();

    common::run_ghost(&mut invisible, &grid, &mut rng, 1);
    assert_that(&invisible.is_invisible()).is_true();
    assert_that(&GhostEntity::hitbox(&invisible)).is_equal_to(Hitbox::EMPTY);

    let mut canvas = FrameRecorder::default();
    GhostEntity::render(&invisible, &mut canvas);
    assert_that(&canvas.draws).is_empty();

    common::run_ghost(&mut invisible, &grid, &mut rng, 59);
    assert_that(&invisible.is_invisible()).is_true();
    common::run_ghost(&mut invisible, &grid, &mut rng, 1);
    assert_that(&invisible.is_invisible()).is_false();
    assert_that(&invisible.next_invisible()).is_equal_to(30);

    GhostEntity::render(&invisible, &mut canvas);
    assert_that(&canvas.draws).has_length(1);
}

#[test]
fn test_level_three_chain_order() {
    let strategy = LevelStrategy::for_level(3);
    let ghost = Ghost::new(Personality::Blinky, IVec2::ZERO, &strategy, IVec2::splat(224));
    let chain = decorate_for_level(ghost, &strategy, 2, &mut common::rng()).unwrap();

    assert_eq!(
        chain_layers(chain.as_ref()).to_vec(),
        vec![
            GhostLayer::Invisible,
            GhostLayer::Teleport,
            GhostLayer::Slow,
            GhostLayer::SpeedBoost,
            GhostLayer::Base,
        ]
    );
    assert_that(&innermost(chain.as_ref()).layer()).is_equal_to(GhostLayer::Base);
}

#[test]
fn test_every_layer_reports_base_position() {
    let strategy = LevelStrategy::for_level(3);
    let ghost = Ghost::new(Personality::Blinky, IVec2::ZERO, &strategy, IVec2::splat(224));
    let mut chain = decorate_for_level(ghost, &strategy, 2, &mut common::rng()).unwrap();
    chain.reposition(common::cell(3, 4));

    let mut layer = Some(chain.as_ref());
    while let Some(entity) = layer {
        assert_that(&entity.position()).is_equal_to(common::cell(3, 4));
        layer = entity.decorated();
    }
}

#[test]
fn test_out_of_order_chain_is_rejected() {
    let strategy = LevelStrategy::for_level(2);
    let mut rng = common::rng();
    let ghost = Ghost::new(Personality::Inky, IVec2::ZERO, &strategy, IVec2::ZERO);
    let result = GhostBuilder::new(ghost)
        .teleport_staggered(&strategy, 0, &mut rng)
        .speed_boost(&strategy)
        .build();
    assert_that(&matches!(result, Err(GameError::InvalidComposition(_)))).is_true();
}

#[test]
fn test_duplicate_layer_is_rejected() {
    let strategy = LevelStrategy::default();
    let ghost = Ghost::new(Personality::Inky, IVec2::ZERO, &strategy, IVec2::ZERO);
    let result = GhostBuilder::new(ghost).slow(2).and_then(|b| b.slow(3)).and_then(|b| b.build());
    assert_that(&matches!(result, Err(GameError::InvalidComposition(_)))).is_true();
}

#[test]
fn test_player_items_are_rejected_every_time() {
    let strategy = LevelStrategy::for_level(3);
    let ghost = Ghost::new(Personality::Clyde, IVec2::ZERO, &strategy, IVec2::splat(224));
    let mut chain = decorate_for_level(ghost, &strategy, 2, &mut common::rng()).unwrap();

    for item in [PowerItem::Shield, PowerItem::FastMove, PowerItem::Shield] {
        let result = chain.power_item_eaten(item);
        assert_that(&matches!(result, Err(GameError::MisroutedPowerItem { .. }))).is_true();
    }
}

#[test]
fn test_frighten_reaches_base_through_chain() {
    let strategy = LevelStrategy::for_level(3);
    let ghost = Ghost::new(Personality::Clyde, IVec2::ZERO, &strategy, IVec2::splat(224));
    let mut chain = decorate_for_level(ghost, &strategy, 2, &mut common::rng()).unwrap();

    chain.power_item_eaten(PowerItem::FrightenGhosts).unwrap();
    assert_that(&chain.state()).is_equal_to(GhostState::Frightened);
    assert_that(&chain.machine().frightened_duration()).is_equal_to(252);
}
