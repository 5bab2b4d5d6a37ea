use glam::IVec2;
use pacgum::collision::{ArenaSnapshot, CollisionLayer, Hitbox};
use pacgum::entity::{Direction, DIRECTIONS};
use pacgum::ghost::steering::{candidate_directions, closest_to, path_step, TargetView};
use pacgum::ghost::Personality;
use speculoos::prelude::*;

mod common;

const BOARD: IVec2 = IVec2::new(224, 248);

#[test]
fn test_scatter_corners_are_distinct() {
    let corners: Vec<IVec2> = [Personality::Blinky, Personality::Pinky, Personality::Inky, Personality::Clyde]
        .into_iter()
        .map(|p| p.scatter_target(BOARD))
        .collect();

    assert_that(&corners[0]).is_equal_to(IVec2::new(200, -24));
    assert_that(&corners[1]).is_equal_to(IVec2::new(16, -24));
    for (i, a) in corners.iter().enumerate() {
        for b in &corners[i + 1..] {
            assert_that(a).is_not_equal_to(b);
        }
    }
}

#[test]
fn test_clyde_retreats_when_close() {
    let view = TargetView {
        player: IVec2::new(100, 100),
        player_heading: None,
        blinky: None,
    };
    let far = Personality::Clyde.chase_target(IVec2::new(100, 200), &view, BOARD);
    let near = Personality::Clyde.chase_target(IVec2::new(100, 120), &view, BOARD);

    assert_that(&far).is_equal_to(view.player);
    assert_that(&near).is_equal_to(Personality::Clyde.scatter_target(BOARD));
}

#[test]
fn test_blinky_targets_player() {
    let view = TargetView {
        player: IVec2::new(40, 56),
        player_heading: Some(Direction::Up),
        blinky: None,
    };
    assert_that(&Personality::Blinky.chase_target(IVec2::ZERO, &view, BOARD)).is_equal_to(view.player);
}

#[test]
fn test_ties_prefer_up_then_left() {
    let position = common::cell(5, 5);
    let target = position + IVec2::new(-8, -8);
    assert_that(&closest_to(&DIRECTIONS, position, target)).is_equal_to(Some(Direction::Up));
}

#[test]
fn test_door_blocks_only_roaming_ghosts() {
    let grid = common::walls(&["#####", "#####", "##-##", "#   #", "#####"]);
    let snapshot = ArenaSnapshot::walls_only(&grid);
    let hitbox = Hitbox::cell(IVec2::new(2, 3));

    let roaming = candidate_directions(&snapshot, hitbox, Some(Direction::Right), CollisionLayer::SOLID);
    let returning = candidate_directions(&snapshot, hitbox, Some(Direction::Right), CollisionLayer::WALL);

    assert_that(&roaming.contains(&Direction::Up)).is_false();
    assert_that(&returning.contains(&Direction::Up)).is_true();
}

#[test]
fn test_eaten_ghost_paths_through_door() {
    let grid = common::walls(&["#####", "# # #", "##-##", "#   #", "#####"]);
    let snapshot = ArenaSnapshot::walls_only(&grid);

    let step = path_step(&snapshot, common::cell(2, 3), common::cell(2, 1), CollisionLayer::WALL);
    assert_that(&step).is_equal_to(Some(Direction::Up));
    assert_that(&path_step(&snapshot, common::cell(2, 3), common::cell(2, 1), CollisionLayer::SOLID)).is_none();
}
