use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use glam::IVec2;
use pacgum::collision::{CellKind, WallGrid};
use pacgum::config::load_config;
use pacgum::constants::{CELL_SIZE, LOOP_TIME};
use pacgum::entity::DIRECTIONS;
use pacgum::events::Scoreboard;
use pacgum::game::{Game, GameOptions, GameStage, Placement};
use pacgum::ghost::{Den, Personality};
use pacgum::item::PowerItem;
use pacgum::logging::setup_logging;
use pacgum::ranking::{Ranking, ScoreLog};
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;
use thousands::Separable;
use tracing::{info, warn};

/// Ticks between scripted direction changes.
const INPUT_PERIOD: u64 = 45;

/// `#` wall, `-` den door, `.` pellet, `o` power item, `P` player, `B`/`K`/`I`/`C` ghosts.
/// The den exit is the cell above the door and the den center the cell below it.
const DEMO_BOARD: [&str; 15] = [
    "#####################",
    "#o........#........o#",
    "#.###.###.#.###.###.#",
    "#...................#",
    "#.###.#.#####.#.###.#",
    "#.....#...B...#.....#",
    "#####.#.##-##.#.#####",
    "#####.#.#KCI#.#.#####",
    "#####.#.#####.#.#####",
    "#.........P.........#",
    "#.###.#########.###.#",
    "#o..#...........#..o#",
    "###.#.#.#####.#.#.###",
    "#.....#...#...#.....#",
    "#####################",
];

fn demo_placement(level: u32) -> anyhow::Result<Placement> {
    let height = DEMO_BOARD.len() as i32;
    let width = DEMO_BOARD[0].len() as i32;
    let mut walls = WallGrid::new(width, height);
    let mut player = None;
    let mut door = None;
    let mut ghosts = Vec::new();
    let mut pellets = Vec::new();
    let mut power_cells = Vec::new();

    for (y, row) in DEMO_BOARD.iter().enumerate() {
        for (x, symbol) in row.chars().enumerate() {
            let cell = IVec2::new(x as i32, y as i32);
            let position = cell * CELL_SIZE;
            match symbol {
                '#' => walls.set(cell, CellKind::Wall),
                '-' => {
                    walls.set(cell, CellKind::HouseDoor);
                    door = Some(position);
                }
                '.' => pellets.push(position),
                'o' => power_cells.push(position),
                'P' => player = Some(position),
                'B' => ghosts.push((Personality::Blinky, position)),
                'K' => ghosts.push((Personality::Pinky, position)),
                'I' => ghosts.push((Personality::Inky, position)),
                'C' => ghosts.push((Personality::Clyde, position)),
                _ => {}
            }
        }
    }

    let player = player.context("demo board has no player")?;
    let door = door.context("demo board has no den door")?;
    let den = Den {
        exit: door - IVec2::new(0, CELL_SIZE),
        center: door + IVec2::new(0, CELL_SIZE),
    };

    let mut placement = Placement::new(level, walls, player).with_den(den);
    placement.ghosts = ghosts;
    placement.pellets = pellets;
    placement.power_items = PowerItem::iter().cycle().zip(power_cells).collect();
    Ok(placement)
}

fn main() -> anyhow::Result<()> {
    setup_logging();

    let config = load_config().context("Failed to load configuration")?;
    let seed = config.seed.unwrap_or_else(|| SmallRng::from_os_rng().random());
    let options = GameOptions {
        seed: Some(seed),
        ..GameOptions::from(&config)
    };

    let mut game = Game::new(demo_placement(config.level)?, options)?;
    let scoreboard = Arc::new(Mutex::new(Scoreboard::default()));
    game.subscribe(scoreboard.clone());
    info!(seed, level = game.strategy().name(), "Starting headless run");

    let mut input = SmallRng::seed_from_u64(seed.rotate_left(17));
    let started = Instant::now();
    let mut stage = GameStage::Playing;

    while stage == GameStage::Playing && game.tick_count() < config.max_ticks {
        let tick_start = Instant::now();

        if game.tick_count() % INPUT_PERIOD == 0 {
            if let Some(direction) = DIRECTIONS.choose(&mut input) {
                game.steer(*direction);
            }
        }
        stage = game.tick()?;

        if config.realtime {
            let elapsed = tick_start.elapsed();
            if elapsed < LOOP_TIME {
                spin_sleep::sleep(LOOP_TIME - elapsed);
            } else {
                warn!(behind = ?(elapsed - LOOP_TIME), "Tick behind schedule");
            }
        }
    }

    let board = scoreboard.lock().clone();
    let elapsed: Duration = started.elapsed();
    println!(
        "{} after {} ticks ({:.1?}): score {}, {} pellets, {} power items, {} ghosts eaten",
        stage,
        game.tick_count().separate_with_commas(),
        elapsed,
        board.score.separate_with_commas(),
        board.pellets,
        board.power_items,
        board.ghosts,
    );

    let log = ScoreLog::new(&config.score_log);
    log.append(&Ranking::now(&config.nickname, &config.map_name, board.score))
        .with_context(|| format!("Failed to append to {}", log.path().display()))?;
    for (rank, entry) in log.top(&config.map_name, 5)?.iter().enumerate() {
        println!("{:>2}. {:<12} {:>8}", rank + 1, entry.nickname, entry.score.separate_with_commas());
    }

    Ok(())
}
