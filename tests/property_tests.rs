//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Generator: grid shape, floor rules, arena placement, ground band,
//!   pit placement, pit/enemy rates and marker mix over many seeds
//! - Parser: indestructible tiles never removable, one boss per generated level
//! - Collision: landing never leaves the mover inside a tile
//! - Homing: every step re-aims at the target's current centre

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use craft_runner::consts::*;
use craft_runner::level::generator::{ARENA_COLUMNS, SAFE_END_COLUMNS, SAFE_START_COLUMNS};
use craft_runner::level::{generate_level, parse_level};
use craft_runner::sim::collision::overlapping;
use craft_runner::sim::combat::update_projectiles;
use craft_runner::sim::{
    Axis, Block, BlockKind, Enemy, EnemyKind, GameState, LevelData, Owner, Projectile,
    ProjectileKind, resolve_axis,
};
use craft_runner::{Biome, Character, Difficulty, Settings};

fn any_settings() -> impl Strategy<Value = Settings> {
    (
        prop::sample::select(vec![Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]),
        prop::sample::select(Biome::ALL.to_vec()),
        1u32..=3,
    )
        .prop_map(|(difficulty, biome, len)| {
            Settings::new(difficulty, biome, Character::Steve).with_length(len)
        })
}

fn positions(grid: &[String], marker: char) -> Vec<(usize, usize)> {
    grid.iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.chars()
                .enumerate()
                .filter(move |(_, c)| *c == marker)
                .map(move |(x, _)| (x, y))
        })
        .collect()
}

// ============================================================
// Generator Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_grid_shape(settings in any_settings(), seed in any::<u64>()) {
        let grid = generate_level(&settings, &mut Pcg32::seed_from_u64(seed));
        let width = BASE_LEVEL_WIDTH * settings.length_multiplier as usize;
        prop_assert_eq!(grid.len(), WORLD_HEIGHT_TILES);
        for row in &grid {
            prop_assert_eq!(row.chars().count(), width);
        }
    }

    #[test]
    fn prop_floor_matches_biome(settings in any_settings(), seed in any::<u64>()) {
        let grid = generate_level(&settings, &mut Pcg32::seed_from_u64(seed));
        let bottom = &grid[WORLD_HEIGHT_TILES - 1];
        if settings.biome == Biome::TheEnd {
            prop_assert!(bottom.chars().all(|c| c == '.'));
            prop_assert!(grid.iter().all(|row| !row.contains('#')));
        } else {
            prop_assert!(bottom.chars().all(|c| c == '#'));
        }
    }

    #[test]
    fn prop_boss_and_portal_in_arena(settings in any_settings(), seed in any::<u64>()) {
        let grid = generate_level(&settings, &mut Pcg32::seed_from_u64(seed));
        let width = grid[0].len();
        let bosses = positions(&grid, 'B');
        let portals = positions(&grid, 'E');
        prop_assert_eq!(bosses.len(), 1);
        prop_assert_eq!(portals.len(), 1);
        let (boss_x, _) = bosses[0];
        let (portal_x, _) = portals[0];
        prop_assert!(boss_x >= width - ARENA_COLUMNS);
        prop_assert!(portal_x >= width - ARENA_COLUMNS);
        prop_assert!(portal_x >= boss_x);
    }

    #[test]
    fn prop_easy_has_no_pits(biome in prop::sample::select(Biome::ALL.to_vec()), seed in any::<u64>()) {
        let settings = Settings::new(Difficulty::Easy, biome, Character::Steve);
        let grid = generate_level(&settings, &mut Pcg32::seed_from_u64(seed));
        let above_floor = &grid[WORLD_HEIGHT_TILES - 2];
        prop_assert!(above_floor.chars().all(|c| c != '.' && c != 'L'));
    }

    #[test]
    fn prop_parsed_level_protects_indestructibles(settings in any_settings(), seed in any::<u64>()) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = generate_level(&settings, &mut rng);
        let level = parse_level(&grid, settings.biome, &mut rng);
        prop_assert!(level
            .removable_blocks()
            .all(|b| b.kind != BlockKind::Bedrock && b.kind != BlockKind::Portal));
        prop_assert_eq!(level.enemies.iter().filter(|e| e.is_boss()).count(), 1);
        prop_assert!(level.enemies.iter().all(|e| e.hp > 0));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_ground_band_and_pit_zones(
        difficulty in prop::sample::select(vec![Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]),
        len in 1u32..=3,
        seed in any::<u64>(),
    ) {
        let settings = Settings::new(difficulty, Biome::Plains, Character::Steve).with_length(len);
        let grid = generate_level(&settings, &mut Pcg32::seed_from_u64(seed));
        let width = grid[0].len();
        let cells: Vec<Vec<char>> = grid.iter().map(|r| r.chars().collect()).collect();

        for x in 0..width - ARENA_COLUMNS {
            let column: Vec<char> = cells.iter().map(|row| row[x]).collect();
            if matches!(column[13], '.' | 'L') {
                prop_assert!(difficulty.pit_chance() > 0.0);
                prop_assert!(x >= SAFE_START_COLUMNS && x < width - SAFE_END_COLUMNS, "pit in flat zone at {}", x);
                prop_assert!(column.iter().all(|c| *c != 'G' && *c != 'D'));
                continue;
            }
            let tops: Vec<usize> = (0..WORLD_HEIGHT_TILES).filter(|&y| column[y] == 'G').collect();
            prop_assert_eq!(tops.len(), 1);
            let top = tops[0];
            prop_assert!((9..=13).contains(&top), "surface row {} at column {}", top, x);
            prop_assert!(column[top + 1..14].iter().all(|c| *c == 'D'));
            if x < SAFE_START_COLUMNS {
                prop_assert_eq!(top, 12);
            }
        }
    }
}

// ============================================================
// Statistical Properties
// ============================================================

const SWEEP_SEEDS: u64 = 300;

struct Tally {
    interior: usize,
    pits: usize,
    eligible: usize,
    markers: [usize; 3],
}

/// Count pits and ground markers over the interior columns of many Plains levels
fn sweep(difficulty: Difficulty) -> Tally {
    let settings = Settings::new(difficulty, Biome::Plains, Character::Steve);
    let mut tally = Tally {
        interior: 0,
        pits: 0,
        eligible: 0,
        markers: [0; 3],
    };
    for seed in 0..SWEEP_SEEDS {
        let grid = generate_level(&settings, &mut Pcg32::seed_from_u64(seed));
        let cells: Vec<Vec<char>> = grid.iter().map(|r| r.chars().collect()).collect();
        let width = cells[0].len();
        for x in SAFE_START_COLUMNS..width - SAFE_END_COLUMNS {
            tally.interior += 1;
            let Some(top) = (0..WORLD_HEIGHT_TILES).find(|&y| cells[y][x] == 'G') else {
                tally.pits += 1;
                continue;
            };
            // Platforms claim the spawn cell before markers are placed
            let spawn = cells[top - 1][x];
            if spawn == '?' {
                continue;
            }
            tally.eligible += 1;
            match spawn {
                'g' => tally.markers[0] += 1,
                's' => tally.markers[1] += 1,
                't' => tally.markers[2] += 1,
                _ => {}
            }
        }
    }
    tally
}

fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole.max(1) as f64
}

#[test]
fn test_pit_rate_follows_difficulty() {
    for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
        let tally = sweep(difficulty);
        let rate = ratio(tally.pits, tally.interior);
        let expected = difficulty.pit_chance();
        assert!((rate - expected).abs() < 0.01, "{difficulty:?}: pit rate {rate:.4}, expected {expected}");
    }
}

#[test]
fn test_enemy_density_follows_difficulty() {
    let mut last = 0.0;
    for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
        let tally = sweep(difficulty);
        let density = ratio(tally.markers.iter().sum(), tally.eligible);
        let expected = difficulty.enemy_chance();
        assert!(
            (density - expected).abs() < 0.02,
            "{difficulty:?}: enemy density {density:.4}, expected {expected}"
        );
        assert!(density > last);
        last = density;
    }
}

#[test]
fn test_ground_marker_mix() {
    let tally = sweep(Difficulty::Hard);
    let total: usize = tally.markers.iter().sum();
    assert!(total > 1000);
    for (count, expected) in tally.markers.iter().zip([0.60, 0.25, 0.15]) {
        let share = ratio(*count, total);
        assert!((share - expected).abs() < 0.03, "share {share:.3}, expected {expected}");
    }
}

// ============================================================
// Collision Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_landing_never_overlaps(
        x in 0.0f32..200.0,
        penetration in 0.01f32..10.0,
        vy in 0.5f32..12.0,
        width in 8u32..48,
        height in 8u32..48,
    ) {
        let (width, height) = (width as f32, height as f32);
        let blocks: Vec<Block> = (0..10).map(|c| Block::new(c, 8, BlockKind::Stone)).collect();
        let top = 8.0 * TILE_SIZE;
        let size = Vec2::new(width, height);
        let mut pos = Vec2::new(x, top - height + penetration);
        let mut vel = Vec2::new(0.0, vy);

        let contact = resolve_axis(&mut pos, &mut vel, size, &blocks, Axis::Y, None);
        prop_assert!(contact.landed);
        prop_assert_eq!(vel.y, 0.0);
        prop_assert!(overlapping(&blocks, pos, size).next().is_none());
    }
}

// ============================================================
// Homing Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_homing_tracks_moving_target(
        start in (50.0f32..150.0, 100.0f32..380.0),
        target in (450.0f32..650.0, 50.0f32..380.0),
        moves in prop::collection::vec((-5.0f32..5.0, -5.0f32..5.0), 1..6),
    ) {
        let mut level = LevelData::new(Biome::Plains);
        level.map_width = 100.0 * TILE_SIZE;
        let id = level.next_entity_id();
        level.enemies.push(Enemy::new(id, EnemyKind::Phantom, Vec2::new(target.0, target.1)));
        let pid = level.next_entity_id();
        level.projectiles.push(Projectile {
            id: pid,
            kind: ProjectileKind::Arrow,
            owner: Owner::Player,
            pos: Vec2::new(start.0, start.1),
            vel: Vec2::new(PROJECTILE_SPEED, 0.0),
            size: Vec2::splat(PROJECTILE_SIZE),
            life_ticks: None,
            target_id: Some(id),
            ignore_gravity: true,
            dead: false,
        });
        let mut state = GameState::new(level, &Settings::default(), 0);

        for (dx, dy) in moves {
            state.level.enemies[0].pos += Vec2::new(dx, dy);
            let expected = (state.level.enemies[0].center() - state.level.projectiles[0].center()).normalize();
            update_projectiles(&mut state);
            let proj = &state.level.projectiles[0];
            prop_assert!(!proj.dead);
            prop_assert_eq!(proj.target_id, Some(id));
            prop_assert!(proj.vel.normalize().dot(expected) > 0.9999);
            prop_assert!((proj.vel.length() - PROJECTILE_SPEED).abs() < 1e-3);
        }
    }
}
