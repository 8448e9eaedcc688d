//! Procedural level generator
//!
//! Builds a character grid in the level legend from difficulty, biome and
//! length. Output is random; only its structure is guaranteed:
//! - exactly `WORLD_HEIGHT_TILES` rows of `150 * length_multiplier` columns
//! - a bedrock bottom row, or open void in The End
//! - flat safe zones at the start and before the arena
//! - a boss arena in the last 25 columns with the boss left of the portal

use rand::Rng;

use crate::consts::{BASE_LEVEL_WIDTH, WORLD_HEIGHT_TILES};
use crate::settings::{Biome, Settings};

/// Columns of flat ground at the start of every level
pub const SAFE_START_COLUMNS: usize = 15;
/// Columns of flat ground at the end (the arena lies inside this zone)
pub const SAFE_END_COLUMNS: usize = 30;
/// Width of the boss arena at the end of the level
pub const ARENA_COLUMNS: usize = 25;

const EMPTY: char = '.';
const MIN_GROUND: usize = 1;
const MAX_GROUND: usize = 5;
const START_GROUND: usize = 2;
const PLATFORM_SPACING: usize = 5;

/// Per-biome tile choices
#[derive(Debug, Clone, Copy)]
struct Palette {
    top: char,
    fill: char,
    platform: char,
    arena_floor: char,
}

fn palette(biome: Biome) -> Palette {
    let (top, fill, platform) = match biome {
        Biome::Plains => ('G', 'D', '?'),
        Biome::Desert => ('S', 'A', 'A'),
        Biome::Snow => ('W', 'D', 'I'),
        Biome::Nether => ('R', 'R', 'O'),
        Biome::TheEnd => ('X', 'X', 'O'),
    };
    let arena_floor = if biome.has_bedrock_floor() { '#' } else { 'O' };
    Palette {
        top,
        fill,
        platform,
        arena_floor,
    }
}

/// Rows (inclusive) where flying markers may appear
fn flyer_rows(biome: Biome) -> (usize, usize) {
    match biome {
        Biome::Nether => (2, 5),
        Biome::TheEnd => (1, 4),
        _ => (2, 4),
    }
}

/// Generate a level grid as row strings
pub fn generate_level(settings: &Settings, rng: &mut impl Rng) -> Vec<String> {
    let width = BASE_LEVEL_WIDTH * settings.length_multiplier.max(1) as usize;
    let height = WORLD_HEIGHT_TILES;
    let biome = settings.biome;
    let difficulty = settings.difficulty;
    let tiles = palette(biome);

    let mut grid = vec![vec![EMPTY; width]; height];

    if biome.has_bedrock_floor() {
        grid[height - 1].fill('#');
    }

    // Terrain walk; `surface[x]` is the row of the top ground cell, None for pits
    let flat = |x: usize| x < SAFE_START_COLUMNS || x >= width - SAFE_END_COLUMNS;
    let mut ground = START_GROUND;
    let mut surface = vec![None; width];
    for (x, top) in surface.iter_mut().enumerate() {
        if !flat(x) {
            if rng.random_bool(0.2) {
                ground = if rng.random_bool(0.5) { ground + 1 } else { ground - 1 };
                ground = ground.clamp(MIN_GROUND, MAX_GROUND);
            }
            if rng.random_bool(difficulty.pit_chance()) {
                if biome.has_bedrock_floor() {
                    grid[height - 2][x] = 'L';
                }
                continue;
            }
        }

        let top_row = height - 1 - ground;
        for (y, row) in grid.iter_mut().enumerate().take(height - 1).skip(top_row) {
            row[x] = if y == top_row { tiles.top } else { tiles.fill };
        }
        *top = Some(top_row);
    }

    // Floating platforms
    for x in (SAFE_START_COLUMNS..width - SAFE_END_COLUMNS).step_by(PLATFORM_SPACING) {
        if !rng.random_bool(difficulty.platform_chance()) {
            continue;
        }
        let len = rng.random_range(2..=4);
        let row = rng.random_range(height - 11..=height - 7);
        for cell in grid[row].iter_mut().skip(x).take(len) {
            if *cell == EMPTY {
                *cell = tiles.platform;
            }
        }
    }

    // Enemy markers
    let (fly_min, fly_max) = flyer_rows(biome);
    for x in SAFE_START_COLUMNS..width - SAFE_END_COLUMNS {
        if let Some(top_row) = surface[x] {
            let spawn_row = top_row - 1;
            if grid[spawn_row][x] == EMPTY && rng.random_bool(difficulty.enemy_chance()) {
                let roll: f64 = rng.random();
                grid[spawn_row][x] = if roll < 0.6 {
                    'g'
                } else if roll < 0.85 {
                    's'
                } else {
                    't'
                };
            }
        }
        if rng.random_bool(difficulty.flyer_chance()) {
            let row = rng.random_range(fly_min..=fly_max);
            if grid[row][x] == EMPTY {
                grid[row][x] = 'f';
            }
        }
    }

    // Boss arena
    let arena_start = width - ARENA_COLUMNS;
    for row in grid.iter_mut().take(height - 2) {
        row[arena_start..].fill(EMPTY);
    }
    grid[height - 2][arena_start..].fill(tiles.arena_floor);
    grid[height - 6][arena_start + 5] = 'B';
    grid[height - 3][width - 4] = 'E';

    log::debug!(
        "Generated {}x{} {} level ({})",
        width,
        height,
        biome.as_str(),
        difficulty.as_str()
    );
    grid.into_iter().map(String::from_iter).collect()
}
