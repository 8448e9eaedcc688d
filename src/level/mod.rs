//! Level grids: tile legend, parsing and fallback
//!
//! A level is a list of text rows, one character per tile. Terrain letters
//! become blocks, lowercase markers become biome-resolved enemies, and
//! anything else is empty space. Parsing never fails; input that yields no
//! usable level is replaced by [`DEFAULT_LEVEL`].

pub mod generator;
pub mod source;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

pub use crate::sim::LevelData;
use crate::consts::{ENEMY_FIRE_COOLDOWN, TILE_SIZE};
use crate::settings::Biome;
use crate::sim::{Block, BlockKind, Enemy, EnemyKind};

pub use generator::generate_level;
pub use source::{LevelSource, LevelSourceError, ProceduralSource, StaticSource};

/// Fewer rows than this is not a level
pub const MIN_LEVEL_ROWS: usize = 5;

/// Built-in level used whenever a source fails or returns garbage
pub const DEFAULT_LEVEL: &[&str] = &[
    "................................................................................",
    "................................................................................",
    "................................................................................",
    "............................f...............^...................................",
    "................................................................................",
    "................................................................................",
    "..........................................????..................................",
    "..........????............????..................................................",
    "................................................................................",
    "......................................t......................B..................",
    "...............g...............s..GGGGGGG.........g.............................",
    "GGGGGGGGGGGGGGGGGGGGGG...GGGGGGGGGDDDDDDDGGGGG..GGGGGGG.........................",
    "DDDDDDDDDDDDDDDDDDDDDD...DDDDDDDDDDDDDDDDDDDDD..DDDDDDD.....................E...",
    "??????????????????????LLL?????????????????????LL???????GGGGGGGGGGGGGGGGGGGGGGGGG",
    "################################################################################",
];

/// Terrain legend
pub fn block_for_char(c: char) -> Option<BlockKind> {
    let kind = match c {
        'G' => BlockKind::Grass,
        'D' => BlockKind::Dirt,
        'S' => BlockKind::Sand,
        'A' => BlockKind::Sandstone,
        'W' => BlockKind::Snow,
        'I' => BlockKind::Ice,
        'R' => BlockKind::Netherrack,
        'X' => BlockKind::EndStone,
        'O' => BlockKind::Obsidian,
        '#' => BlockKind::Bedrock,
        'L' => BlockKind::Lava,
        '?' => BlockKind::Stone,
        'E' => BlockKind::Portal,
        _ => return None,
    };
    Some(kind)
}

/// Generic spawn markers resolved per biome
pub const GENERIC_MARKERS: [char; 4] = ['g', 's', 't', 'f'];

/// Weighted enemy candidates for a generic marker in a biome
pub fn marker_table(biome: Biome, marker: char) -> &'static [(EnemyKind, u32)] {
    use EnemyKind::*;

    match (biome, marker) {
        (Biome::Nether, 'f') => &[(Ghast, 50), (Blaze, 50)],
        (Biome::Nether, 's') => &[(WitherSkeleton, 1)],
        (Biome::Nether, 't') => &[(Pigman, 1)],
        (Biome::Nether, _) => &[(Pigman, 50), (WitherSkeleton, 50)],

        (Biome::TheEnd, 'f') => &[(Phantom, 1)],
        (Biome::TheEnd, _) => &[(Enderman, 1)],

        (Biome::Desert, 'f') => &[(Phantom, 1)],
        (Biome::Desert, 's') => &[(Skeleton, 1)],
        (Biome::Desert, 't') => &[(Pillager, 1)],
        (Biome::Desert, _) => &[(Zombie, 1)],

        (Biome::Snow, 'f') => &[(Phantom, 1)],
        (Biome::Snow, 's') => &[(Witch, 1)],
        (Biome::Snow, 't') => &[(Warden, 1)],
        (Biome::Snow, _) => &[(Zombie, 1)],

        (Biome::Plains, 'f') => &[(Phantom, 1)],
        (Biome::Plains, 's') => &[(Skeleton, 50), (Witch, 50)],
        (Biome::Plains, 't') => &[(Slime, 50), (Creeper, 50)],
        (Biome::Plains, _) => &[(Zombie, 30), (Spider, 30), (Pillager, 20), (Drowned, 20)],
    }
}

/// Resolve a spawn marker to a concrete enemy kind
///
/// Legacy letters map to a fixed kind in every biome; generic markers roll
/// on the biome's table.
pub fn resolve_marker(marker: char, biome: Biome, rng: &mut impl Rng) -> Option<EnemyKind> {
    match marker {
        'C' => Some(EnemyKind::Creeper),
        'Z' => Some(EnemyKind::Zombie),
        'M' => Some(EnemyKind::Enderman),
        '^' => Some(EnemyKind::Ghast),
        'B' => Some(EnemyKind::Boss),
        m if GENERIC_MARKERS.contains(&m) => marker_table(biome, m)
            .choose_weighted(rng, |(_, weight)| *weight)
            .ok()
            .map(|(kind, _)| *kind),
        _ => None,
    }
}

/// Parse rows into a level. Total: unknown characters are empty space.
pub fn parse_level<S: AsRef<str>>(rows: &[S], biome: Biome, rng: &mut impl Rng) -> LevelData {
    let mut level = LevelData::new(biome);
    let mut widest = 0;

    for (row, line) in rows.iter().enumerate() {
        let line = line.as_ref();
        let mut cols = 0;
        for (col, c) in line.chars().enumerate() {
            cols = col + 1;
            let (col, row) = (col as i32, row as i32);

            if let Some(kind) = block_for_char(c) {
                level.blocks.push(Block::new(col, row, kind));
            } else if let Some(kind) = resolve_marker(c, biome, rng) {
                let id = level.next_entity_id();
                let pos = Vec2::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE);
                let mut enemy = Enemy::new(id, kind, pos);
                let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                enemy.vel.x = enemy.config().speed * sign;
                enemy.attack_cooldown = rng.random_range(ENEMY_FIRE_COOLDOWN * 2 / 3..=ENEMY_FIRE_COOLDOWN * 4 / 3);
                level.enemies.push(enemy);
            }
        }
        widest = widest.max(cols);
    }

    level.map_width = widest as f32 * TILE_SIZE;
    level.map_height = rows.len() as f32 * TILE_SIZE;

    let bosses = level.enemies.iter().filter(|e| e.is_boss()).count();
    if bosses != 1 {
        log::warn!("Level has {bosses} boss markers; the portal is open while no boss is alive");
    }
    log::debug!(
        "Parsed {}x{} level: {} blocks, {} enemies",
        widest,
        rows.len(),
        level.blocks.len(),
        level.enemies.len()
    );
    level
}

/// Parse the built-in level
pub fn default_level(biome: Biome, rng: &mut impl Rng) -> LevelData {
    parse_level(DEFAULT_LEVEL, biome, rng)
}

/// Parse rows, falling back to the default level when they aren't usable
pub fn load_or_default<S: AsRef<str>>(rows: &[S], biome: Biome, rng: &mut impl Rng) -> LevelData {
    if rows.len() < MIN_LEVEL_ROWS {
        log::warn!(
            "Level has {} rows (need {MIN_LEVEL_ROWS}), using default level",
            rows.len()
        );
        return default_level(biome, rng);
    }
    let level = parse_level(rows, biome, rng);
    if level.blocks.is_empty() {
        log::warn!("Level has no blocks, using default level");
        return default_level(biome, rng);
    }
    level
}

/// Clean raw text from a generative source into rows
///
/// Trims every line and drops blank lines and markdown code fences.
pub fn clean_rows(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_default_level_is_usable() {
        let level = default_level(Biome::Plains, &mut rng());
        assert!(!level.blocks.is_empty());
        assert_eq!(level.map_width, 80.0 * TILE_SIZE);
        assert_eq!(level.map_height, 15.0 * TILE_SIZE);
        assert_eq!(level.enemies.iter().filter(|e| e.is_boss()).count(), 1);
        assert!(level.blocks.iter().any(|b| b.kind == BlockKind::Portal));
    }

    #[test]
    fn test_legend_and_unknown_chars() {
        let rows = ["G?#", "LE.", "x%Z"];
        let level = parse_level(&rows, Biome::Plains, &mut rng());
        let kinds: Vec<_> = level.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Grass,
                BlockKind::Stone,
                BlockKind::Bedrock,
                BlockKind::Lava,
                BlockKind::Portal
            ]
        );
        assert_eq!(level.enemies.len(), 1);
        assert_eq!(level.enemies[0].kind, EnemyKind::Zombie);
        assert_eq!(level.enemies[0].pos, Vec2::new(2.0 * TILE_SIZE, 2.0 * TILE_SIZE));
    }

    #[test]
    fn test_ragged_rows_use_widest() {
        let rows = ["GG", "GGGGG", ""];
        let level = parse_level(&rows, Biome::Plains, &mut rng());
        assert_eq!(level.map_width, 5.0 * TILE_SIZE);
        assert_eq!(level.map_height, 3.0 * TILE_SIZE);
    }

    #[test]
    fn test_empty_input_is_total() {
        let rows: [&str; 0] = [];
        let level = parse_level(&rows, Biome::Nether, &mut rng());
        assert!(level.blocks.is_empty() && level.enemies.is_empty());
        assert_eq!(level.map_width, 0.0);
    }

    #[test]
    fn test_legacy_markers_ignore_biome() {
        let mut rng = rng();
        for biome in Biome::ALL {
            assert_eq!(resolve_marker('C', biome, &mut rng), Some(EnemyKind::Creeper));
            assert_eq!(resolve_marker('M', biome, &mut rng), Some(EnemyKind::Enderman));
            assert_eq!(resolve_marker('^', biome, &mut rng), Some(EnemyKind::Ghast));
            assert_eq!(resolve_marker('B', biome, &mut rng), Some(EnemyKind::Boss));
        }
        assert_eq!(resolve_marker('.', Biome::Plains, &mut rng), None);
    }

    #[test]
    fn test_generic_markers_stay_in_table() {
        let mut rng = rng();
        for biome in Biome::ALL {
            for marker in GENERIC_MARKERS {
                let table = marker_table(biome, marker);
                for _ in 0..50 {
                    let kind = resolve_marker(marker, biome, &mut rng).unwrap();
                    assert!(table.iter().any(|(k, _)| *k == kind), "{biome:?} {marker}");
                }
            }
        }
    }

    #[test]
    fn test_nether_flyers_use_both_kinds() {
        let mut rng = rng();
        let kinds: Vec<_> = (0..200)
            .filter_map(|_| resolve_marker('f', Biome::Nether, &mut rng))
            .collect();
        assert!(kinds.contains(&EnemyKind::Ghast));
        assert!(kinds.contains(&EnemyKind::Blaze));
    }

    #[test]
    fn test_spawned_enemy_setup() {
        let rows = ["....s", "GGGGG"];
        let level = parse_level(&rows, Biome::Desert, &mut rng());
        let e = &level.enemies[0];
        assert_eq!(e.kind, EnemyKind::Skeleton);
        assert_eq!(e.vel.x.abs(), e.config().speed);
        assert!((100..=200).contains(&e.attack_cooldown));
    }

    #[test]
    fn test_short_or_empty_input_falls_back() {
        let short = ["GGG", "GGG"];
        let level = load_or_default(&short, Biome::Plains, &mut rng());
        assert_eq!(level.map_width, 80.0 * TILE_SIZE);

        let empty = [".....", ".....", ".....", ".....", "....."];
        let level = load_or_default(&empty, Biome::Plains, &mut rng());
        assert_eq!(level.map_width, 80.0 * TILE_SIZE);
    }

    #[test]
    fn test_removable_set_excludes_bedrock_and_portal() {
        let level = default_level(Biome::Plains, &mut rng());
        assert!(
            level
                .removable_blocks()
                .all(|b| b.kind != BlockKind::Bedrock && b.kind != BlockKind::Portal)
        );
    }

    #[test]
    fn test_clean_rows() {
        let raw = "```text\n  GGG  \n\n...\n```\n";
        assert_eq!(clean_rows(raw), vec!["GGG".to_string(), "...".to_string()]);
    }
}
