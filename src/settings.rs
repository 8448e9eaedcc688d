//! Session settings chosen before a run
//!
//! Difficulty, biome, character loadout and level length. Handed in by the
//! host (menu screens) and never persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::ProjectileKind;

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Player health cap
    pub fn max_health(&self) -> i32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Normal => 10,
            Difficulty::Hard => 5,
        }
    }

    /// Chance that an interior column becomes a pit
    pub fn pit_chance(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.0,
            Difficulty::Normal => 0.05,
            Difficulty::Hard => 0.08,
        }
    }

    /// Chance that an eligible column gets a ground enemy marker
    pub fn enemy_chance(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.08,
            Difficulty::Normal => 0.15,
            Difficulty::Hard => 0.25,
        }
    }

    /// Chance that a column gets a flying enemy marker
    pub fn flyer_chance(&self) -> f64 {
        match self {
            Difficulty::Hard => 0.05,
            _ => 0.02,
        }
    }

    /// Chance of a floating platform at each platform slot
    pub fn platform_chance(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.35,
            Difficulty::Normal => 0.3,
            Difficulty::Hard => 0.25,
        }
    }
}

/// World theme: block palette, enemy roster and backdrop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Biome {
    #[default]
    Plains,
    Desert,
    Snow,
    Nether,
    TheEnd,
}

impl Biome {
    pub const ALL: [Biome; 5] = [
        Biome::Plains,
        Biome::Desert,
        Biome::Snow,
        Biome::Nether,
        Biome::TheEnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Biome::Plains => "PLAINS",
            Biome::Desert => "DESERT",
            Biome::Snow => "SNOW",
            Biome::Nether => "NETHER",
            Biome::TheEnd => "THE_END",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "plains" => Some(Biome::Plains),
            "desert" => Some(Biome::Desert),
            "snow" => Some(Biome::Snow),
            "nether" => Some(Biome::Nether),
            "the_end" | "end" => Some(Biome::TheEnd),
            _ => None,
        }
    }

    /// Sky colour behind the level
    pub fn background(&self) -> &'static str {
        match self {
            Biome::Nether => "#3B0000",
            Biome::TheEnd => "#14001A",
            _ => "#87CEEB",
        }
    }

    /// The End has no bedrock: the bottom row is open void
    pub fn has_bedrock_floor(&self) -> bool {
        *self != Biome::TheEnd
    }
}

/// Playable character. Only the projectile subtype affects gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Character {
    #[default]
    Steve,
    Alex,
    Zombie,
    Skeleton,
    Creeper,
    Enderman,
    Villager,
    Pigman,
    Herobrine,
    Blaze,
    Dinnerbone,
}

impl Character {
    pub fn as_str(&self) -> &'static str {
        match self {
            Character::Steve => "Steve",
            Character::Alex => "Alex",
            Character::Zombie => "Zombie",
            Character::Skeleton => "Skeleton",
            Character::Creeper => "Creeper",
            Character::Enderman => "Enderman",
            Character::Villager => "Villager",
            Character::Pigman => "Pigman",
            Character::Herobrine => "Herobrine",
            Character::Blaze => "Blaze",
            Character::Dinnerbone => "Dinnerbone",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "steve" => Some(Character::Steve),
            "alex" => Some(Character::Alex),
            "zombie" => Some(Character::Zombie),
            "skeleton" => Some(Character::Skeleton),
            "creeper" => Some(Character::Creeper),
            "enderman" => Some(Character::Enderman),
            "villager" => Some(Character::Villager),
            "pigman" => Some(Character::Pigman),
            "herobrine" => Some(Character::Herobrine),
            "blaze" => Some(Character::Blaze),
            "dinnerbone" => Some(Character::Dinnerbone),
            _ => None,
        }
    }

    /// What this character throws or shoots
    pub fn projectile(&self) -> ProjectileKind {
        match self {
            Character::Steve | Character::Skeleton => ProjectileKind::Arrow,
            Character::Alex => ProjectileKind::Trident,
            Character::Zombie => ProjectileKind::Egg,
            Character::Creeper => ProjectileKind::Tnt,
            Character::Enderman => ProjectileKind::SonicBoom,
            Character::Villager => ProjectileKind::Potion,
            Character::Pigman | Character::Dinnerbone => ProjectileKind::Snowball,
            Character::Herobrine | Character::Blaze => ProjectileKind::Fireball,
        }
    }

    /// Body and leg colours for the renderer
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            Character::Steve
            | Character::Zombie
            | Character::Herobrine
            | Character::Dinnerbone => ("#00AAAA", "#0000AA"),
            Character::Alex => ("#638257", "#4C3322"),
            Character::Skeleton => ("#B0B0B0", "#B0B0B0"),
            Character::Creeper => ("#00AA00", "#000000"),
            Character::Enderman => ("#111111", "#111111"),
            Character::Villager => ("#624133", "#624133"),
            Character::Pigman => ("#E0AA86", "#4C3322"),
            Character::Blaze => ("#FFD700", "#FFA500"),
        }
    }
}

/// Errors from parsing host-supplied settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("length multiplier must be between 1 and {max}, got {got}")]
    LengthMultiplier { got: u32, max: u32 },
}

/// Settings for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub biome: Biome,
    pub character: Character,
    /// Level width in units of 150 columns
    pub length_multiplier: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            biome: Biome::Plains,
            character: Character::Steve,
            length_multiplier: 1,
        }
    }
}

impl Settings {
    /// Upper bound on the length multiplier (keeps generation bounded)
    pub const MAX_LENGTH_MULTIPLIER: u32 = 20;

    pub fn new(difficulty: Difficulty, biome: Biome, character: Character) -> Self {
        Self {
            difficulty,
            biome,
            character,
            length_multiplier: 1,
        }
    }

    pub fn with_length(mut self, length_multiplier: u32) -> Self {
        self.length_multiplier = length_multiplier;
        self
    }

    /// Parse settings sent by the host UI
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.length_multiplier == 0 || self.length_multiplier > Self::MAX_LENGTH_MULTIPLIER {
            return Err(SettingsError::LengthMultiplier {
                got: self.length_multiplier,
                max: Self::MAX_LENGTH_MULTIPLIER,
            });
        }
        Ok(())
    }

    /// Player health cap for this difficulty
    pub fn max_health(&self) -> i32 {
        self.difficulty.max_health()
    }
}
