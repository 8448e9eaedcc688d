//! Game state and core simulation types
//!
//! Everything the frame step reads or writes lives here. Entities reference
//! each other only by id; a lookup that finds nothing means the other side
//! is gone.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::mobs::{EnemyKind, MobConfig, ProjectileKind};
use crate::consts::*;
use crate::settings::{Biome, Character, Settings};
use crate::rect_center;

/// Terrain materials and special tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Grass,
    Dirt,
    Stone,
    Sand,
    Sandstone,
    Snow,
    Ice,
    Netherrack,
    EndStone,
    Obsidian,
    Bedrock,
    Lava,
    Portal,
}

impl BlockKind {
    /// Lava and portals don't block movement
    pub fn is_solid(&self) -> bool {
        !matches!(self, BlockKind::Lava | BlockKind::Portal)
    }

    /// Bedrock and portals survive digging and explosions
    pub fn is_removable(&self) -> bool {
        !matches!(self, BlockKind::Bedrock | BlockKind::Portal)
    }

    /// Fill colour for the renderer (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            BlockKind::Grass => 0x4ADE80,
            BlockKind::Dirt => 0x5C4033,
            BlockKind::Stone => 0x78716C,
            BlockKind::Sand => 0xF6D7B0,
            BlockKind::Sandstone => 0xE6C288,
            BlockKind::Snow => 0xFFFFFF,
            BlockKind::Ice => 0xA5F2F3,
            BlockKind::Netherrack => 0x6F3637,
            BlockKind::EndStone => 0xDFE0A8,
            BlockKind::Obsidian => 0x141019,
            BlockKind::Bedrock => 0x292524,
            BlockKind::Lava => 0xCF222E,
            BlockKind::Portal => 0x110011,
        }
    }
}

/// A terrain tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub col: i32,
    pub row: i32,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(col: i32, row: i32, kind: BlockKind) -> Self {
        Self { col, row, kind }
    }

    /// Top-left corner in pixels
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.col as f32 * TILE_SIZE, self.row as f32 * TILE_SIZE)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::splat(TILE_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        rect_center(self.pos(), self.size())
    }

    pub fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }

    pub fn is_removable(&self) -> bool {
        self.kind.is_removable()
    }
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub dead: bool,
    pub facing_right: bool,
    pub health: i32,
    pub max_health: i32,
    /// Ticks until the next attack or dig is allowed
    pub attack_cooldown: u32,
    /// Ticks left on the attack/dig pose
    pub pose_ticks: u32,
    /// Free flight: no gravity, no damage, no lava
    pub flying: bool,
}

impl Player {
    pub fn new(spawn: Vec2, max_health: i32) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            grounded: false,
            dead: false,
            facing_right: true,
            health: max_health,
            max_health,
            attack_cooldown: 0,
            pose_ticks: 0,
            flying: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        rect_center(self.pos, self.size)
    }

    pub fn is_attacking(&self) -> bool {
        self.pose_ticks > 0
    }

    /// Mark dead. Returns false if the player was already dead.
    pub fn kill(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        self.vel = Vec2::ZERO;
        true
    }
}

/// An enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    pub dead: bool,
    /// Ticks until the next ranged shot
    pub attack_cooldown: u32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2) -> Self {
        let config = kind.config();
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(config.width, config.height),
            hp: config.hp,
            max_hp: config.hp,
            dead: false,
            attack_cooldown: ENEMY_FIRE_COOLDOWN,
        }
    }

    pub fn config(&self) -> MobConfig {
        self.kind.config()
    }

    pub fn center(&self) -> Vec2 {
        rect_center(self.pos, self.size)
    }

    pub fn is_boss(&self) -> bool {
        self.kind.is_boss()
    }

    /// Apply damage. Returns true only on the hit that kills.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if self.dead {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0 {
            return self.kill();
        }
        false
    }

    /// Mark dead. Returns false if already dead.
    pub fn kill(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        true
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub owner: Owner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Remaining ticks for timed subtypes
    pub life_ticks: Option<u32>,
    /// Homing target, looked up by id every tick
    pub target_id: Option<u32>,
    /// Set on homing shots
    pub ignore_gravity: bool,
    pub dead: bool,
}

impl Projectile {
    pub fn center(&self) -> Vec2 {
        rect_center(self.pos, self.size)
    }
}

/// A cosmetic particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: u32,
    pub life_ticks: u32,
}

/// Side-scrolling camera (left edge of the viewport)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    pub fn contains(&self, pos: Vec2, size: Vec2) -> bool {
        pos.x + size.x >= self.x
            && pos.x <= self.x + VIEWPORT_WIDTH
            && pos.y + size.y >= 0.0
            && pos.y <= VIEWPORT_HEIGHT
    }
}

/// Everything the parser produces plus the live entity sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub blocks: Vec<Block>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub spawn: Vec2,
    pub biome: Biome,
    pub map_width: f32,
    pub map_height: f32,
    next_id: u32,
}

impl LevelData {
    pub fn new(biome: Biome) -> Self {
        Self {
            blocks: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            spawn: Vec2::new(SPAWN_X, SPAWN_Y),
            biome,
            map_width: 0.0,
            map_height: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Live enemy by id (dead or removed enemies are not found)
    pub fn live_enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id && !e.dead)
    }

    pub fn has_live_boss(&self) -> bool {
        self.enemies.iter().any(|e| e.is_boss() && !e.dead)
    }

    pub fn live_boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss() && !e.dead)
    }

    /// Index of the block occupying a grid cell
    pub fn block_index_at(&self, col: i32, row: i32) -> Option<usize> {
        self.blocks.iter().position(|b| b.col == col && b.row == row)
    }

    /// Blocks that digging and explosions may remove
    pub fn removable_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_removable())
    }

    /// Drop entities that died this frame
    pub fn sweep_dead(&mut self) {
        self.enemies.retain(|e| !e.dead);
        self.projectiles.retain(|p| !p.dead);
        self.particles.retain(|p| p.life_ticks > 0);
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player died; counting down to the game-over notification
    Dying { ticks_left: u32 },
    /// Run ended in defeat
    GameOver,
    /// Player entered the open portal
    Won,
}

/// Effect cues for an external audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    Shoot,
    Dig,
    Hurt,
    Explode,
    Win,
}

/// Notifications for the host, drained after every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreDelta(u64),
    GameOver,
    Win { score: u64 },
    BossEncounter,
    BlockRemoved { col: i32, row: i32 },
    Sound(SoundCue),
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub level: LevelData,
    pub player: Player,
    pub camera: Camera,
    pub phase: GamePhase,
    pub character: Character,
    pub score: u64,
    /// Boss is within its activation radius (drives the boss health bar)
    pub boss_active: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub rng: Pcg32,
    boss_announced: bool,
}

impl GameState {
    /// Start a run on a freshly parsed level
    pub fn new(level: LevelData, settings: &Settings, seed: u64) -> Self {
        let player = Player::new(level.spawn, settings.max_health());
        Self {
            level,
            player,
            camera: Camera::default(),
            phase: GamePhase::Playing,
            character: settings.character,
            score: 0,
            boss_active: false,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            boss_announced: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score += amount;
        self.emit(GameEvent::ScoreDelta(amount));
    }

    /// Flag the boss bar; the encounter event fires only the first time
    pub fn activate_boss(&mut self) {
        self.boss_active = true;
        if !self.boss_announced {
            self.boss_announced = true;
            self.emit(GameEvent::BossEncounter);
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
