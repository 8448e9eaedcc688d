//! Craft Runner - a block-world side-scrolling action platformer
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, combat, enemy behavior, game state)
//! - `level`: Level grid parsing, procedural generation and level sources
//! - `session`: Host-facing session (input snapshot, level install, callbacks)
//! - `platform`: Browser key codes to logical actions
//! - `settings`: Difficulty, biome and character loadout

pub mod level;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use platform::Action;
pub use session::{GameCallbacks, Session};
pub use settings::{Biome, Character, Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Tile edge in pixels
    pub const TILE_SIZE: f32 = 32.0;
    /// Rows in every generated level
    pub const WORLD_HEIGHT_TILES: usize = 15;
    /// Columns per unit of length multiplier
    pub const BASE_LEVEL_WIDTH: usize = 150;

    /// Camera viewport
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 480.0;
    /// Camera easing factor per tick
    pub const CAMERA_DAMPING: f32 = 0.1;

    /// Movement (pixels per tick)
    pub const GRAVITY: f32 = 0.35;
    pub const JUMP_FORCE: f32 = -11.5;
    pub const MOVE_SPEED: f32 = 5.0;
    pub const MOVE_ACCEL: f32 = 0.5;
    pub const FRICTION: f32 = 0.85;

    /// Player box and spawn
    pub const PLAYER_WIDTH: f32 = 24.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const SPAWN_X: f32 = 50.0;
    pub const SPAWN_Y: f32 = 100.0;

    /// Broad-phase cull distance for tile collision
    pub const COLLISION_RADIUS: f32 = 150.0;
    /// Falling below this y kills the player
    pub const VOID_FALL_Y: f32 = VIEWPORT_HEIGHT + 100.0;
    /// The player can't rise above this y
    pub const CEILING_Y: f32 = -100.0;

    /// Combat timing (ticks)
    pub const ATTACK_COOLDOWN: u32 = 5;
    pub const DIG_COOLDOWN: u32 = 15;
    pub const SHOT_POSE_TICKS: u32 = 6;
    pub const DIG_POSE_TICKS: u32 = 12;
    /// Delay between death and the game-over notification
    pub const GAME_OVER_DELAY_TICKS: u32 = 60;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 8.0;
    pub const ENEMY_SHOT_SPEED_FACTOR: f32 = 0.6;
    pub const PROJECTILE_SIZE: f32 = 8.0;
    /// Extra distance outside the camera window before projectiles despawn
    pub const PROJECTILE_WINDOW_MARGIN: f32 = 100.0;
    pub const BLAST_RADIUS: f32 = TILE_SIZE * 2.5;

    /// Target acquisition bonuses (lower score wins)
    pub const BOSS_TARGET_BONUS: f32 = -500.0;
    pub const FACING_TARGET_BONUS: f32 = -200.0;

    /// Enemies
    pub const BOSS_HP: i32 = 20;
    pub const ENEMY_FIRE_COOLDOWN: u32 = 150;
    pub const ENEMY_ATTACK_RANGE: f32 = 400.0;
    /// Enemies further than this outside the camera window stay dormant
    pub const ENEMY_ACTIVE_MARGIN: f32 = 200.0;
    pub const CONTACT_KNOCKBACK_X: f32 = 8.0;
    pub const CONTACT_KNOCKBACK_Y: f32 = -5.0;
    pub const HIT_KNOCKBACK_X: f32 = 3.0;
    pub const HIT_KNOCKBACK_Y: f32 = -2.0;

    /// Enemy behavior tuning
    pub const WALK_AGGRO_RANGE: f32 = 400.0;
    pub const FLY_AGGRO_RANGE: f32 = 500.0;
    pub const BOSS_AGGRO_RANGE: f32 = 800.0;
    pub const TELEPORT_RANGE: f32 = 200.0;
    pub const TELEPORT_OFFSET: f32 = 100.0;
    pub const TELEPORT_CHANCE: f64 = 0.02;
    pub const JUMP_CHANCE: f64 = 0.05;
    pub const MOB_JUMP_FORCE: f32 = -8.0;
    pub const MOB_JUMP_SPEED: f32 = 3.0;
    /// Fraction of the remaining distance a flier closes per tick
    pub const FLY_EASING: f32 = 0.02;
    pub const FLY_MAX_SPEED: f32 = 4.0;

    /// Scoring
    pub const KILL_SCORE: u64 = 100;
    pub const BOSS_KILL_SCORE: u64 = KILL_SCORE * 20;

    /// Particles
    pub const PARTICLE_LIFETIME: u32 = 30;
    pub const PARTICLE_SIZE: f32 = 4.0;
    pub const MAX_PARTICLES: usize = 512;
}

/// Axis-aligned rectangle overlap (strict, touching edges don't overlap)
#[inline]
pub fn rect_intersect(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    b_pos.x < a_pos.x + a_size.x
        && b_pos.x + b_size.x > a_pos.x
        && b_pos.y < a_pos.y + a_size.y
        && b_pos.y + b_size.y > a_pos.y
}

/// Center of a rectangle given its top-left corner and size
#[inline]
pub fn rect_center(pos: Vec2, size: Vec2) -> Vec2 {
    pos + size * 0.5
}
