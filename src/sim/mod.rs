//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per frame, counted in ticks
//! - Seeded RNG only
//! - Entities reference each other by id, never by pointer
//! - No rendering or platform dependencies

pub mod behavior;
pub mod collision;
pub mod combat;
pub mod mobs;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Axis, TileContact, resolve_axis};
pub use mobs::{Behavior, EnemyKind, MobConfig, ProjectileKind, SpeedRule};
pub use physics::TileTrigger;
pub use state::{
    Block, BlockKind, Camera, Enemy, GameEvent, GamePhase, GameState, LevelData, Owner, Particle,
    Player, Projectile, SoundCue,
};
pub use tick::{TickInput, tick};
