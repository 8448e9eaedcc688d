//! Static enemy and projectile tables
//!
//! Every enemy kind maps to one `MobConfig` row. Adding an enemy is a data
//! change here plus a marker table entry; the behavior dispatcher only looks
//! at `MobConfig::behavior`.

use serde::{Deserialize, Serialize};

use crate::consts::BOSS_HP;

/// Movement mode shared by groups of enemy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Walk,
    Fly,
    Jump,
    Teleport,
    Boss,
}

/// Conditional speed rules for walkers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeedRule {
    Constant,
    /// Multiplier while roughly level with the player and within `range`
    Charge { range: f32, multiplier: f32 },
    /// Always faster than the base speed
    Fast { multiplier: f32 },
    /// Fliers: drop faster onto the player when above and within `range`
    Dive { range: f32, multiplier: f32 },
}

/// Concrete enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Zombie,
    Spider,
    Pillager,
    Drowned,
    Skeleton,
    Witch,
    Slime,
    Creeper,
    Phantom,
    Ghast,
    Blaze,
    WitherSkeleton,
    Pigman,
    Enderman,
    Warden,
    Boss,
}

/// Per-kind static configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobConfig {
    pub width: f32,
    pub height: f32,
    pub hp: i32,
    /// Horizontal speed for walkers, easing strength scale for fliers
    pub speed: f32,
    pub color: &'static str,
    pub projectile: Option<ProjectileKind>,
    pub behavior: Behavior,
    pub speed_rule: SpeedRule,
}

const fn mob(
    width: f32,
    height: f32,
    hp: i32,
    speed: f32,
    color: &'static str,
    projectile: Option<ProjectileKind>,
    behavior: Behavior,
) -> MobConfig {
    MobConfig {
        width,
        height,
        hp,
        speed,
        color,
        projectile,
        behavior,
        speed_rule: SpeedRule::Constant,
    }
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 16] = [
        EnemyKind::Zombie,
        EnemyKind::Spider,
        EnemyKind::Pillager,
        EnemyKind::Drowned,
        EnemyKind::Skeleton,
        EnemyKind::Witch,
        EnemyKind::Slime,
        EnemyKind::Creeper,
        EnemyKind::Phantom,
        EnemyKind::Ghast,
        EnemyKind::Blaze,
        EnemyKind::WitherSkeleton,
        EnemyKind::Pigman,
        EnemyKind::Enderman,
        EnemyKind::Warden,
        EnemyKind::Boss,
    ];

    pub fn config(&self) -> MobConfig {
        use Behavior::*;
        use ProjectileKind as P;

        match self {
            EnemyKind::Zombie => mob(24.0, 30.0, 3, 1.0, "#3D6836", None, Walk),
            EnemyKind::Spider => MobConfig {
                speed_rule: SpeedRule::Charge {
                    range: 120.0,
                    multiplier: 2.0,
                },
                ..mob(30.0, 16.0, 2, 1.5, "#2D2424", None, Walk)
            },
            EnemyKind::Pillager => mob(24.0, 30.0, 3, 0.8, "#5A5A5A", Some(P::Arrow), Walk),
            EnemyKind::Drowned => mob(24.0, 30.0, 3, 1.0, "#4A8F8C", Some(P::Trident), Walk),
            EnemyKind::Skeleton => mob(24.0, 30.0, 3, 0.8, "#B0B0B0", Some(P::Arrow), Walk),
            EnemyKind::Witch => mob(24.0, 32.0, 4, 0.6, "#3B2D5A", Some(P::Potion), Walk),
            EnemyKind::Slime => mob(24.0, 24.0, 3, 3.0, "#7CCB5B", None, Jump),
            EnemyKind::Creeper => mob(24.0, 30.0, 2, 1.2, "#00AA00", None, Walk),
            EnemyKind::Phantom => MobConfig {
                speed_rule: SpeedRule::Dive {
                    range: 150.0,
                    multiplier: 3.0,
                },
                ..mob(32.0, 16.0, 2, 1.5, "#43518A", None, Fly)
            },
            EnemyKind::Ghast => mob(48.0, 48.0, 5, 1.0, "#F0F0F0", Some(P::Fireball), Fly),
            EnemyKind::Blaze => mob(24.0, 32.0, 4, 1.2, "#FFD700", Some(P::Fireball), Fly),
            EnemyKind::WitherSkeleton => MobConfig {
                speed_rule: SpeedRule::Fast { multiplier: 1.5 },
                ..mob(24.0, 36.0, 5, 1.0, "#1A1A1A", None, Walk)
            },
            EnemyKind::Pigman => mob(24.0, 30.0, 4, 1.0, "#EA9898", None, Walk),
            EnemyKind::Enderman => mob(20.0, 44.0, 5, 0.0, "#111111", None, Teleport),
            EnemyKind::Warden => mob(32.0, 44.0, 12, 0.7, "#0F3A47", Some(P::SonicBoom), Walk),
            EnemyKind::Boss => mob(100.0, 60.0, BOSS_HP, 1.0, "#111111", Some(P::Fireball), Boss),
        }
    }

    pub fn is_boss(&self) -> bool {
        self.config().behavior == Behavior::Boss
    }
}

/// Projectile subtypes (cosmetic + ballistic behavior)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Arrow,
    Trident,
    Fireball,
    Snowball,
    Potion,
    Tnt,
    Egg,
    SonicBoom,
}

impl ProjectileKind {
    /// Lobbed subtypes take half gravity unless gravity-exempt
    pub fn is_lobbed(&self) -> bool {
        matches!(
            self,
            ProjectileKind::Tnt | ProjectileKind::Potion | ProjectileKind::Snowball | ProjectileKind::Egg
        )
    }

    /// Explosive subtypes detonate on impact
    pub fn is_explosive(&self) -> bool {
        matches!(self, ProjectileKind::Tnt | ProjectileKind::Fireball)
    }

    /// Adjust a straight-line launch velocity for this subtype
    pub fn launch_velocity(&self, vx: f32, vy: f32) -> (f32, f32) {
        match self {
            ProjectileKind::Tnt => (vx * 0.6, -5.0),
            ProjectileKind::Potion => (vx * 0.7, -4.0),
            ProjectileKind::Trident => (vx * 1.2, vy),
            ProjectileKind::Egg => (vx, -2.0),
            _ => (vx, vy),
        }
    }

    /// Box edge in pixels
    pub fn size(&self) -> f32 {
        match self {
            ProjectileKind::SonicBoom => 16.0,
            _ => crate::consts::PROJECTILE_SIZE,
        }
    }

    /// Ticks before despawn, if timed
    pub fn lifetime(&self) -> Option<u32> {
        match self {
            ProjectileKind::SonicBoom => Some(30),
            _ => None,
        }
    }
}
