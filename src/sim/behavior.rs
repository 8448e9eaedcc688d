//! Enemy behavior dispatcher
//!
//! One function per `Behavior` mode. Every awake enemy also gets the shared
//! ranged-attack and contact-damage passes regardless of its mode.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{Axis, resolve_axis};
use super::combat::{damage_player, fire_enemy_shot, spawn_particles};
use super::mobs::{Behavior, MobConfig, SpeedRule};
use super::state::{Block, Camera, Enemy, GameState};
use crate::consts::*;
use crate::rect_intersect;

const TELEPORT_PARTICLE_COLOR: u32 = 0xCC00FA;
/// Vertical slack for walkers to count as level with the player
const CHARGE_ALIGN_TOLERANCE: f32 = 20.0;

/// What a behavior function asks the dispatcher to do afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    None,
    Teleported,
    BossActive,
}

/// Read-only view of the world an enemy reacts to
struct Surroundings<'a> {
    player_pos: Vec2,
    blocks: &'a [Block],
    time_secs: f32,
}

/// Enemies too far outside the camera window are left untouched
pub fn is_awake(camera: &Camera, enemy: &Enemy) -> bool {
    enemy.pos.x >= camera.x - ENEMY_ACTIVE_MARGIN
        && enemy.pos.x <= camera.x + VIEWPORT_WIDTH + ENEMY_ACTIVE_MARGIN
}

/// Run one tick of behavior, ranged fire and contact damage for every enemy
pub fn update_enemies(state: &mut GameState) {
    state.boss_active = false;
    let time_secs = state.time_ticks as f32 * SIM_DT;

    for idx in 0..state.level.enemies.len() {
        let enemy = &state.level.enemies[idx];
        if enemy.dead || !is_awake(&state.camera, enemy) {
            continue;
        }
        let config = enemy.config();

        let signal = {
            let world = Surroundings {
                player_pos: state.player.pos,
                blocks: &state.level.blocks,
                time_secs,
            };
            let enemy = &mut state.level.enemies[idx];
            match config.behavior {
                Behavior::Walk => walk(enemy, &config, &world),
                Behavior::Fly => fly(enemy, &config, &world),
                Behavior::Jump => jump(enemy, &world, &mut state.rng),
                Behavior::Teleport => teleport(enemy, &world, &mut state.rng),
                Behavior::Boss => boss(enemy, &world),
            }
        };

        match signal {
            Signal::Teleported => {
                let pos = state.level.enemies[idx].pos;
                spawn_particles(state, pos, TELEPORT_PARTICLE_COLOR, 10);
            }
            Signal::BossActive => state.activate_boss(),
            Signal::None => {}
        }

        if let Some(kind) = config.projectile {
            let enemy = &mut state.level.enemies[idx];
            if (state.player.pos.x - enemy.pos.x).abs() < ENEMY_ATTACK_RANGE {
                enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(1);
                if enemy.attack_cooldown == 0 {
                    enemy.attack_cooldown = ENEMY_FIRE_COOLDOWN;
                    fire_enemy_shot(state, idx, kind);
                }
            }
        }

        contact_damage(state, idx);
    }
}

/// Touching an enemy costs one hit and throws the player back
fn contact_damage(state: &mut GameState, idx: usize) {
    let enemy = &state.level.enemies[idx];
    let p = &state.player;
    if p.dead || enemy.dead {
        return;
    }
    let reach = (enemy.size + p.size) * 0.5;
    if (enemy.center() - p.center()).abs().cmpgt(reach).any() {
        return;
    }
    let inset_pos = Vec2::new(p.pos.x + 4.0, p.pos.y);
    let inset_size = Vec2::new(p.size.x - 8.0, p.size.y);
    if !rect_intersect(inset_pos, inset_size, enemy.pos, enemy.size) {
        return;
    }

    let dir = if p.pos.x - enemy.pos.x > 0.0 { 1.0 } else { -1.0 };
    damage_player(state, 1);
    if !state.player.dead {
        state.player.vel = Vec2::new(dir * CONTACT_KNOCKBACK_X, CONTACT_KNOCKBACK_Y);
    }
}

fn walk(enemy: &mut Enemy, config: &MobConfig, world: &Surroundings) -> Signal {
    let dx = world.player_pos.x - enemy.pos.x;
    let dy = world.player_pos.y - enemy.pos.y;

    enemy.vel.y += GRAVITY;
    enemy.vel.x = if dx.abs() < WALK_AGGRO_RANGE {
        let speed = match config.speed_rule {
            SpeedRule::Charge { range, multiplier }
                if dx.abs() < range && dy.abs() < CHARGE_ALIGN_TOLERANCE =>
            {
                config.speed * multiplier
            }
            SpeedRule::Fast { multiplier } => config.speed * multiplier,
            _ => config.speed,
        };
        dx.signum() * speed
    } else {
        0.0
    };

    move_with_collision(enemy, world.blocks);
    Signal::None
}

fn fly(enemy: &mut Enemy, config: &MobConfig, world: &Surroundings) -> Signal {
    let delta = world.player_pos - enemy.pos;
    if delta.x.abs() >= FLY_AGGRO_RANGE {
        enemy.vel = Vec2::ZERO;
        return Signal::None;
    }

    let mut vel = delta * FLY_EASING * config.speed;
    if let SpeedRule::Dive { range, multiplier } = config.speed_rule {
        if delta.y > 0.0 && delta.x.abs() < range {
            vel.y *= multiplier;
        }
    }
    enemy.vel = vel.clamp_length_max(FLY_MAX_SPEED);
    enemy.pos += enemy.vel;
    Signal::None
}

fn jump(enemy: &mut Enemy, world: &Surroundings, rng: &mut Pcg32) -> Signal {
    let dx = world.player_pos.x - enemy.pos.x;

    if enemy.vel.y == 0.0 {
        if rng.random_bool(JUMP_CHANCE) {
            enemy.vel = Vec2::new(dx.signum() * MOB_JUMP_SPEED, MOB_JUMP_FORCE);
        } else {
            enemy.vel.x = 0.0;
        }
    }
    enemy.vel.y += GRAVITY;

    move_with_collision(enemy, world.blocks);
    Signal::None
}

fn teleport(enemy: &mut Enemy, world: &Surroundings, rng: &mut Pcg32) -> Signal {
    enemy.vel.x = 0.0;
    enemy.vel.y += GRAVITY;
    enemy.pos.y += enemy.vel.y;
    resolve_axis(&mut enemy.pos, &mut enemy.vel, enemy.size, world.blocks, Axis::Y, None);

    let dx = world.player_pos.x - enemy.pos.x;
    if dx.abs() < TELEPORT_RANGE && rng.random_bool(TELEPORT_CHANCE) {
        let side = if rng.random_bool(0.5) { TELEPORT_OFFSET } else { -TELEPORT_OFFSET };
        enemy.pos.x = world.player_pos.x + side;
        return Signal::Teleported;
    }
    Signal::None
}

fn boss(enemy: &mut Enemy, world: &Surroundings) -> Signal {
    let dx = world.player_pos.x - enemy.pos.x;
    if dx.abs() >= BOSS_AGGRO_RANGE {
        return Signal::None;
    }

    let ideal_y = 150.0 + world.time_secs.sin() * 80.0;
    let ideal_x = world.player_pos.x + (world.time_secs / 1.5).sin() * 200.0;
    enemy.pos.y += (ideal_y - enemy.pos.y) * 0.05;
    enemy.pos.x += (ideal_x - enemy.pos.x) * 0.03;
    Signal::BossActive
}

fn move_with_collision(enemy: &mut Enemy, blocks: &[Block]) {
    enemy.pos.x += enemy.vel.x;
    resolve_axis(&mut enemy.pos, &mut enemy.vel, enemy.size, blocks, Axis::X, None);
    enemy.pos.y += enemy.vel.y;
    resolve_axis(&mut enemy.pos, &mut enemy.vel, enemy.size, blocks, Axis::Y, None);
}
