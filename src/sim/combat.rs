//! Combat: shooting, target acquisition, digging, projectile resolution,
//! explosions and damage.
//!
//! Projectiles hold their homing target as an enemy id. The id is looked up
//! again every tick; if the enemy is gone the projectile keeps flying
//! straight.

use glam::Vec2;
use rand::Rng;

use super::collision::near;
use super::mobs::ProjectileKind;
use super::state::{GamePhase, GameState, Owner, Particle, Projectile, SoundCue};
use crate::consts::*;
use crate::{rect_center, rect_intersect};

const DIG_PARTICLE_COLOR: u32 = 0x888888;
const HIT_PARTICLE_COLOR: u32 = 0xFF0000;
const PUFF_PARTICLE_COLOR: u32 = 0xAAAAAA;
const BLAST_PARTICLE_COLOR: u32 = 0xF97316;

/// Spawn a burst of particles with random velocities
pub fn spawn_particles(state: &mut GameState, pos: Vec2, color: u32, count: usize) {
    let room = MAX_PARTICLES.saturating_sub(state.level.particles.len());
    for _ in 0..count.min(room) {
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 5.0,
            (state.rng.random::<f32>() - 0.5) * 5.0,
        );
        state.level.particles.push(Particle {
            pos,
            vel,
            size: PARTICLE_SIZE,
            color,
            life_ticks: PARTICLE_LIFETIME,
        });
    }
}

/// Damage the player. Flying grants full immunity.
pub fn damage_player(state: &mut GameState, amount: i32) {
    if state.player.flying || state.player.dead {
        return;
    }
    state.player.health -= amount;
    state.sound(SoundCue::Hurt);
    if state.player.health <= 0 {
        kill_player(state);
    }
}

/// Kill the player and start the game-over countdown. No-op when already dead.
pub fn kill_player(state: &mut GameState) {
    if !state.player.kill() {
        return;
    }
    log::info!("Player died at x={:.0} (score {})", state.player.pos.x, state.score);
    state.sound(SoundCue::Explode);
    let center = state.player.center();
    spawn_particles(state, center, HIT_PARTICLE_COLOR, 16);
    if state.phase == GamePhase::Playing {
        state.phase = GamePhase::Dying {
            ticks_left: GAME_OVER_DELAY_TICKS,
        };
    }
}

/// Pick the homing target for a player shot
///
/// Candidates are live enemies inside the camera viewport, scored by
/// distance from the player with bonuses for bosses and for being in front.
/// Lowest score wins.
pub fn acquire_target(state: &GameState) -> Option<u32> {
    let origin = state.player.center();
    let facing_right = state.player.facing_right;

    state
        .level
        .enemies
        .iter()
        .filter(|e| !e.dead && state.camera.contains(e.pos, e.size))
        .map(|e| {
            let center = e.center();
            let mut score = origin.distance(center);
            if e.is_boss() {
                score += BOSS_TARGET_BONUS;
            }
            let ahead = if facing_right {
                center.x >= origin.x
            } else {
                center.x <= origin.x
            };
            if ahead {
                score += FACING_TARGET_BONUS;
            }
            (e.id, score)
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}

/// Fire the player's loadout projectile, homing if a target is in view
pub fn fire_player_shot(state: &mut GameState) {
    let kind = state.character.projectile();
    let size = Vec2::splat(kind.size());
    let p = &state.player;
    let facing = if p.facing_right { 1.0 } else { -1.0 };
    let pos = Vec2::new(
        if p.facing_right { p.pos.x + p.size.x } else { p.pos.x },
        p.pos.y + p.size.y / 2.0,
    );

    let target = acquire_target(state);
    let homing_vel = target
        .and_then(|id| state.level.live_enemy(id))
        .map(|enemy| (enemy.center() - rect_center(pos, size)).normalize_or_zero() * PROJECTILE_SPEED)
        .filter(|v| *v != Vec2::ZERO);

    let (vel, target_id) = match homing_vel {
        Some(vel) => (vel, target),
        None => {
            let (vx, vy) = kind.launch_velocity(facing * PROJECTILE_SPEED, 0.0);
            (Vec2::new(vx, vy), None)
        }
    };

    let id = state.level.next_entity_id();
    state.level.projectiles.push(Projectile {
        id,
        kind,
        owner: Owner::Player,
        pos,
        vel,
        size,
        life_ticks: kind.lifetime(),
        target_id,
        ignore_gravity: target_id.is_some(),
        dead: false,
    });
    state.player.pose_ticks = SHOT_POSE_TICKS;
    state.sound(SoundCue::Shoot);
}

/// Fire an enemy's projectile, aimed once at the player's current position
pub fn fire_enemy_shot(state: &mut GameState, enemy_idx: usize, kind: ProjectileKind) {
    let Some(enemy) = state.level.enemies.get(enemy_idx) else {
        return;
    };
    let size = Vec2::splat(kind.size());
    let target = state.player.center();
    let facing_right = target.x >= enemy.center().x;
    let pos = Vec2::new(
        if facing_right { enemy.pos.x + enemy.size.x } else { enemy.pos.x },
        enemy.pos.y + enemy.size.y / 2.0,
    );

    let mut dir = (target - rect_center(pos, size)).normalize_or_zero();
    if dir == Vec2::ZERO {
        dir = if facing_right { Vec2::X } else { Vec2::NEG_X };
    }
    let aimed = dir * PROJECTILE_SPEED * ENEMY_SHOT_SPEED_FACTOR;
    let (vx, vy) = kind.launch_velocity(aimed.x, aimed.y);

    let id = state.level.next_entity_id();
    state.level.projectiles.push(Projectile {
        id,
        kind,
        owner: Owner::Enemy,
        pos,
        vel: Vec2::new(vx, vy),
        size,
        life_ticks: kind.lifetime(),
        target_id: None,
        ignore_gravity: false,
        dead: false,
    });
}

/// Dig out the block in front of the player at chest height
pub fn dig(state: &mut GameState) {
    let p = &mut state.player;
    p.pose_ticks = DIG_POSE_TICKS;
    p.attack_cooldown = DIG_COOLDOWN;

    let reach_x = p.pos.x + if p.facing_right { p.size.x + 10.0 } else { -10.0 };
    let reach_y = p.pos.y + p.size.y / 2.0;
    let col = (reach_x / TILE_SIZE).floor() as i32;
    let row = (reach_y / TILE_SIZE).floor() as i32;

    let Some(idx) = state.level.block_index_at(col, row) else {
        return;
    };
    if !state.level.blocks[idx].is_removable() {
        return;
    }
    let block = state.level.blocks.remove(idx);
    state.emit(super::state::GameEvent::BlockRemoved {
        col: block.col,
        row: block.row,
    });
    spawn_particles(state, block.center(), DIG_PARTICLE_COLOR, 8);
    state.sound(SoundCue::Dig);
}

/// Blow up terrain around a point
///
/// Removes every removable block whose centre is closer than `BLAST_RADIUS`.
/// Candidates are prefiltered by grid distance first.
pub fn explode(state: &mut GameState, center: Vec2) {
    let reach = (BLAST_RADIUS / TILE_SIZE).ceil() as i32;
    let center_col = (center.x / TILE_SIZE).floor() as i32;
    let center_row = (center.y / TILE_SIZE).floor() as i32;

    let mut removed = Vec::new();
    state.level.blocks.retain(|b| {
        let in_grid = (b.col - center_col).abs() <= reach && (b.row - center_row).abs() <= reach;
        if in_grid && b.is_removable() && b.center().distance(center) < BLAST_RADIUS {
            removed.push(*b);
            false
        } else {
            true
        }
    });

    log::debug!("Explosion at {:?} removed {} blocks", center, removed.len());
    for block in &removed {
        state.emit(super::state::GameEvent::BlockRemoved {
            col: block.col,
            row: block.row,
        });
        spawn_particles(state, block.center(), block.kind.color(), 2);
    }
    spawn_particles(state, center, BLAST_PARTICLE_COLOR, 20);
    state.sound(SoundCue::Explode);
}

/// Deferred outcomes of the projectile pass
#[derive(Default)]
struct ProjectileOutcome {
    player_hits: Vec<f32>,
    kills: Vec<(Vec2, bool)>,
    puffs: Vec<(Vec2, u32)>,
    explosions: Vec<Vec2>,
}

/// Move by velocity; lobbed shots fall at half gravity unless homing
fn advance(proj: &mut Projectile) {
    proj.pos += proj.vel;
    if proj.kind.is_lobbed() && !proj.ignore_gravity {
        proj.vel.y += GRAVITY * 0.5;
    }
}

/// Tick the lifetime down and check the despawn window around the camera
fn expired(proj: &mut Projectile, camera_x: f32) -> bool {
    if let Some(life) = proj.life_ticks.as_mut() {
        *life = life.saturating_sub(1);
        if *life == 0 {
            return true;
        }
    }
    proj.pos.x < camera_x - PROJECTILE_WINDOW_MARGIN
        || proj.pos.x > camera_x + VIEWPORT_WIDTH + PROJECTILE_WINDOW_MARGIN
        || proj.pos.y > VIEWPORT_HEIGHT
        || proj.pos.y + proj.size.y < CEILING_Y - PROJECTILE_WINDOW_MARGIN
}

/// Move projectiles without resolving any hits
///
/// Used while the player is dying: shots keep flying for the effect but
/// can no longer damage, kill or score.
pub fn drift_projectiles(state: &mut GameState) {
    let camera_x = state.camera.x;
    for proj in state.level.projectiles.iter_mut().filter(|p| !p.dead) {
        advance(proj);
        if expired(proj, camera_x) {
            proj.dead = true;
        }
    }
}

/// Advance every projectile one tick and resolve hits
pub fn update_projectiles(state: &mut GameState) {
    let mut out = ProjectileOutcome::default();
    let camera_x = state.camera.x;
    let player = &state.player;
    let level = &mut state.level;
    let blocks = &level.blocks;
    let enemies = &mut level.enemies;

    for proj in level.projectiles.iter_mut() {
        if proj.dead {
            continue;
        }

        // Re-aim at the target's current centre, or drop a stale target
        if let Some(target_id) = proj.target_id {
            match enemies.iter().find(|e| e.id == target_id && !e.dead) {
                Some(target) => {
                    let dir = (target.center() - proj.center()).normalize_or_zero();
                    if dir != Vec2::ZERO {
                        proj.vel = dir * PROJECTILE_SPEED;
                    }
                }
                None => proj.target_id = None,
            }
        }

        advance(proj);

        let hit_terrain = blocks
            .iter()
            .any(|b| b.is_solid() && near(b, proj.pos) && rect_intersect(proj.pos, proj.size, b.pos(), b.size()));
        if hit_terrain {
            proj.dead = true;
            if proj.kind.is_explosive() {
                out.explosions.push(proj.center());
            } else {
                out.puffs.push((proj.center(), PUFF_PARTICLE_COLOR));
            }
            continue;
        }

        match proj.owner {
            Owner::Enemy => {
                if !player.dead && rect_intersect(proj.pos, proj.size, player.pos, player.size) {
                    proj.dead = true;
                    out.player_hits.push(proj.vel.x.signum());
                }
            }
            Owner::Player => {
                for enemy in enemies.iter_mut() {
                    if enemy.dead || !rect_intersect(proj.pos, proj.size, enemy.pos, enemy.size) {
                        continue;
                    }
                    proj.dead = true;
                    out.puffs.push((enemy.center(), HIT_PARTICLE_COLOR));
                    if enemy.apply_damage(1) {
                        out.kills.push((enemy.center(), enemy.is_boss()));
                    } else {
                        let dir = if proj.vel.x > 0.0 { 1.0 } else { -1.0 };
                        enemy.vel = Vec2::new(dir * HIT_KNOCKBACK_X, HIT_KNOCKBACK_Y);
                    }
                    if proj.kind.is_explosive() {
                        out.explosions.push(proj.center());
                    }
                    break;
                }
            }
        }
        if proj.dead {
            continue;
        }

        if expired(proj, camera_x) {
            proj.dead = true;
        }
    }

    for dir in out.player_hits {
        damage_player(state, 1);
        if !state.player.dead {
            state.player.vel.x = dir * HIT_KNOCKBACK_X;
        }
    }
    for (pos, is_boss) in out.kills {
        let points = if is_boss { BOSS_KILL_SCORE } else { KILL_SCORE };
        log::debug!("Enemy killed at {:?} (+{})", pos, points);
        state.add_score(points);
        state.sound(SoundCue::Explode);
        spawn_particles(state, pos, HIT_PARTICLE_COLOR, 10);
    }
    for (pos, color) in out.puffs {
        spawn_particles(state, pos, color, 3);
    }
    for pos in out.explosions {
        explode(state, pos);
    }
}
