//! Fixed timestep simulation tick
//!
//! Advances the world by exactly one frame in a fixed order: cooldowns,
//! attack/dig, player physics, special tiles, enemies, projectiles,
//! particles, camera, terminal checks, sweep.

use super::behavior::update_enemies;
use super::combat::{dig, drift_projectiles, fire_player_shot, kill_player, update_projectiles};
use super::physics::{TileTrigger, check_special_tiles, step_player};
use super::state::{GameEvent, GamePhase, GameState, SoundCue};
use crate::consts::*;

/// Input commands for a single tick
///
/// Held keys are sampled once per tick. `toggle_fly` is a one-shot latch
/// the host clears after the tick that consumed it.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub attack: bool,
    pub dig: bool,
    pub toggle_fly: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Playing => {}
        GamePhase::Dying { ticks_left } => {
            // Shots keep flying for the effect but no longer hit anything
            drift_projectiles(state);
            update_particles(state);
            if ticks_left <= 1 {
                state.phase = GamePhase::GameOver;
                state.emit(GameEvent::GameOver);
                log::info!("Game over (score {})", state.score);
            } else {
                state.phase = GamePhase::Dying {
                    ticks_left: ticks_left - 1,
                };
            }
            finish(state);
            return;
        }
        GamePhase::GameOver | GamePhase::Won => return,
    }

    if input.toggle_fly {
        let p = &mut state.player;
        p.flying = !p.flying;
        p.vel.y = 0.0;
        log::debug!("Flying {}", if p.flying { "on" } else { "off" });
    }

    // Cooldowns and pose countdown
    let p = &mut state.player;
    p.attack_cooldown = p.attack_cooldown.saturating_sub(1);
    p.pose_ticks = p.pose_ticks.saturating_sub(1);

    if p.attack_cooldown == 0 {
        if input.attack {
            p.attack_cooldown = ATTACK_COOLDOWN;
            fire_player_shot(state);
        } else if input.dig {
            dig(state);
        }
    }

    step_player(state, input);

    match check_special_tiles(state) {
        Some(TileTrigger::Lava) => kill_player(state),
        Some(TileTrigger::OpenPortal) => {
            state.phase = GamePhase::Won;
            let score = state.score;
            state.sound(SoundCue::Win);
            state.emit(GameEvent::Win { score });
            log::info!("Level complete (score {score})");
            finish(state);
            return;
        }
        None => {}
    }

    update_enemies(state);
    update_projectiles(state);
    update_particles(state);
    update_camera(state);

    if !state.player.dead && state.player.pos.y > VOID_FALL_Y {
        kill_player(state);
    }

    finish(state);
}

/// Ease the camera toward a point a third of the way into the viewport
pub fn update_camera(state: &mut GameState) {
    let target = state.player.pos.x - VIEWPORT_WIDTH / 3.0;
    let camera = &mut state.camera;
    camera.x += (target - camera.x) * CAMERA_DAMPING;
    let max_x = (state.level.map_width - VIEWPORT_WIDTH).max(0.0);
    camera.x = camera.x.clamp(0.0, max_x);
}

fn update_particles(state: &mut GameState) {
    for particle in state.level.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life_ticks = particle.life_ticks.saturating_sub(1);
    }
}

fn finish(state: &mut GameState) {
    state.level.sweep_dead();
    state.time_ticks += 1;
}
