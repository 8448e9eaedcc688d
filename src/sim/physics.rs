//! Player movement integration
//!
//! Input accelerates, friction decays, gravity pulls (unless flying), then
//! the box moves axis by axis against the terrain.

use glam::Vec2;

use super::collision::{Axis, overlapping, resolve_axis};
use super::state::{BlockKind, GameState, SoundCue};
use super::tick::TickInput;
use crate::consts::*;
use crate::rect_intersect;

/// Non-solid tile the player is touching after moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileTrigger {
    Lava,
    /// Portal with no live boss left in the level
    OpenPortal,
}

/// Apply one tick of input and physics to the player
pub fn step_player(state: &mut GameState, input: &TickInput) {
    let map_width = state.level.map_width;
    let p = &mut state.player;
    let mut jumped = false;

    if input.left {
        p.vel.x -= MOVE_ACCEL;
        p.facing_right = false;
    }
    if input.right {
        p.vel.x += MOVE_ACCEL;
        p.facing_right = true;
    }

    if p.flying {
        p.vel.x = p.vel.x.clamp(-MOVE_SPEED, MOVE_SPEED) * FRICTION;
        p.vel.y = if input.up || input.jump {
            -MOVE_SPEED
        } else if input.down {
            MOVE_SPEED
        } else {
            0.0
        };
    } else {
        if (input.up || input.jump) && p.grounded {
            p.vel.y = JUMP_FORCE;
            p.grounded = false;
            jumped = true;
        }
        p.vel.x = p.vel.x.clamp(-MOVE_SPEED, MOVE_SPEED) * FRICTION;
        p.vel.y += GRAVITY;
    }

    // Horizontal pass
    p.pos.x += p.vel.x;
    if p.pos.x < 0.0 {
        p.pos.x = 0.0;
        p.vel.x = 0.0;
    }
    if map_width > 0.0 && p.pos.x > map_width - p.size.x {
        p.pos.x = map_width - p.size.x;
        p.vel.x = 0.0;
    }
    resolve_axis(
        &mut p.pos,
        &mut p.vel,
        p.size,
        &state.level.blocks,
        Axis::X,
        Some(p.facing_right),
    );

    // Vertical pass
    p.pos.y += p.vel.y;
    if p.pos.y < CEILING_Y {
        p.pos.y = CEILING_Y;
        p.vel.y = 0.0;
    }
    let contact = resolve_axis(
        &mut p.pos,
        &mut p.vel,
        p.size,
        &state.level.blocks,
        Axis::Y,
        None,
    );
    p.grounded = contact.landed;

    if jumped {
        state.sound(SoundCue::Jump);
    }
}

/// Check lava and portal tiles under the player
///
/// Lava is ignored while flying. A portal stays inert while any boss is
/// alive; it covers a 3x4 tile frame rising from its marker cell.
pub fn check_special_tiles(state: &GameState) -> Option<TileTrigger> {
    let p = &state.player;
    let inset_pos = Vec2::new(p.pos.x + 4.0, p.pos.y);
    let inset_size = Vec2::new(p.size.x - 8.0, p.size.y);

    if !p.flying
        && overlapping(&state.level.blocks, inset_pos, inset_size).any(|b| b.kind == BlockKind::Lava)
    {
        return Some(TileTrigger::Lava);
    }

    let touching_portal = state
        .level
        .blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Portal)
        .any(|b| {
            let frame_pos = b.pos() - Vec2::new(0.0, TILE_SIZE * 3.0);
            let frame_size = Vec2::new(TILE_SIZE * 3.0, TILE_SIZE * 4.0);
            rect_intersect(p.pos, p.size, frame_pos, frame_size)
        });

    if touching_portal && !state.level.has_live_boss() {
        return Some(TileTrigger::OpenPortal);
    }
    None
}
