//! Tile collision detection and response
//!
//! Movement is resolved one axis at a time: move along x, push out of any
//! overlapping solid tile, then the same for y. Only tiles within
//! `COLLISION_RADIUS` of the mover are tested.

use glam::Vec2;

use super::state::Block;
use crate::consts::{COLLISION_RADIUS, TILE_SIZE};
use crate::rect_intersect;

/// Which axis is being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of resolving one axis against the terrain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileContact {
    /// At least one solid tile was overlapped and pushed out of
    pub hit: bool,
    /// Came to rest on top of a tile
    pub landed: bool,
}

/// Coarse broad-phase: is the block close enough to bother testing
#[inline]
pub fn near(block: &Block, pos: Vec2) -> bool {
    let b = block.pos();
    (b.x - pos.x).abs() <= COLLISION_RADIUS && (b.y - pos.y).abs() <= COLLISION_RADIUS
}

/// Blocks overlapping a rectangle (solid or not), after the broad-phase cull
pub fn overlapping<'a>(
    blocks: &'a [Block],
    pos: Vec2,
    size: Vec2,
) -> impl Iterator<Item = &'a Block> + 'a {
    blocks
        .iter()
        .filter(move |b| near(b, pos) && rect_intersect(pos, size, b.pos(), b.size()))
}

/// Push a moving box out of solid tiles along one axis
///
/// The box is snapped flush against the side it approached from and its
/// velocity on that axis is zeroed. With no velocity on the axis,
/// `facing_right` (x) or the box centre (both axes) picks the side.
pub fn resolve_axis(
    pos: &mut Vec2,
    vel: &mut Vec2,
    size: Vec2,
    blocks: &[Block],
    axis: Axis,
    facing_right: Option<bool>,
) -> TileContact {
    let mut contact = TileContact::default();

    let dir = match axis {
        Axis::X => signum_or(vel.x, facing_right.map(|r| if r { 1.0 } else { -1.0 })),
        Axis::Y => signum_or(vel.y, None),
    };

    for block in blocks {
        if !block.is_solid() || !near(block, *pos) {
            continue;
        }
        let b = block.pos();
        if !rect_intersect(*pos, size, b, block.size()) {
            continue;
        }
        contact.hit = true;

        match axis {
            Axis::X => {
                let dir = dir.unwrap_or_else(|| centre_side(pos.x + size.x * 0.5, b.x));
                pos.x = if dir > 0.0 { b.x - size.x } else { b.x + TILE_SIZE };
                vel.x = 0.0;
            }
            Axis::Y => {
                let dir = dir.unwrap_or_else(|| centre_side(pos.y + size.y * 0.5, b.y));
                if dir > 0.0 {
                    pos.y = b.y - size.y;
                    contact.landed = true;
                } else {
                    pos.y = b.y + TILE_SIZE;
                }
                vel.y = 0.0;
            }
        }
    }

    contact
}

fn signum_or(v: f32, fallback: Option<f32>) -> Option<f32> {
    if v > 0.0 {
        Some(1.0)
    } else if v < 0.0 {
        Some(-1.0)
    } else {
        fallback
    }
}

/// +1 if the mover's centre is before the tile's centre (push back), else -1
fn centre_side(mover_centre: f32, tile_start: f32) -> f32 {
    if mover_centre < tile_start + TILE_SIZE * 0.5 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BlockKind;

    fn floor() -> Vec<Block> {
        (0..5).map(|c| Block::new(c, 5, BlockKind::Stone)).collect()
    }

    #[test]
    fn test_land_on_block() {
        let blocks = floor();
        let size = Vec2::new(24.0, 30.0);
        let mut pos = Vec2::new(40.0, 5.0 * TILE_SIZE - 28.0);
        let mut vel = Vec2::new(0.0, 4.0);

        let contact = resolve_axis(&mut pos, &mut vel, size, &blocks, Axis::Y, None);
        assert!(contact.hit && contact.landed);
        assert_eq!(pos.y, 5.0 * TILE_SIZE - size.y);
        assert_eq!(vel.y, 0.0);
        assert!(overlapping(&blocks, pos, size).next().is_none());
    }

    #[test]
    fn test_bump_head() {
        let blocks = floor();
        let size = Vec2::new(24.0, 30.0);
        let mut pos = Vec2::new(40.0, 5.0 * TILE_SIZE + 20.0);
        let mut vel = Vec2::new(0.0, -6.0);

        let contact = resolve_axis(&mut pos, &mut vel, size, &blocks, Axis::Y, None);
        assert!(contact.hit && !contact.landed);
        assert_eq!(pos.y, 6.0 * TILE_SIZE);
    }

    #[test]
    fn test_wall_snaps_to_approach_side() {
        let wall = vec![Block::new(3, 0, BlockKind::Dirt)];
        let size = Vec2::new(24.0, 30.0);

        let mut pos = Vec2::new(3.0 * TILE_SIZE - 20.0, 0.0);
        let mut vel = Vec2::new(5.0, 0.0);
        resolve_axis(&mut pos, &mut vel, size, &wall, Axis::X, None);
        assert_eq!(pos.x, 3.0 * TILE_SIZE - size.x);
        assert_eq!(vel.x, 0.0);

        let mut pos = Vec2::new(4.0 * TILE_SIZE - 4.0, 0.0);
        let mut vel = Vec2::new(-5.0, 0.0);
        resolve_axis(&mut pos, &mut vel, size, &wall, Axis::X, None);
        assert_eq!(pos.x, 4.0 * TILE_SIZE);
    }

    #[test]
    fn test_non_solid_tiles_ignored() {
        let lava = vec![Block::new(0, 0, BlockKind::Lava)];
        let mut pos = Vec2::new(4.0, 4.0);
        let mut vel = Vec2::new(0.0, 3.0);
        let contact = resolve_axis(&mut pos, &mut vel, Vec2::splat(10.0), &lava, Axis::Y, None);
        assert!(!contact.hit);
        assert_eq!(vel.y, 3.0);
        assert_eq!(overlapping(&lava, pos, Vec2::splat(10.0)).count(), 1);
    }
}
