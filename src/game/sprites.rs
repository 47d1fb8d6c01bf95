//! Sprite silhouettes used for collision.
//!
//! The silhouettes are generated at the dimensions of the classic artwork
//! (scaled 2x) so that pixel offsets line up with the simulation's units.

use super::mask::Mask;
use crate::constants::{
    BIRD_SPRITE_HEIGHT, BIRD_SPRITE_WIDTH, PIPE_SPRITE_HEIGHT, PIPE_SPRITE_WIDTH,
};

/// Number of bird animation frames.
pub const BIRD_FRAMES: usize = 3;

/// Height of the pipe lip in pixels.
pub const PIPE_LIP_HEIGHT: u32 = 48;
/// Inset of the pipe body relative to the lip on each side.
const PIPE_BODY_INSET: u32 = 4;

/// Collision masks for every sprite in play.
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub bird_frames: [Mask; BIRD_FRAMES],
    pub pipe_top: Mask,
    pub pipe_bottom: Mask,
}

impl SpriteSet {
    /// The standard silhouettes: a round-bodied bird with three wing poses
    /// and a lipped pipe (the top pipe is the bottom pipe flipped).
    pub fn standard() -> Self {
        let pipe_bottom = pipe_mask();
        Self {
            bird_frames: [bird_mask(12.0), bird_mask(24.0), bird_mask(36.0)],
            pipe_top: pipe_bottom.flipped_vertical(),
            pipe_bottom,
        }
    }

    /// Build a set from caller-supplied masks; the top pipe is derived by
    /// flipping the bottom pipe.
    pub fn from_masks(bird_frames: [Mask; BIRD_FRAMES], pipe_bottom: Mask) -> Self {
        Self {
            bird_frames,
            pipe_top: pipe_bottom.flipped_vertical(),
            pipe_bottom,
        }
    }

    pub fn bird_width(&self) -> u32 {
        self.bird_frames[0].width()
    }

    pub fn bird_height(&self) -> u32 {
        self.bird_frames[0].height()
    }

    pub fn pipe_width(&self) -> u32 {
        self.pipe_top.width()
    }

    pub fn pipe_height(&self) -> u32 {
        self.pipe_top.height()
    }
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self::standard()
    }
}

fn in_ellipse(x: u32, y: u32, cx: f64, cy: f64, rx: f64, ry: f64) -> bool {
    let nx = (x as f64 + 0.5 - cx) / rx;
    let ny = (y as f64 + 0.5 - cy) / ry;
    nx * nx + ny * ny <= 1.0
}

/// Bird silhouette with the wing centred at `wing_y`.
fn bird_mask(wing_y: f64) -> Mask {
    Mask::from_fn(BIRD_SPRITE_WIDTH, BIRD_SPRITE_HEIGHT, |x, y| {
        let body = in_ellipse(x, y, 32.0, 24.0, 28.0, 19.0);
        let wing = in_ellipse(x, y, 16.0, wing_y, 12.0, 7.0);
        // Beak tapers toward the tip
        let beak = x >= 56 && y >= 26 && y < 34 - (x - 56) / 3;
        body || wing || beak
    })
}

fn pipe_mask() -> Mask {
    Mask::from_fn(PIPE_SPRITE_WIDTH, PIPE_SPRITE_HEIGHT, |x, y| {
        y < PIPE_LIP_HEIGHT || (PIPE_BODY_INSET..PIPE_SPRITE_WIDTH - PIPE_BODY_INSET).contains(&x)
    })
}
