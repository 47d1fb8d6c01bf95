//! Pipe obstacles: spawning, scrolling and pixel-accurate collision.

use super::bird::Bird;
use super::sprites::SpriteSet;
use crate::constants::{
    PIPE_FIXED_SPAWN_X, PIPE_GAP, PIPE_HEIGHT_MAX, PIPE_HEIGHT_MIN, PIPE_SPAWN_MAX_X,
    PIPE_SPAWN_MIN_X, PIPE_VELOCITY,
};
use crate::error::{FlapError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Where newly spawned pipes enter the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Every pipe enters at the same x.
    Fixed { x: i32 },
    /// Each pipe enters at an x drawn uniformly from `[min, max)`.
    Randomized { min: i32, max: i32 },
}

impl SpawnPolicy {
    pub fn fixed() -> Self {
        Self::Fixed {
            x: PIPE_FIXED_SPAWN_X,
        }
    }

    pub fn randomized() -> Self {
        Self::Randomized {
            min: PIPE_SPAWN_MIN_X,
            max: PIPE_SPAWN_MAX_X,
        }
    }

    pub fn spawn_x<R: Rng>(&self, rng: &mut R) -> i32 {
        match *self {
            Self::Fixed { x } => x,
            Self::Randomized { min, max } => rng.gen_range(min..max),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Fixed { .. } => Ok(()),
            Self::Randomized { min, max } if min < max => Ok(()),
            Self::Randomized { min, max } => Err(FlapError::InvalidConfig(format!(
                "spawn range {min}..{max} is empty"
            ))),
        }
    }

    /// Spawn a pipe according to this policy.
    pub fn spawn<R: Rng>(&self, rng: &mut R, sprites: &SpriteSet) -> Pipe {
        let x = self.spawn_x(rng);
        Pipe::new(x, rng, sprites)
    }
}

/// A top/bottom pipe pair with a gap between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge in pixels.
    pub x: i32,
    /// Bottom edge of the top pipe (the gap's upper edge). Never changes.
    pub height: i32,
    /// Screen y of the top pipe sprite's top-left corner.
    pub top: i32,
    /// Screen y of the bottom pipe sprite's top-left corner.
    pub bottom: i32,
    /// Set once a bird has flown past.
    pub passed: bool,
}

impl Pipe {
    /// Create a pipe at `x` with a random gap position.
    pub fn new<R: Rng>(x: i32, rng: &mut R, sprites: &SpriteSet) -> Self {
        let height = rng.gen_range(PIPE_HEIGHT_MIN..PIPE_HEIGHT_MAX);
        Self::with_height(x, height, sprites)
    }

    /// Create a pipe at `x` whose gap starts at `height`.
    pub fn with_height(x: i32, height: i32, sprites: &SpriteSet) -> Self {
        Self {
            x,
            height,
            top: height - sprites.pipe_height() as i32,
            bottom: height + PIPE_GAP,
            passed: false,
        }
    }

    pub fn advance(&mut self) {
        self.x -= PIPE_VELOCITY;
    }

    /// Right edge in pixels.
    pub fn trailing_edge(&self, sprites: &SpriteSet) -> i32 {
        self.x + sprites.pipe_width() as i32
    }

    /// Whether the pipe has scrolled fully off the left of the screen.
    pub fn off_screen(&self, sprites: &SpriteSet) -> bool {
        self.trailing_edge(sprites) < 0
    }

    /// Mark the pipe passed if `bird_x` is beyond it. Returns true only on
    /// the tick the flag flips.
    pub fn check_passed(&mut self, bird_x: i32) -> bool {
        if !self.passed && self.x < bird_x {
            self.passed = true;
            return true;
        }
        false
    }

    /// Pixel-accurate collision between the bird's current (rotated) sprite
    /// and either pipe sprite.
    pub fn collide(&self, bird: &Bird, sprites: &SpriteSet) -> bool {
        let (bird_mask, (bird_x, bird_y)) = bird.placed_mask(sprites);

        let top_offset = (self.x - bird_x, self.top - bird_y);
        let bottom_offset = (self.x - bird_x, self.bottom - bird_y);

        bird_mask.overlap(&sprites.pipe_top, top_offset).is_some()
            || bird_mask.overlap(&sprites.pipe_bottom, bottom_offset).is_some()
    }
}
