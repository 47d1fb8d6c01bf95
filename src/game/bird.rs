//! Bird kinematics and animation.

use super::mask::Mask;
use super::sprites::SpriteSet;
use crate::constants::{
    ANIMATION_TIME, ASCENT_BIAS, BIRD_START_X, BIRD_START_Y, GRAVITY_FACTOR, JUMP_VELOCITY,
    MAX_ROTATION, MIN_ROTATION, NOSE_DIVE_TILT, ROTATION_VELOCITY, TERMINAL_DISPLACEMENT,
    TILT_MARGIN,
};
use serde::{Deserialize, Serialize};

/// Animation frame shown while gliding or nose-diving.
pub const GLIDE_FRAME: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Horizontal position, fixed for the whole run.
    pub x: i32,
    /// Vertical position (top edge of the sprite), positive is down.
    pub y: f64,
    /// Velocity set by the last impulse.
    pub velocity: f64,
    /// Ticks since the last impulse.
    pub tick_count: u32,
    /// Height recorded at the last impulse.
    pub height: f64,
    /// Tilt in degrees, nose-up positive.
    pub tilt: f64,
    /// Free-running animation counter.
    pub anim_count: u32,
    /// Index into the bird's animation frames.
    pub frame: usize,
}

impl Bird {
    pub fn new(x: i32, y: f64) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            tick_count: 0,
            height: y,
            tilt: 0.0,
            anim_count: 0,
            frame: 0,
        }
    }

    /// Flap: the only way the bird's velocity changes.
    pub fn impulse(&mut self) {
        self.velocity = JUMP_VELOCITY;
        self.tick_count = 0;
        self.height = self.y;
    }

    /// Advance one tick and return the displacement applied.
    pub fn advance(&mut self) -> f64 {
        self.tick_count += 1;
        let t = self.tick_count as f64;

        let mut d = self.velocity * t + GRAVITY_FACTOR * t * t;
        if d >= TERMINAL_DISPLACEMENT {
            d = TERMINAL_DISPLACEMENT;
        }
        if d < 0.0 {
            d -= ASCENT_BIAS;
        }
        self.y += d;

        if d < 0.0 || self.y < self.height + TILT_MARGIN {
            if self.tilt < MAX_ROTATION {
                self.tilt = MAX_ROTATION;
            }
        } else if self.tilt > MIN_ROTATION {
            self.tilt = (self.tilt - ROTATION_VELOCITY).max(MIN_ROTATION);
        }

        d
    }

    /// Step the wing animation one tick.
    ///
    /// Cycles up, glide, down, glide, then back to up. A nose-diving bird
    /// stops flapping and holds the glide frame until the next impulse.
    pub fn animate(&mut self) {
        self.anim_count += 1;

        let t = ANIMATION_TIME;
        match self.anim_count {
            c if c < t => self.frame = 0,
            c if c < t * 2 => self.frame = 1,
            c if c < t * 3 => self.frame = 2,
            c if c <= t * 4 => self.frame = 1,
            _ => {
                self.frame = 0;
                self.anim_count = 0;
            }
        }

        if self.tilt <= NOSE_DIVE_TILT {
            self.frame = GLIDE_FRAME;
            self.anim_count = t * 2;
        }
    }

    /// Current collision mask, rotated by the tilt, with the screen position
    /// of its top-left corner. The rotated sprite stays centred on where the
    /// upright sprite would be drawn.
    pub fn placed_mask(&self, sprites: &SpriteSet) -> (Mask, (i32, i32)) {
        let upright = &sprites.bird_frames[self.frame];
        let rotated = upright.rotated(self.tilt);

        let center_x = self.x as f64 + upright.width() as f64 / 2.0;
        let center_y = self.y + upright.height() as f64 / 2.0;
        let origin_x = (center_x - rotated.width() as f64 / 2.0).round() as i32;
        let origin_y = (center_y - rotated.height() as f64 / 2.0).round() as i32;

        (rotated, (origin_x, origin_y))
    }

    /// Whether the bird touches the floor or has left the top of the screen.
    pub fn out_of_bounds(&self, floor_y: i32, sprites: &SpriteSet) -> bool {
        self.y + sprites.bird_height() as f64 >= floor_y as f64 || self.y < 0.0
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::new(BIRD_START_X, BIRD_START_Y)
    }
}
