//! Scrolling floor made of two repeating segments.

use crate::constants::{BASE_SPRITE_WIDTH, BASE_VELOCITY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
    pub width: i32,
}

impl Base {
    pub fn new(y: i32) -> Self {
        Self::with_width(y, BASE_SPRITE_WIDTH)
    }

    pub fn with_width(y: i32, width: i32) -> Self {
        Self {
            y,
            x1: 0,
            x2: width,
            width,
        }
    }

    /// Scroll left; a segment that leaves the screen jumps behind the other.
    pub fn advance(&mut self) {
        self.x1 -= BASE_VELOCITY;
        self.x2 -= BASE_VELOCITY;

        if self.x1 + self.width < 0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0 {
            self.x2 = self.x1 + self.width;
        }
    }

    /// Whether screen column `x` is covered by either segment.
    pub fn covers(&self, x: i32) -> bool {
        (self.x1..self.x1 + self.width).contains(&x) || (self.x2..self.x2 + self.width).contains(&x)
    }
}
