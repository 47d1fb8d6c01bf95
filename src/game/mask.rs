//! Opaque-pixel coverage masks.
//!
//! A mask records which pixels of a sprite are opaque. Two masks collide when
//! at least one opaque pixel of each lands on the same spot for a given
//! integer offset, which keeps collisions faithful to the sprite silhouette
//! instead of its bounding box.

/// Alpha values above this count as opaque.
pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Create a fully transparent mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Create a fully opaque mask.
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask by evaluating `opaque(x, y)` for every pixel.
    pub fn from_fn<F: Fn(u32, u32) -> bool>(width: u32, height: u32, opaque: F) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from a row-major alpha channel.
    ///
    /// Returns `None` when `alpha` does not hold exactly `width * height` values.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Option<Self> {
        if alpha.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            bits: alpha.iter().map(|&a| a > ALPHA_THRESHOLD).collect(),
        })
    }

    /// Build a mask from text rows where `#` marks an opaque pixel.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut mask = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    mask.set(x as u32, y as u32, true);
                }
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (x, y) is opaque. Out-of-range pixels are transparent.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = opaque;
        }
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Mirror the mask top-to-bottom.
    pub fn flipped_vertical(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.get(x as i32, (self.height - 1 - y) as i32)
        })
    }

    /// First overlapping opaque pixel when `other` is placed at `offset`
    /// relative to this mask's origin, in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (dx, dy) = offset;
        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (self.width as i32).min(dx + other.width as i32);
        let y_end = (self.height as i32).min(dy + other.height as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// Rotate counter-clockwise by `degrees` about the centre, growing the
    /// canvas to fit the rotated silhouette. Sampling is nearest-neighbour.
    pub fn rotated(&self, degrees: f64) -> Self {
        if degrees == 0.0 {
            return self.clone();
        }

        let (sin, cos) = degrees.to_radians().sin_cos();
        let w = self.width as f64;
        let h = self.height as f64;
        // Trim float noise so right angles don't grow an extra column
        let new_w = (w * cos.abs() + h * sin.abs() - 1e-6).ceil() as u32;
        let new_h = (w * sin.abs() + h * cos.abs() - 1e-6).ceil() as u32;
        let half_new_w = new_w as f64 / 2.0;
        let half_new_h = new_h as f64 / 2.0;

        Self::from_fn(new_w, new_h, |x, y| {
            let dx = x as f64 + 0.5 - half_new_w;
            let dy = y as f64 + 0.5 - half_new_h;
            // Inverse mapping back into the source sprite (y axis points down)
            let sx = dx * cos - dy * sin + w / 2.0;
            let sy = dx * sin + dy * cos + h / 2.0;
            self.get(sx.floor() as i32, sy.floor() as i32)
        })
    }
}
