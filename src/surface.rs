use cgmath::prelude::*;

use crate::color::Rgb;

/// Alpha left at twice the radius, as a fraction of the centre alpha.
pub const GLOW_FALLOFF: f32 = 0.3;

/// One particle as handed to a [`Surface`]: a disc filled with a radial gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub center: cgmath::Vector2<f32>,
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
}

impl Glow {
    /// Gradient alpha at `distance` from the centre: full at 0, `GLOW_FALLOFF` of it at `2 * radius`.
    pub fn alpha_at(&self, distance: f32) -> f32 {
        glow_alpha(self.alpha, self.radius, distance)
    }
}

pub fn glow_alpha(alpha: f32, radius: f32, distance: f32) -> f32 {
    if radius <= 0.0 {
        return alpha;
    }
    let t = (distance / (2.0 * radius)).clamp(0.0, 1.0);
    alpha * (1.0 - (1.0 - GLOW_FALLOFF) * t)
}

/// Physical pixel size of a canvas with the given logical size.
pub fn backing_size(logical: cgmath::Vector2<f32>, device_pixel_ratio: f32) -> (u32, u32) {
    let scaled = logical * device_pixel_ratio;
    (scaled.x.max(0.0) as u32, scaled.y.max(0.0) as u32)
}

/// 2D drawing target for a particle field. All coordinates are logical pixels.
pub trait Surface {
    /// Resizes the backing store to `logical * device_pixel_ratio` pixels, drawn at `logical` size.
    fn configure(&mut self, logical: cgmath::Vector2<f32>, device_pixel_ratio: f32);
    fn clear(&mut self);
    fn fill_glow(&mut self, glow: &Glow);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn configure(&mut self, logical: cgmath::Vector2<f32>, device_pixel_ratio: f32) {
        (**self).configure(logical, device_pixel_ratio)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn fill_glow(&mut self, glow: &Glow) {
        (**self).fill_glow(glow)
    }
}

/// Headless surface that keeps what was drawn since the last clear.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    pub logical: cgmath::Vector2<f32>,
    pub backing: (u32, u32),
    pub clears: usize,
    pub glows: Vec<Glow>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            logical: cgmath::Vector2::zero(),
            backing: (0, 0),
            clears: 0,
            glows: Vec::new(),
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty_area(&self) -> bool {
        self.backing.0 == 0 || self.backing.1 == 0
    }
}

impl Surface for RecordingSurface {
    fn configure(&mut self, logical: cgmath::Vector2<f32>, device_pixel_ratio: f32) {
        self.logical = logical;
        self.backing = backing_size(logical, device_pixel_ratio);
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.glows.clear();
    }

    fn fill_glow(&mut self, glow: &Glow) {
        if self.is_empty_area() || glow.alpha <= 0.0 {
            return;
        }
        self.glows.push(*glow);
    }
}
