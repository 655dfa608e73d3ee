use cgmath::prelude::*;
use rand::Rng;

/// Distance from the nearest edge over which a particle fades out.
pub const EDGE_FADE_DISTANCE: f32 = 20.0;
/// Alpha gained per frame while fading in.
pub const FADE_IN_STEP: f32 = 0.02;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: cgmath::Vector2<f32>,
    pub velocity: cgmath::Vector2<f32>,
    /// Pointer-driven display offset, eased every frame.
    pub offset: cgmath::Vector2<f32>,
    pub radius: f32,
    pub alpha: f32,
    pub target_alpha: f32,
    pub magnetism: f32,
}

/// Per-frame inputs shared by every particle in the field.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    pub bounds: cgmath::Vector2<f32>,
    pub pointer: cgmath::Vector2<f32>,
    pub drift: cgmath::Vector2<f32>,
    pub staticity: f32,
    pub ease: f32,
}

/// Linear remap of `value` from `[start1, end1]` to `[start2, end2]`, floored at zero.
pub fn remap(value: f32, start1: f32, end1: f32, start2: f32, end2: f32) -> f32 {
    let remapped = (value - start1) * (end2 - start2) / (end1 - start1) + start2;
    remapped.max(0.0)
}

/// Edge fade factor for a closest-edge distance, rounded to two decimals.
/// Values above 1 mean the particle is clear of the edges.
pub fn edge_fade(closest_edge: f32) -> f32 {
    let factor = remap(closest_edge, 0.0, EDGE_FADE_DISTANCE, 0.0, 1.0);
    (factor * 100.0).round() / 100.0
}

fn spawn_coordinate<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.gen_range(0.0..extent).floor()
    } else {
        0.0
    }
}

impl Particle {
    /// A fresh, invisible particle somewhere inside `bounds`.
    pub fn spawn<R: Rng>(rng: &mut R, bounds: cgmath::Vector2<f32>, base_size: f32) -> Self {
        let position = cgmath::vec2(
            spawn_coordinate(rng, bounds.x),
            spawn_coordinate(rng, bounds.y),
        );
        let radius = (rng.gen_range(0.0..2.0f32)).floor() + base_size;
        let target_alpha = ((rng.gen_range(0.0..0.6f32) + 0.1) * 10.0).round() / 10.0;
        let velocity = cgmath::vec2(
            (rng.gen_range(0.0..1.0f32) - 0.5) * 0.1,
            (rng.gen_range(0.0..1.0f32) - 0.5) * 0.1,
        );
        let magnetism = 0.1 + rng.gen_range(0.0..4.0f32);

        Self {
            position,
            velocity,
            offset: cgmath::Vector2::zero(),
            radius,
            alpha: 0.0,
            target_alpha,
            magnetism,
        }
    }

    /// Where the particle is drawn.
    pub fn display_position(&self) -> cgmath::Vector2<f32> {
        self.position + self.offset
    }

    /// Smallest distance from the displayed disc to any of the four borders.
    pub fn closest_edge(&self, bounds: cgmath::Vector2<f32>) -> f32 {
        let shown = self.display_position();
        [
            shown.x - self.radius,
            bounds.x - shown.x - self.radius,
            shown.y - self.radius,
            bounds.y - shown.y - self.radius,
        ]
        .into_iter()
        .fold(f32::INFINITY, f32::min)
    }

    pub fn update_alpha(&mut self, bounds: cgmath::Vector2<f32>) {
        let fade = edge_fade(self.closest_edge(bounds));
        if fade > 1.0 {
            self.alpha = (self.alpha + FADE_IN_STEP).min(self.target_alpha);
        } else {
            self.alpha = self.target_alpha * fade;
        }
    }

    pub fn advance(&mut self, params: &FrameParams) {
        self.update_alpha(params.bounds);

        self.position += self.velocity + params.drift;

        let attraction = params.pointer / (params.staticity / self.magnetism);
        self.offset += (attraction - self.offset) / params.ease;
    }

    /// True once the base position (offset ignored) is further than one radius outside `bounds`.
    pub fn is_outside(&self, bounds: cgmath::Vector2<f32>) -> bool {
        self.position.x < -self.radius
            || self.position.x > bounds.x + self.radius
            || self.position.y < -self.radius
            || self.position.y > bounds.y + self.radius
    }
}
