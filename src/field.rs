use cgmath::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::color::Rgb;
use crate::config::FieldConfig;
use crate::error::Result;
use crate::particle::{FrameParams, Particle};
use crate::pointer::PointerTracker;
use crate::surface::{Glow, Surface};

/// The particle simulation behind an ambient background.
///
/// The population always holds `config.quantity` particles once initialized:
/// particles that drift off the canvas are replaced in place.
pub struct ParticleField<R: Rng = StdRng> {
    config: FieldConfig,
    rgb: Rgb,
    particles: Vec<Particle>,
    size: cgmath::Vector2<f32>,
    device_pixel_ratio: f32,
    pointer: PointerTracker,
    rng: R,
    frame: u64,
}

/// Negative, NaN and infinite measurements collapse to an empty extent.
fn usable_extent(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

impl ParticleField<StdRng> {
    pub fn new(config: FieldConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: FieldConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticleField<R> {
    pub fn with_rng(config: FieldConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let rgb = config.rgb()?;

        Ok(Self {
            config,
            rgb,
            particles: Vec::new(),
            size: cgmath::Vector2::zero(),
            device_pixel_ratio: 1.0,
            pointer: PointerTracker::default(),
            rng,
            frame: 0,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to individual particles. The population size cannot change through it.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Logical canvas size.
    pub fn size(&self) -> cgmath::Vector2<f32> {
        self.size
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    pub fn pointer_target(&self) -> cgmath::Vector2<f32> {
        self.pointer.target()
    }

    /// Frames stepped since construction.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Sizes the surface and regenerates the whole population.
    pub fn initialize<S: Surface + ?Sized>(
        &mut self,
        size: cgmath::Vector2<f32>,
        device_pixel_ratio: f32,
        surface: &mut S,
    ) {
        self.size = cgmath::vec2(usable_extent(size.x), usable_extent(size.y));
        self.device_pixel_ratio = usable_extent(device_pixel_ratio);
        surface.configure(self.size, self.device_pixel_ratio);
        log::debug!(
            "initializing {} particles on {}x{} @{}x",
            self.config.quantity,
            self.size.x,
            self.size.y,
            self.device_pixel_ratio
        );
        self.populate(surface);
    }

    pub fn resize<S: Surface + ?Sized>(
        &mut self,
        size: cgmath::Vector2<f32>,
        device_pixel_ratio: f32,
        surface: &mut S,
    ) {
        log::debug!("resize {}x{} -> {}x{}", self.size.x, self.size.y, size.x, size.y);
        self.initialize(size, device_pixel_ratio, surface);
    }

    /// Regenerates the population without touching the canvas size.
    pub fn refresh<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        log::debug!("refresh");
        self.populate(surface);
    }

    fn populate<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear();
        self.particles.clear();
        self.particles.reserve(self.config.quantity);
        for _ in 0..self.config.quantity {
            let particle = Particle::spawn(&mut self.rng, self.size, self.config.size);
            surface.fill_glow(&self.glow(&particle));
            self.particles.push(particle);
        }
    }

    fn glow(&self, particle: &Particle) -> Glow {
        Glow {
            center: particle.display_position(),
            radius: particle.radius,
            color: self.rgb,
            alpha: particle.alpha,
        }
    }

    /// Feeds a raw pointer sample in viewport coordinates. `origin` is the canvas' top-left corner.
    pub fn track_pointer(&mut self, raw: cgmath::Vector2<f32>, origin: cgmath::Vector2<f32>) -> bool {
        self.pointer.track(raw, origin, self.size)
    }

    /// Advances one animation frame and redraws.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear();

        let params = FrameParams {
            bounds: self.size,
            pointer: self.pointer.target(),
            drift: cgmath::vec2(self.config.vx, self.config.vy),
            staticity: self.config.staticity,
            ease: self.config.ease,
        };

        self.particles
            .par_iter_mut()
            .for_each(|particle| particle.advance(&params));

        for index in 0..self.particles.len() {
            surface.fill_glow(&self.glow(&self.particles[index]));

            if self.particles[index].is_outside(self.size) {
                let replacement = Particle::spawn(&mut self.rng, self.size, self.config.size);
                log::trace!(
                    "particle {index} left at ({:.1}, {:.1}), respawned at ({}, {})",
                    self.particles[index].position.x,
                    self.particles[index].position.y,
                    replacement.position.x,
                    replacement.position.y
                );
                self.particles[index] = replacement;
            }
        }

        self.frame += 1;
    }

    /// Applies new options. A new color or quantity, or a flipped `refresh`, regenerates the population;
    /// everything else takes effect on the next frame.
    pub fn reconfigure<S: Surface + ?Sized>(&mut self, config: FieldConfig, surface: &mut S) -> Result<()> {
        config.validate()?;
        let rgb = config.rgb()?;

        let recolored = rgb != self.rgb;
        let regenerate = config.refresh != self.config.refresh || config.quantity != self.config.quantity;
        log::debug!("reconfigure: recolored={recolored} regenerate={regenerate}");

        self.rgb = rgb;
        self.config = config;

        if recolored {
            self.initialize(self.size, self.device_pixel_ratio, surface);
        } else if regenerate {
            self.populate(surface);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::surface::RecordingSurface;

    fn field(quantity: usize) -> ParticleField {
        ParticleField::seeded(FieldConfig { quantity, ..FieldConfig::default() }, 42).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = FieldConfig { color: "#12".into(), ..FieldConfig::default() };
        assert!(matches!(ParticleField::seeded(config, 1), Err(FieldError::InvalidColor(_))));
    }

    #[test]
    fn initialize_configures_surface_and_spawns() {
        let mut field = field(50);
        let mut surface = RecordingSurface::new();
        field.initialize(cgmath::vec2(800.0, 600.0), 2.0, &mut surface);

        assert_eq!(field.len(), 50);
        assert_eq!(surface.backing, (1600, 1200));
        assert_eq!(surface.logical, cgmath::vec2(800.0, 600.0));
        assert_eq!(surface.clears, 1);
        // freshly spawned particles are invisible
        assert!(surface.glows.is_empty());
        assert!(field.particles().iter().all(|p| p.alpha == 0.0));
    }

    #[test]
    fn step_keeps_population_and_draws_each_visible_particle() {
        let mut field = field(80);
        let mut surface = RecordingSurface::new();
        field.initialize(cgmath::vec2(300.0, 200.0), 1.0, &mut surface);

        for _ in 0..120 {
            field.step(&mut surface);
            assert_eq!(field.len(), 80);
            assert!(surface.glows.len() <= 80);
        }
        assert!(!surface.glows.is_empty());
        assert_eq!(field.frame(), 120);
        assert_eq!(surface.clears, 121);
    }

    #[test]
    fn same_seed_same_field() {
        let mut a = field(20);
        let mut b = field(20);
        let mut sa = RecordingSurface::new();
        let mut sb = RecordingSurface::new();
        a.initialize(cgmath::vec2(100.0, 100.0), 1.0, &mut sa);
        b.initialize(cgmath::vec2(100.0, 100.0), 1.0, &mut sb);
        for _ in 0..30 {
            a.step(&mut sa);
            b.step(&mut sb);
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn zero_size_container_draws_nothing() {
        let mut field = field(10);
        let mut surface = RecordingSurface::new();
        field.initialize(cgmath::vec2(0.0, 0.0), 2.0, &mut surface);
        for _ in 0..5 {
            field.step(&mut surface);
        }
        assert_eq!(field.len(), 10);
        assert_eq!(surface.backing, (0, 0));
        assert!(surface.glows.is_empty());
    }

    #[test]
    fn non_finite_measurements_act_like_an_empty_container() {
        let mut field = field(10);
        let mut surface = RecordingSurface::new();

        field.initialize(cgmath::vec2(f32::INFINITY, 10.0), 1.0, &mut surface);
        assert_eq!(field.size(), cgmath::vec2(0.0, 10.0));
        assert_eq!(field.len(), 10);
        assert_eq!(surface.backing, (0, 10));

        field.resize(cgmath::vec2(f32::NAN, f32::NEG_INFINITY), 2.0, &mut surface);
        assert_eq!(field.size(), cgmath::vec2(0.0, 0.0));

        for ratio in [f32::INFINITY, f32::NAN, 0.0, -2.0] {
            field.resize(cgmath::vec2(100.0, 100.0), ratio, &mut surface);
            assert_eq!(field.device_pixel_ratio(), 0.0);
            assert_eq!(surface.backing, (0, 0));
            field.step(&mut surface);
            assert!(surface.glows.is_empty());
            assert_eq!(field.len(), 10);
        }
    }

    #[test]
    fn pointer_target_feeds_offsets() {
        let mut field = ParticleField::seeded(
            FieldConfig { quantity: 5, ease: 1.0, ..FieldConfig::default() },
            3,
        )
        .unwrap();
        let mut surface = RecordingSurface::new();
        field.initialize(cgmath::vec2(200.0, 200.0), 1.0, &mut surface);

        assert!(field.track_pointer(cgmath::vec2(150.0, 100.0), cgmath::vec2(0.0, 0.0)));
        field.step(&mut surface);

        // ease 1 jumps straight to the target: pointer / (staticity / magnetism)
        for p in field.particles() {
            let expected = 50.0 * p.magnetism / 50.0;
            assert!((p.offset.x - expected).abs() < 1e-4);
            assert!(p.offset.y.abs() < 1e-6);
        }
    }

    #[test]
    fn reconfigure_regenerates_on_refresh_toggle_and_quantity() {
        let mut field = field(10);
        let mut surface = RecordingSurface::new();
        field.initialize(cgmath::vec2(100.0, 100.0), 1.0, &mut surface);
        for _ in 0..10 {
            field.step(&mut surface);
        }
        let before = field.particles().to_vec();

        let drift_only = FieldConfig { vx: 0.5, ..field.config().clone() };
        field.reconfigure(drift_only, &mut surface).unwrap();
        assert_eq!(field.particles(), &before[..]);

        let toggled = FieldConfig { refresh: !field.config().refresh, ..field.config().clone() };
        field.reconfigure(toggled, &mut surface).unwrap();
        assert_ne!(field.particles(), &before[..]);
        assert!(field.particles().iter().all(|p| p.alpha == 0.0));

        let more = FieldConfig { quantity: 25, ..field.config().clone() };
        field.reconfigure(more, &mut surface).unwrap();
        assert_eq!(field.len(), 25);
    }

    #[test]
    fn reconfigure_recolors_and_keeps_bad_config_out() {
        let mut field = field(10);
        let mut surface = RecordingSurface::new();
        field.initialize(cgmath::vec2(100.0, 100.0), 1.5, &mut surface);

        let blue = FieldConfig { color: "#00f".into(), ..field.config().clone() };
        field.reconfigure(blue, &mut surface).unwrap();
        assert_eq!(field.rgb(), Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(surface.backing, (150, 150));

        let broken = FieldConfig { ease: 0.0, ..field.config().clone() };
        assert!(field.reconfigure(broken, &mut surface).is_err());
        assert_eq!(field.config().ease, 50.0);
    }
}
