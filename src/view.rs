use rand::{Rng, rngs::StdRng};

use crate::animation::{AnimationHandle, FrameLoops};
use crate::config::FieldConfig;
use crate::error::Result;
use crate::field::ParticleField;
use crate::pointer::PointerObserver;
use crate::surface::Surface;

/// Where a field is mounted: the container's box in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Container {
    pub origin: cgmath::Vector2<f32>,
    pub size: cgmath::Vector2<f32>,
    pub device_pixel_ratio: f32,
}

impl Container {
    pub fn new(origin: cgmath::Vector2<f32>, size: cgmath::Vector2<f32>, device_pixel_ratio: f32) -> Self {
        Self { origin, size, device_pixel_ratio }
    }
}

/// A particle field bound to a surface, a pointer source and a running frame loop.
pub struct ParticleView<S: Surface, P: PointerObserver, R: Rng = StdRng> {
    field: ParticleField<R>,
    surface: S,
    pointer: P,
    container: Container,
    last_sample: Option<cgmath::Vector2<f32>>,
    handle: AnimationHandle,
}

impl<S: Surface, P: PointerObserver> ParticleView<S, P> {
    pub fn mount(
        config: FieldConfig,
        container: Container,
        loops: &FrameLoops,
        surface: S,
        pointer: P,
    ) -> Result<Self> {
        Self::mount_with(|| ParticleField::new(config), container, loops, surface, pointer)
    }

    pub fn mount_seeded(
        config: FieldConfig,
        seed: u64,
        container: Container,
        loops: &FrameLoops,
        surface: S,
        pointer: P,
    ) -> Result<Self> {
        Self::mount_with(|| ParticleField::seeded(config, seed), container, loops, surface, pointer)
    }
}

impl<S: Surface, P: PointerObserver, R: Rng> ParticleView<S, P, R> {
    /// Mounts an already built field.
    pub fn mount_field(
        field: ParticleField<R>,
        container: Container,
        loops: &FrameLoops,
        surface: S,
        pointer: P,
    ) -> Self {
        Self::attach(field, container, loops.start(), surface, pointer)
    }

    /// Acquires the frame loop, then builds the field. A failed build drops the handle, which stops the loop.
    pub fn mount_with(
        build: impl FnOnce() -> Result<ParticleField<R>>,
        container: Container,
        loops: &FrameLoops,
        surface: S,
        pointer: P,
    ) -> Result<Self> {
        let handle = loops.start();
        let field = build()?;
        Ok(Self::attach(field, container, handle, surface, pointer))
    }

    fn attach(
        mut field: ParticleField<R>,
        container: Container,
        handle: AnimationHandle,
        mut surface: S,
        pointer: P,
    ) -> Self {
        field.initialize(container.size, container.device_pixel_ratio, &mut surface);
        log::info!(
            "mounted particle field (loop {}) at {}x{}",
            handle.id(),
            container.size.x,
            container.size.y
        );

        Self {
            field,
            surface,
            pointer,
            container,
            last_sample: None,
            handle,
        }
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Runs one animation frame. Returns whether another frame should be requested.
    pub fn frame(&mut self) -> bool {
        if !self.handle.is_running() {
            return false;
        }

        if let Some(sample) = self.pointer.position() {
            if self.last_sample != Some(sample) {
                self.last_sample = Some(sample);
                self.field.track_pointer(sample, self.container.origin);
            }
        }

        self.field.step(&mut self.surface);
        true
    }

    /// Re-measures the container and regenerates the population.
    pub fn resize(&mut self, container: Container) {
        self.container = container;
        self.field
            .resize(container.size, container.device_pixel_ratio, &mut self.surface);
    }

    /// Moves the container without resizing it, e.g. on scroll.
    pub fn reposition(&mut self, origin: cgmath::Vector2<f32>) {
        self.container.origin = origin;
    }

    pub fn refresh(&mut self) {
        self.field.refresh(&mut self.surface);
    }

    pub fn reconfigure(&mut self, config: FieldConfig) -> Result<()> {
        self.field.reconfigure(config, &mut self.surface)
    }

    /// Stops the frame loop and hands the surface back.
    pub fn unmount(self) -> S {
        self.handle.cancel();
        log::info!("unmounted particle field (loop {})", self.handle.id());
        self.surface
    }
}
