//! Ambient particle field: drifting, softly glowing dots that lean toward the pointer.
//!
//! [`ParticleField`] is the simulation. [`ParticleView`] mounts one on a
//! [`Surface`] with a [`PointerObserver`] and an [`AnimationHandle`] that is
//! released when the view goes away.

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod pointer;
pub mod surface;
pub mod view;

pub use animation::{AnimationHandle, FrameLoops};
pub use color::Rgb;
pub use config::FieldConfig;
pub use error::{FieldError, Result};
pub use field::ParticleField;
pub use particle::Particle;
pub use pointer::{FixedPointer, PointerObserver, PointerTracker, SharedPointer};
pub use surface::{Glow, RecordingSurface, Surface};
pub use view::{Container, ParticleView};
