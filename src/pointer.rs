//! Pointer input as an injected capability.
//!
//! The host writes raw viewport samples into a [`SharedPointer`] from its
//! input handler; the field only ever reads through [`PointerObserver`].

use std::sync::Arc;

use cgmath::prelude::*;
use parking_lot::RwLock;

pub trait PointerObserver {
    /// Latest raw pointer sample in viewport coordinates, `None` until the pointer is seen.
    fn position(&self) -> Option<cgmath::Vector2<f32>>;
}

#[derive(Clone, Default)]
pub struct SharedPointer {
    latest: Arc<RwLock<Option<cgmath::Vector2<f32>>>>,
}

impl SharedPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, x: f32, y: f32) {
        *self.latest.write() = Some(cgmath::vec2(x, y));
    }
}

impl PointerObserver for SharedPointer {
    fn position(&self) -> Option<cgmath::Vector2<f32>> {
        *self.latest.read()
    }
}

/// Observer that always reports the same sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedPointer(pub Option<cgmath::Vector2<f32>>);

impl PointerObserver for FixedPointer {
    fn position(&self) -> Option<cgmath::Vector2<f32>> {
        self.0
    }
}

impl<P: PointerObserver + ?Sized> PointerObserver for &P {
    fn position(&self) -> Option<cgmath::Vector2<f32>> {
        (**self).position()
    }
}

/// Pointer offset from the canvas centre, sticky at the last in-bounds sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerTracker {
    target: cgmath::Vector2<f32>,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self { target: cgmath::Vector2::zero() }
    }
}

impl PointerTracker {
    pub fn target(&self) -> cgmath::Vector2<f32> {
        self.target
    }

    /// Feeds one raw sample. Returns whether it landed inside the canvas.
    ///
    /// `origin` is the canvas' top-left corner in viewport coordinates and
    /// `size` its logical size. Samples outside the canvas are ignored.
    pub fn track(
        &mut self,
        raw: cgmath::Vector2<f32>,
        origin: cgmath::Vector2<f32>,
        size: cgmath::Vector2<f32>,
    ) -> bool {
        let half = size / 2.0;
        let relative = raw - origin - half;
        let inside = relative.x < half.x && relative.x > -half.x && relative.y < half.y && relative.y > -half.y;
        if inside {
            self.target = relative;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_pointer_reports_latest_sample() {
        let pointer = SharedPointer::new();
        assert_eq!(pointer.position(), None);

        let writer = pointer.clone();
        writer.record(3.0, 4.0);
        writer.record(5.0, 6.0);
        assert_eq!(pointer.position(), Some(cgmath::vec2(5.0, 6.0)));
    }

    #[test]
    fn shared_pointer_accepts_writes_from_other_threads() {
        let pointer = SharedPointer::new();
        let writer = pointer.clone();
        std::thread::spawn(move || writer.record(1.0, 2.0)).join().unwrap();
        assert_eq!(pointer.position(), Some(cgmath::vec2(1.0, 2.0)));
    }

    #[test]
    fn offset_is_relative_to_canvas_centre() {
        let mut tracker = PointerTracker::default();
        let origin = cgmath::vec2(100.0, 50.0);
        let size = cgmath::vec2(400.0, 300.0);

        assert!(tracker.track(cgmath::vec2(300.0, 200.0), origin, size));
        assert_eq!(tracker.target(), cgmath::vec2(0.0, 0.0));

        assert!(tracker.track(cgmath::vec2(110.0, 60.0), origin, size));
        assert_eq!(tracker.target(), cgmath::vec2(-190.0, -140.0));
    }

    #[test]
    fn leaving_the_canvas_keeps_last_in_bounds_target() {
        let mut tracker = PointerTracker::default();
        let origin = cgmath::vec2(0.0, 0.0);
        let size = cgmath::vec2(400.0, 300.0);

        let trajectory = [(350.0, 150.0), (399.0, 150.0), (450.0, 150.0), (800.0, -20.0)];
        for (x, y) in trajectory {
            tracker.track(cgmath::vec2(x, y), origin, size);
        }
        assert_eq!(tracker.target(), cgmath::vec2(199.0, 0.0));

        // edges themselves count as outside
        assert!(!tracker.track(cgmath::vec2(400.0, 150.0), origin, size));
        assert_eq!(tracker.target(), cgmath::vec2(199.0, 0.0));
    }

    #[test]
    fn empty_canvas_never_captures() {
        let mut tracker = PointerTracker::default();
        assert!(!tracker.track(cgmath::vec2(0.0, 0.0), cgmath::vec2(0.0, 0.0), cgmath::vec2(0.0, 0.0)));
        assert_eq!(tracker.target(), cgmath::vec2(0.0, 0.0));
    }
}
