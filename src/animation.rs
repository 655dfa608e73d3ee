//! Owned frame-loop handles.
//!
//! A mounted field holds an [`AnimationHandle`] for as long as it animates.
//! The handle is released on `cancel`, on drop, and therefore on every early
//! return while a view is being mounted. [`FrameLoops`] counts what is live so
//! a host can stop requesting frames once nothing is.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Default)]
struct Registry {
    next_id: u64,
    live: HashSet<u64>,
}

#[derive(Clone, Default)]
pub struct FrameLoops {
    registry: Arc<Mutex<Registry>>,
}

impl FrameLoops {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> AnimationHandle {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.live.insert(id);
        log::trace!("frame loop {id} started");

        AnimationHandle {
            id,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Loops that are still running.
    pub fn active(&self) -> usize {
        self.registry.lock().live.len()
    }
}

pub struct AnimationHandle {
    id: u64,
    registry: Arc<Mutex<Registry>>,
}

impl AnimationHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.registry.lock().live.contains(&self.id)
    }

    /// Stops the loop. Returns false if it was already stopped.
    pub fn cancel(&self) -> bool {
        let removed = self.registry.lock().live.remove(&self.id);
        if removed {
            log::trace!("frame loop {} cancelled", self.id);
        }
        removed
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        if self.cancel() {
            log::warn!("frame loop {} dropped while running", self.id);
        }
    }
}

impl std::fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("id", &self.id)
            .field("running", &self.is_running())
            .finish()
    }
}
