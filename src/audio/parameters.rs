// Atomic parameters - Lock-free sharing between UI and audio callback

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// An f32 readable/writable from both sides of the audio boundary.
///
/// Stores the bit pattern in an `AtomicU32`; cloning shares the same value.
#[derive(Clone)]
pub struct AtomicF32 {
    inner: Arc<AtomicU32>,
}

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self {
            inner: Arc::new(AtomicU32::new(value.to_bits())),
        }
    }

    /// UI side: publish a new value.
    pub fn set(&self, value: f32) {
        self.inner.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Audio side: read the latest value.
    pub fn get(&self) -> f32 {
        f32::from_bits(self.inner.load(Ordering::Relaxed))
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}
