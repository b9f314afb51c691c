//! Shared registry handle with whole-table reload.
//!
//! The capability registry itself is immutable; components take an `Arc`
//! snapshot for the duration of one operation. An administrative reload
//! swaps the whole table behind the lock, so an in-flight operation keeps
//! the table it started with and never observes a mixed old/new state.

use conclave_domain::CapabilityRegistry;
use std::sync::{Arc, RwLock};

#[derive(Debug)]
pub struct SharedRegistry {
    inner: RwLock<Arc<CapabilityRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: CapabilityRegistry) -> Self {
        Self {
            inner: RwLock::new(Arc::new(registry)),
        }
    }

    /// The current table. Hold the returned `Arc` for the whole operation
    /// so a concurrent reload cannot change the table mid-computation.
    pub fn snapshot(&self) -> Arc<CapabilityRegistry> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the whole table atomically
    pub fn reload(&self, registry: CapabilityRegistry) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(registry);
    }
}
