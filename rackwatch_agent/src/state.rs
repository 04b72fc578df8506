//! Shared agent state: the random source behind the models and a request counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone)]
pub struct AppState {
    // Held only for the synchronous model call, never across an await.
    pub rng: Arc<Mutex<StdRng>>,
    pub requests: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible responses for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Runs `f` with exclusive access to the random source.
    pub fn with_rng_mut<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = match self.rng.lock() {
            Ok(g) => g,
            // A panicked handler leaves the generator usable.
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    pub fn count_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
