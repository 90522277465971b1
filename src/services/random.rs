use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::sync::Mutex;

use crate::models::ItemId;

/// Randomness used by the randomised strategies
pub trait RandomSource: Send + Sync {
    /// Shuffles the slice in place
    fn shuffle(&self, items: &mut [ItemId]);
}

/// Thread-local OS-seeded generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn shuffle(&self, items: &mut [ItemId]) {
        items.shuffle(&mut rand::thread_rng());
    }
}

/// Reproducible generator for tests and replays
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn shuffle(&self, items: &mut [ItemId]) {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.shuffle(&mut *rng);
    }
}
