//! Generation-counted abort signal.
//!
//! Every lifecycle reset rotates the signal. A wait captures an [`AbortToken`]
//! when it starts; the token reports aborted once the live generation moves
//! past the one it captured. Waits started after a rotation hold the new
//! generation and are unaffected by earlier resets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    generation: Arc<AtomicU64>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Aborts every outstanding token and returns the new generation.
    pub fn rotate(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn token(&self) -> AbortToken {
        AbortToken {
            signal: self.clone(),
            generation: self.generation(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AbortToken {
    signal: AbortSignal,
    generation: u64,
}

impl AbortToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_generation(&self) -> u64 {
        self.signal.generation()
    }

    pub fn is_aborted(&self) -> bool {
        self.current_generation() != self.generation
    }
}
