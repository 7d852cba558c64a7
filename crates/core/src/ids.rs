use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic id source for generated UI resources.
///
/// Ids look like millisecond timestamps but never repeat: when two calls land
/// in the same millisecond the later one is bumped past the last id issued.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Start issuing ids above `floor`.
    pub fn starting_at(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    /// Next unique id.
    pub fn next_id(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}
