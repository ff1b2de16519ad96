//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses the thread-local generator.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_index(&self, upper: usize) -> usize {
        use rand::Rng;
        if upper <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..upper)
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing.
///
/// Always picks `self.0` (wrapped into range); uuids are sequential so
/// generated instance ids stay unique.
#[cfg(test)]
pub struct FixedRandom(pub usize, std::sync::atomic::AtomicU64);

#[cfg(test)]
impl FixedRandom {
    pub fn new(index: usize) -> Self {
        Self(index, std::sync::atomic::AtomicU64::new(1))
    }
}

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_index(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.0 % upper
    }

    fn gen_uuid(&self) -> Uuid {
        let n = self.1.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Uuid::from_u128(u128::from(n))
    }
}
