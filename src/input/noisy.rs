// src/input/noisy.rs  -  Fault-injecting key map wrapper
use super::{InputError, KeyMapSource, KeySnapshot};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Fails a fraction of raw key map queries, the way a flaky USB
/// aggregator does during enumeration.
pub struct FaultyKeyMap {
    inner: Box<dyn KeyMapSource>,
    rate:  f64,
    rng:   SmallRng,
}

impl FaultyKeyMap {
    pub fn new(inner: Box<dyn KeyMapSource>, rate: f64) -> Self {
        Self::with_rng(inner, rate, SmallRng::from_entropy())
    }

    pub fn with_rng(inner: Box<dyn KeyMapSource>, rate: f64, rng: SmallRng) -> Self {
        Self { inner, rate: rate.clamp(0.0, 1.0), rng }
    }
}

impl KeyMapSource for FaultyKeyMap {
    fn key_strokes(&mut self) -> Result<KeySnapshot, InputError> {
        // Always advance the inner source so a scripted session keeps time
        let snap = self.inner.key_strokes();
        if self.rng.gen_bool(self.rate) {
            return Err(InputError::Unavailable);
        }
        snap
    }
}
