//! Direction sources for breaking exact coincidences
//!
//! When two nodes sit on the same point there is no connecting vector to push
//! them apart along. This is the only place the pipeline may use randomness,
//! and it is injectable so tests can pin it down.

use super::types::Point;

/// Supplies unit vectors for pushing coincident nodes apart
pub trait JitterSource {
    /// Unit vector along which node `a` moves away from node `b`
    fn coincidence_direction(&mut self, a: &str, b: &str) -> Point;
}

/// Deterministic direction derived from the two node ids.
///
/// Swapping `a` and `b` yields the opposite vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashedDirection;

impl JitterSource for HashedDirection {
    fn coincidence_direction(&mut self, a: &str, b: &str) -> Point {
        let (lo, hi, sign) = if a <= b { (a, b, 1.0) } else { (b, a, -1.0) };
        let mut hash = FNV_OFFSET;
        for byte in lo.bytes().chain([0u8]).chain(hi.bytes()) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        let angle = (hash % 3600) as f64 / 10.0;
        Point::from_polar(sign, angle)
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Seeded pseudo-random directions (SplitMix64)
#[derive(Debug, Clone)]
pub struct SeededJitter {
    state: u64,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform float in [0, 1)
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl JitterSource for SeededJitter {
    fn coincidence_direction(&mut self, _a: &str, _b: &str) -> Point {
        Point::from_polar(1.0, self.next_f64() * 360.0)
    }
}

/// A fixed direction, for tests that need to know exactly where nodes go
#[derive(Debug, Clone, Copy)]
pub struct FixedDirection(pub Point);

impl JitterSource for FixedDirection {
    fn coincidence_direction(&mut self, _a: &str, _b: &str) -> Point {
        let len = self.0.radius();
        if len < f64::EPSILON {
            Point::new(1.0, 0.0)
        } else {
            Point::new(self.0.x / len, self.0.y / len)
        }
    }
}

/// The jitter source selected by a config's `jitter_seed`
pub fn from_seed(seed: Option<u64>) -> Box<dyn JitterSource> {
    match seed {
        Some(seed) => Box::new(SeededJitter::new(seed)),
        None => Box::new(HashedDirection),
    }
}
