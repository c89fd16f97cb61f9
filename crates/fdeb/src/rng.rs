//! Deterministic randomness for initial node jitter.

/// Source of uniform samples. Injected into [`crate::Graph::set_with_rng`] so fixtures
/// can pin the initial node velocities.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f64_unit(&mut self) -> f64;

    /// Uniform sample in `[-1, 1)`.
    fn next_f64_signed(&mut self) -> f64 {
        self.next_f64_unit() * 2.0 - 1.0
    }
}

#[derive(Debug, Clone)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }
}

impl RandomSource for XorShift64Star {
    fn next_f64_unit(&mut self) -> f64 {
        // 53 bits of precision.
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }
}
