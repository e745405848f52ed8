/// Small deterministic RNG used for procedural generation.
///
/// Construction takes an explicit seed so generated populations are
/// reproducible in tests; there is no global generator anywhere in the crate.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    pub fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform in [lo, hi).
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64_01()
    }

    /// Uniform integer in [0, n). `n` must be > 0.
    pub fn next_below(&mut self, n: u64) -> u64 {
        debug_assert!(n > 0);
        (self.next_f64_01() * n as f64) as u64
    }

    /// True with probability `p`.
    pub fn next_bool(&mut self, p: f64) -> bool {
        self.next_f64_01() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_is_deterministic() {
        let mut a = Rng64::new(123);
        let mut b = Rng64::new(123);
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn seeds_diverge() {
        let mut a = Rng64::new(1);
        let mut b = Rng64::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn f64_stays_in_unit_interval() {
        let mut rng = Rng64::new(42);
        for _ in 0..1000 {
            let v = rng.next_f64_01();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn next_below_covers_range() {
        let mut rng = Rng64::new(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let v = rng.next_below(4);
            assert!(v < 4);
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn next_bool_degenerate_probabilities() {
        let mut rng = Rng64::new(9);
        for _ in 0..100 {
            assert!(rng.next_bool(1.0));
            assert!(!rng.next_bool(0.0));
        }
    }

    #[test]
    fn next_range_respects_bounds() {
        let mut rng = Rng64::new(11);
        for _ in 0..100 {
            let v = rng.next_range(-3.0, 5.0);
            assert!((-3.0..5.0).contains(&v));
        }
    }
}
