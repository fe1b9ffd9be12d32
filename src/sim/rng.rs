//! Injected randomness
//!
//! Generation and particle emission only need uniform doubles in [0, 1).
//! Any `rand` generator works; tests can script exact sequences.

use rand::{Rng, RngCore};

/// Source of uniform doubles in [0, 1)
pub trait UnitRng {
    fn next_unit(&mut self) -> f64;

    /// Uniform in [lo, hi)
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Uniform index in [0, n)
    fn pick(&mut self, n: usize) -> usize {
        ((self.next_unit() * n as f64) as usize).min(n.saturating_sub(1))
    }
}

impl<R: RngCore> UnitRng for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays a fixed cycle of values (for tests and reproducible demos)
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<f64>,
    index: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, index: 0 }
    }

    /// Always returns the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl UnitRng for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.index % self.values.len()];
        self.index += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
