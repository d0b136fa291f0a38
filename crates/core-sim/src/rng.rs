use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of every random draw the simulator makes.
///
/// Only `next_unit` is required; the derived draws are built on it so a
/// scripted source controls every branch the poller takes.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }

    /// Uniform integer in `low..=high`.
    fn int_inclusive(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }

        let span = (high - low + 1) as f64;
        let offset = (self.next_unit() * span).floor() as i64;
        low + offset.min(high - low)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }

    /// Index into a collection of `len` items. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index requires a non-empty collection");
        let idx = (self.next_unit() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}

pub fn pick<'a, T, R>(rng: &mut R, items: &'a [T]) -> &'a T
where
    R: RandomSource + ?Sized,
{
    &items[rng.index(items.len())]
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// OS-seeded source used by the running server.
#[derive(Debug, Clone)]
pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Small LCG with a fixed, platform-independent sequence.
#[derive(Debug, Clone)]
pub struct SeededSource {
    state: u64,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        let value = next_u64(&mut self.state);
        (value >> 11) as f64 / (1_u64 << 53) as f64
    }
}

fn next_u64(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

/// Replays a fixed list of unit draws, then repeats the last one forever.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    last: f64,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().map(clamp_unit).collect(),
            last: 0.0,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self {
            draws: VecDeque::new(),
            last: clamp_unit(value),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if let Some(value) = self.draws.pop_front() {
            self.last = value;
        }
        self.last
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.0
    }
}
