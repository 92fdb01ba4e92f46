//! Injectable randomness.
//!
//! The stages never touch a generator directly; they draw through
//! [`RandomSource`] so tests can script every draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform pick among `{-1, 0, +1}`.
    fn lateral_offset(&mut self) -> isize;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn lateral_offset(&mut self) -> isize {
        (**self).lateral_offset()
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn lateral_offset(&mut self) -> isize {
        (**self).lateral_offset()
    }
}

/// Adapts any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }

    pub fn from_os() -> Self {
        RngSource(StdRng::from_os_rng())
    }

    /// Seeded when `seed` is given, OS-seeded otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os(),
        }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.0.random::<f64>()
    }

    #[inline]
    fn lateral_offset(&mut self) -> isize {
        self.0.random_range(-1i32..=1) as isize
    }
}

/// Replays scripted draws, then falls back to constants once a queue runs dry.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    uniforms: VecDeque<f64>,
    offsets: VecDeque<isize>,
    fallback_uniform: f64,
    fallback_offset: isize,
}

impl SequenceSource {
    pub fn new<U, O>(uniforms: U, offsets: O) -> Self
    where
        U: IntoIterator<Item = f64>,
        O: IntoIterator<Item = isize>,
    {
        Self {
            uniforms: uniforms.into_iter().collect(),
            offsets: offsets.into_iter().collect(),
            fallback_uniform: 0.0,
            fallback_offset: 0,
        }
    }

    /// Every draw returns the same values.
    pub fn constant(uniform: f64, offset: isize) -> Self {
        Self::new(Vec::new(), Vec::new()).with_fallback(uniform, offset)
    }

    pub fn with_fallback(mut self, uniform: f64, offset: isize) -> Self {
        self.fallback_uniform = uniform;
        self.fallback_offset = offset;
        self
    }
}

impl RandomSource for SequenceSource {
    fn uniform(&mut self) -> f64 {
        self.uniforms.pop_front().unwrap_or(self.fallback_uniform)
    }

    fn lateral_offset(&mut self) -> isize {
        self.offsets.pop_front().unwrap_or(self.fallback_offset)
    }
}
