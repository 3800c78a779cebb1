//! Seeded pseudo-random stream.
//!
//! Every random decision of the engine (which item fills a slot, how
//! alternatives are ordered) is drawn from a [`SeededRng`]. The mixing step is
//! mulberry32 on wrapping `u32` arithmetic, so a seed reproduces the same
//! sequence on every platform and in every release. Do not change the
//! constants: stored exams are reproduced from their seed.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const TWO_POW_32: f64 = 4_294_967_296.0;
const INCREMENT: u32 = 0x6D2B_79F5;

/// Deterministic generator of floats in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / TWO_POW_32
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// `floor(next() * len)`: a uniform index into a non-empty slice.
    pub fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick from an empty range");
        let index = (self.next_f64() * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }
}

/// Map any number onto a `u32` seed.
///
/// Finite input is truncated, made non-negative and reduced modulo 2^32.
/// `None`, NaN and infinities produce a fresh seed from the wall clock.
pub fn normalize_seed(raw: Option<f64>) -> u32 {
    match raw {
        Some(value) if value.is_finite() => (value.abs().trunc() % TWO_POW_32) as u32,
        _ => fresh_seed(),
    }
}

/// Parse a user-supplied seed such as `"42"` or `"-7.5"`.
pub fn parse_seed(input: &str) -> Result<u32, String> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| format!("invalid seed: '{trimmed}'"))?;
    if !value.is_finite() {
        return Err(format!("seed must be a finite number: '{trimmed}'"));
    }
    Ok(normalize_seed(Some(value)))
}

static FRESH_COUNTER: AtomicU32 = AtomicU32::new(0);

fn fresh_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    // Two calls within one clock tick still get different seeds.
    let counter = FRESH_COUNTER.fetch_add(1, Ordering::Relaxed) as u64;
    let mut x = nanos ^ counter.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    (x >> 32) as u32 ^ x as u32
}
