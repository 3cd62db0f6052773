use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::foundation::error::{WallError, WallResult};

/// RNG type owned by every randomized service.
pub type WallRng = StdRng;

/// Build a service RNG: seeded for reproducible runs, OS-seeded otherwise.
pub fn seeded_rng(seed: Option<u64>) -> WallRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Uniform float in `[min, max)`.
///
/// Degenerate or inverted ranges do not panic: `min == max` returns `min`, and an inverted
/// range samples between the two bounds.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.random::<f64>() * (max - min)
}

/// Uniform integer in `[min, max]` (both inclusive).
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    random_range(rng, min as f64, (max + 1) as f64).floor() as i64
}

/// Pick one element uniformly.
///
/// An empty table is a programming error and is reported instead of returning a placeholder.
pub fn random_choice<'a, R: Rng + ?Sized, T>(rng: &mut R, items: &'a [T]) -> WallResult<&'a T> {
    if items.is_empty() {
        return Err(WallError::empty_choice("cannot choose from an empty slice"));
    }
    let last = items.len() as i64 - 1;
    let i = random_int(rng, 0, last).clamp(0, last) as usize;
    Ok(&items[i])
}

/// `true` with the given probability (`0.0..=1.0`).
pub fn random_bool<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.random::<f64>() < probability
}

/// Return a shuffled copy of `items` (Fisher-Yates).
pub fn shuffle<R: Rng + ?Sized, T: Clone>(rng: &mut R, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/random.rs"]
mod tests;
