//! Auto-discovery selection
//!
//! Suggestions arrive ranked by relevance. Selection is biased exponentially
//! toward the top of the list while still letting lower-ranked tracks through:
//!
//! ```text
//! x ~ U(-1, 0]
//! y = e^(4x)            y in (e^-4, 1]
//! index = floor(y * n)  clamped to [0, n-1]
//! ```
//!
//! For `n = 10` this lands on index 0 about 42% of the time and on index 9
//! under 3% of the time.

use encore_core::Track;
use rand::Rng;

/// Steepness of the bias toward the first suggestion
const BIAS: f64 = 4.0;

/// Draw a suggestion index in `[0, n-1]`
///
/// Returns `None` when there is nothing to choose from.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }

    // gen() is in [0, 1), so x is in (-1, 0]
    let x = -rng.gen::<f64>();
    let y = (BIAS * x).exp();
    let index = (y * n as f64).floor() as usize;

    Some(index.min(n - 1))
}

/// Pick one of the ranked suggestions
pub fn pick_suggestion<'a, R: Rng + ?Sized>(
    rng: &mut R,
    suggestions: &'a [Track],
) -> Option<&'a Track> {
    weighted_index(rng, suggestions.len()).map(|i| &suggestions[i])
}
