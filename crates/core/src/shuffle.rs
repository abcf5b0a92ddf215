use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Uniform random permutations and subsets.
///
/// Uses Fisher-Yates through `SliceRandom::shuffle`. Inputs are borrowed and
/// never reordered in place.
#[derive(Debug, Clone)]
pub struct Shuffler {
    rng: StdRng,
}

impl Shuffler {
    /// A shuffler seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A reproducible shuffler, for tests and replays.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns the elements of `items` in uniformly random order.
    #[must_use]
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        out.shuffle(&mut self.rng);
        out
    }

    /// Draws `min(k, items.len())` elements without replacement, in random order.
    #[must_use]
    pub fn sample<T: Clone>(&mut self, items: &[T], k: usize) -> Vec<T> {
        let mut out = self.shuffle(items);
        out.truncate(k);
        out
    }
}

impl Default for Shuffler {
    fn default() -> Self {
        Self::new()
    }
}
