//! Deterministic random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical deals
//! - **Derivable**: Simulation copies get their own stream without touching
//!   the canonical generator
//! - **Comparable**: O(1) state capture, used for equality of game states
//!
//! ```
//! use bluemoon::core::GameRng;
//!
//! let rng = GameRng::new(1234);
//!
//! // A derived stream never advances the parent.
//! let mut sim = rng.derive(1);
//! let before = rng.state();
//! let mut deck: Vec<u8> = (0..30).collect();
//! sim.shuffle(&mut deck);
//! assert_eq!(rng.state(), before);
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic RNG backing deck shuffles and draws.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    derivations: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            derivations: 0,
        }
    }

    /// Derive an independent stream keyed on the current position and `salt`.
    ///
    /// Takes `&self`: the parent is left untouched, so forecasting on a copy
    /// of the game never changes what the canonical game will draw next.
    #[must_use]
    pub fn derive(&self, salt: u64) -> Self {
        let position = self.inner.get_word_pos() as u64;
        let seed = self
            .seed
            .wrapping_add(position.wrapping_mul(GOLDEN_GAMMA))
            .wrapping_add(salt.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA.rotate_left(17)));
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            derivations: self.derivations.wrapping_add(1),
        }
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Current stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            derivations: self.derivations,
        }
    }
}

impl PartialEq for GameRng {
    fn eq(&self, other: &Self) -> bool {
        self.state() == other.state()
    }
}

impl Eq for GameRng {}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position, so capture is O(1) regardless of how
/// many numbers have been drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    pub derivations: u64,
}
