use crate::DIE_FACES;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform face value in `1..=DIE_FACES`.
    pub fn roll_face(&mut self) -> u8 {
        self.rng.gen_range(1..=DIE_FACES)
    }
}
