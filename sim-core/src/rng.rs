use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Random source used by the engine.
pub type SimRng = Pcg32;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> SimRng {
    Pcg32::seed_from_u64(seed)
}
