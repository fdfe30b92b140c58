//! MSVC C runtime `rand()` generator
//!
//! The ticket encoder draws its filler characters from this generator, so the
//! sequence has to match the C runtime bit for bit.

/// Linear congruential generator matching the MSVC CRT
#[derive(Debug, Clone)]
pub struct CrtRand {
    seed: u32,
}

impl CrtRand {
    /// Create a generator with the given seed (`srand`)
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Next value in `0..=0x7FFF` (`rand`)
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(0x0003_43FD).wrapping_add(0x0026_9EC3);
        (self.seed >> 16) & 0x7FFF
    }
}
