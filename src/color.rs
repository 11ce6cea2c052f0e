use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of fallback node colors.
pub struct ColorPicker {
    rng: StdRng,
}

impl ColorPicker {
    /// A seeded picker yields the same colors for the same seed; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn next_color(&mut self) -> String {
        let value: u32 = self.rng.gen_range(0..0x00ff_ffff);
        format!("#{:06x}", value)
    }
}
