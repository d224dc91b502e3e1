use noise::{NoiseFn, Perlin, Seedable};

/// Octave settings for fractal sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Octaves {
    pub base_scale: f64,
    pub count: u32,
    pub persistence: f64,
    pub lacunarity: f64,
}

/// Seeded 2D gradient noise. Output is always within [-1, 1].
#[derive(Clone, Debug)]
pub struct NoiseField {
    source: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            source: Perlin::new(seed),
        }
    }

    /// Derive a field from a 64-bit game seed.
    pub fn from_game_seed(seed: u64) -> Self {
        Self::new(fold_seed(seed))
    }

    /// Rebuild the permutation table. Same seed, same field.
    pub fn seed(&mut self, seed: u32) {
        self.source = self.source.set_seed(seed);
    }

    pub fn current_seed(&self) -> u32 {
        self.source.seed()
    }

    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let v = self.source.get([x, y]);
        if v.is_finite() {
            v.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Octave sum normalized by total amplitude.
    pub fn fbm(&self, x: f64, y: f64, octaves: &Octaves) -> f64 {
        let mut total = 0.0;
        let mut frequency = octaves.base_scale;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.count.max(1) {
            total += self.noise2d(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            frequency *= octaves.lacunarity;
            amplitude *= octaves.persistence;
        }

        if max_amplitude > 0.0 {
            (total / max_amplitude).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}
