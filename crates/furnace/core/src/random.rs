//! Bounded random delays.
//!
//! Every delay and pacing value is drawn from a [`DelayDistribution`]: a
//! target with a deviation, clamped to `[min, max]`. The weighted shape adds
//! an exponential tail above the target so most samples land close to it and
//! a few run long; the plain shape is a normal distribution around the
//! target. Both always satisfy `min <= sample <= max`.
use rand::Rng;

use crate::error::ConfigError;

/// Parameters of one randomized delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayDistribution {
    pub weighted: bool,
    pub min: u64,
    pub max: u64,
    pub deviation: u64,
    pub target: u64,
}

impl DelayDistribution {
    pub const fn new(weighted: bool, min: u64, max: u64, deviation: u64, target: u64) -> Self {
        Self {
            weighted,
            min,
            max,
            deviation,
            target,
        }
    }

    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedBounds {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Same shape narrowed to `[min, max]`; the target is clamped into it.
    pub fn within(&self, min: u64, max: u64) -> Self {
        Self { min, max, ..*self }
    }

    /// Draws one value in `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.min >= self.max {
            return self.min;
        }
        let target = self.target.clamp(self.min, self.max) as f64;
        let deviation = self.deviation as f64;

        let raw = if self.weighted {
            // Exponential tail: -ln(U) is Exp(1).
            let u: f64 = rng.r#gen::<f64>().max(f64::MIN_POSITIVE);
            target + (-u.ln()) * deviation
        } else {
            target + standard_normal(rng) * deviation
        };

        (raw.round().max(0.0) as u64).clamp(self.min, self.max)
    }
}

/// Uniform integer in `[min, max]`. Collapses to `min` on an empty range.
pub fn between<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Box-Muller transform.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.r#gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * core::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    proptest! {
        #[test]
        fn samples_stay_in_bounds(
            weighted in any::<bool>(),
            min in 0u64..500,
            span in 0u64..2_000,
            deviation in 0u64..1_000,
            target in 0u64..3_000,
            seed in any::<u64>(),
        ) {
            let dist = DelayDistribution::new(weighted, min, min + span, deviation, target);
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..16 {
                let sample = dist.sample(&mut rng);
                prop_assert!(sample >= dist.min && sample <= dist.max);
            }
        }

        #[test]
        fn between_is_inclusive(min in 0u32..50, span in 0u32..50, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let value = between(&mut rng, min, min + span);
            prop_assert!(value >= min && value <= min + span);
        }
    }

    #[test]
    fn zero_deviation_returns_target() {
        let dist = DelayDistribution::new(false, 10, 100, 0, 40);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(dist.sample(&mut rng), 40);
    }

    #[test]
    fn weighted_samples_never_undershoot_target() {
        let dist = DelayDistribution::new(true, 0, 1_000, 50, 200);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            assert!(dist.sample(&mut rng) >= 200);
        }
    }

    #[test]
    fn narrowed_shape_clamps_the_target() {
        let dist = DelayDistribution::new(false, 0, 1_000, 0, 120);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(dist.within(10, 50).sample(&mut rng), 50);
        assert_eq!(dist.within(100, 200).sample(&mut rng), 120);
        assert_eq!(dist.within(200, 350).sample(&mut rng), 200);
    }

    #[test]
    fn inverted_bounds_fail_validation() {
        let dist = DelayDistribution::new(false, 10, 5, 0, 0);
        assert!(matches!(
            dist.validate("sleep"),
            Err(ConfigError::InvertedBounds { name: "sleep", .. })
        ));
    }
}
