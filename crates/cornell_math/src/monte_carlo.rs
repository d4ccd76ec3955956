//! Small Monte Carlo experiments.
//!
//! These are standalone sanity checks of the sampling machinery the renderer
//! relies on: jittered (stratified) sampling against plain uniform sampling,
//! and integration with the cosine-weighted hemisphere density.

use crate::sampling::random_cosine_direction;
use rand::{Rng, RngCore};
use std::f64::consts::PI;

/// Result of the circle-area experiment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiEstimate {
    /// Estimate from `n` independent uniform samples.
    pub regular: f64,
    /// Estimate from one jittered sample per cell of a `sqrt_n x sqrt_n` grid.
    pub stratified: f64,
}

/// Estimate pi from the fraction of points in `[-1, 1]^2` that land inside
/// the unit circle, with and without stratification.
pub fn estimate_pi(sqrt_n: u32, rng: &mut dyn RngCore) -> PiEstimate {
    let mut inside_circle = 0u64;
    let mut inside_circle_stratified = 0u64;
    let cells = f64::from(sqrt_n);

    for i in 0..sqrt_n {
        for j in 0..sqrt_n {
            let x = rng.gen_range(-1.0..1.0f64);
            let y = rng.gen_range(-1.0..1.0f64);
            if x * x + y * y < 1.0 {
                inside_circle += 1;
            }

            let x = 2.0 * ((f64::from(i) + rng.gen::<f64>()) / cells) - 1.0;
            let y = 2.0 * ((f64::from(j) + rng.gen::<f64>()) / cells) - 1.0;
            if x * x + y * y < 1.0 {
                inside_circle_stratified += 1;
            }
        }
    }

    let n = cells * cells;
    PiEstimate {
        regular: 4.0 * inside_circle as f64 / n,
        stratified: 4.0 * inside_circle_stratified as f64 / n,
    }
}

/// Estimate the hemisphere integral of `cos^3(theta)` by sampling directions
/// with density `cos(theta) / pi`. The exact value is `pi / 2`.
pub fn estimate_cosine_cubed(n: u32, rng: &mut dyn RngCore) -> f64 {
    if n == 0 {
        return 0.0;
    }

    let sum: f64 = (0..n)
        .map(|_| {
            let z = f64::from(random_cosine_direction(rng).z);
            if z <= 0.0 {
                // Zero-density direction, contributes nothing.
                return 0.0;
            }
            z * z * z / (z / PI)
        })
        .sum();

    sum / f64::from(n)
}
