// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Random sources owned by the models

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Generator type held by every model instance
pub type SimRng = StdRng;

/// Seed stream for a node's environment model
pub const ENVIRONMENT_STREAM: u64 = 0;
/// Seed stream for a node's sensor model
pub const SENSOR_STREAM: u64 = 1;

/// Build a generator: deterministic when a seed is given, entropy-seeded otherwise
pub fn rng_from_seed(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Zero-mean Gaussian sample with the given standard deviation
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    std_dev * rng.sample::<f64, _>(StandardNormal)
}

/// Derive an independent seed for one model of one node from a run seed.
///
/// Streams never collide for distinct (node, stream) pairs in practice, and
/// the result does not depend on the order nodes are scheduled in.
pub fn derive_seed(base: u64, node: u64, stream: u64) -> u64 {
    let node_mix = splitmix64(base ^ node.wrapping_mul(0xA24B_AED4_963E_E407));
    splitmix64(node_mix ^ stream.wrapping_mul(0x9FB2_1C65_1E98_DF25))
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
