//! Hashing and seeded randomness for the approximate kernels

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;

/// 64-bit mixer (xorshift-multiply chain). Used to derive the keyed offset
/// for min-hashing from the user's seed.
pub fn hash64(v: u64) -> u64 {
    let mut v = v
        .wrapping_mul(3_935_559_000_370_003_845)
        .wrapping_add(2_691_343_689_449_507_681);
    v ^= v >> 21;
    v ^= v << 37;
    v ^= v >> 4;
    v = v.wrapping_mul(4_768_777_513_237_032_717);
    v ^= v << 20;
    v ^= v >> 41;
    v ^= v << 5;
    v
}

/// splitmix64 finalizer. This is the keyed hash applied to closed-neighborhood
/// members when building MinHash fingerprints.
pub fn hash64_2(x: u64) -> u64 {
    let mut x = x;
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// Normals are generated in fixed-size chunks with per-chunk seeds, so the
/// output depends only on `seed` and never on the rayon schedule.
const NORMALS_CHUNK: usize = 1 << 16;

/// Generate `count` i.i.d. standard-normal samples, deterministic in `seed`.
pub fn random_normals(count: usize, seed: u64) -> Vec<f32> {
    let mut normals = vec![0.0f32; count];
    normals
        .par_chunks_mut(NORMALS_CHUNK)
        .enumerate()
        .for_each(|(chunk_id, chunk)| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed ^ hash64(chunk_id as u64));
            for slot in chunk.iter_mut() {
                *slot = StandardNormal.sample(&mut rng);
            }
        });
    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_deterministic_and_spread() {
        assert_eq!(hash64(42), hash64(42));
        assert_eq!(hash64_2(42), hash64_2(42));
        assert_ne!(hash64(1), hash64(2));
        assert_ne!(hash64_2(1), hash64_2(2));
        assert_ne!(hash64(7), hash64_2(7));
    }

    #[test]
    fn normals_depend_only_on_seed() {
        let a = random_normals(100_000, 7);
        let b = random_normals(100_000, 7);
        let c = random_normals(100_000, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn normals_are_roughly_standard() {
        let samples = random_normals(100_000, 1);
        let mean: f64 = samples.iter().map(|&x| x as f64).sum::<f64>() / samples.len() as f64;
        let variance: f64 =
            samples.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.05, "mean {} too far from 0", mean);
        assert!((variance - 1.0).abs() < 0.05, "variance {} too far from 1", variance);
    }
}
