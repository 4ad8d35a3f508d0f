//! Shared random-draw helpers for the generator.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Characters node names are drawn from. The same set serves as the
/// allowlist handed to the text recognizer.
pub const NAME_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

const NAME_LEN_MEAN: f64 = 7.0;
const NAME_LEN_STD: f64 = 1.8;
const NAME_LEN_MIN: i64 = 1;
const NAME_LEN_MAX: i64 = 16;

/// Draws an integer from a normal distribution, rounded to the nearest
/// integer and clamped to `[low, high]`.
pub fn normal_int<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64, low: i64, high: i64) -> i64 {
    debug_assert!(low <= high, "empty clamp range [{low}, {high}]");
    let normal = Normal::new(mean, std_dev).expect("finite mean and positive std dev");
    let drawn = normal.sample(rng).round() as i64;
    drawn.clamp(low, high)
}

/// Generates a random node name: lowercase letters, length drawn from a
/// truncated normal distribution.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let length = normal_int(rng, NAME_LEN_MEAN, NAME_LEN_STD, NAME_LEN_MIN, NAME_LEN_MAX) as usize;
    let alphabet = NAME_ALPHABET.as_bytes();
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn normal_int_respects_clamp() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = normal_int(&mut rng, 6.5, 1.0, 3, 25);
            assert!((3..=25).contains(&v));
        }
    }

    #[test]
    fn random_name_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let name = random_name(&mut rng);
            assert!(!name.is_empty() && name.len() <= 16);
            assert!(name.chars().all(|c| c.is_ascii_lowercase()));
        }
    }
}
