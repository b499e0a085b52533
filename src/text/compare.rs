use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

const SLOTS: usize = 128;
const PRIME: u64 = (1 << 61) - 1;
const SEED: u64 = 0x5EED_D0C5;

/// `(a, b)` for the hash family `(a * x + b) mod PRIME`, one pair per slot.
static PERMUTATIONS: Lazy<Vec<(u64, u64)>> = Lazy::new(|| {
    let mut state = SEED;
    (0..SLOTS)
        .map(|_| {
            let a = splitmix64(&mut state) % (PRIME - 1) + 1;
            let b = splitmix64(&mut state) % PRIME;
            (a, b)
        })
        .collect()
});

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Longest run of whitespace-delimited words shared by both texts. The
/// earliest run in `left` wins ties.
pub fn longest_common_substring(left: &str, right: &str) -> String {
    let left: Vec<&str> = left.split_whitespace().collect();
    let right: Vec<&str> = right.split_whitespace().collect();

    let mut previous = vec![0usize; right.len() + 1];
    let (mut best_len, mut best_end) = (0, 0);
    for i in 1..=left.len() {
        let mut current = vec![0usize; right.len() + 1];
        for j in 1..=right.len() {
            if left[i - 1] == right[j - 1] {
                current[j] = previous[j - 1] + 1;
                if current[j] > best_len {
                    best_len = current[j];
                    best_end = i;
                }
            }
        }
        previous = current;
    }
    left[best_end - best_len..best_end].join(" ")
}

/// Word bigrams, lowercased. A one-word text is its own shingle.
fn shingles(text: &str) -> HashSet<String> {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    if words.len() == 1 {
        return words.into_iter().collect();
    }
    words.windows(2).map(|pair| pair.join(" ")).collect()
}

fn shingle_hash(shingle: &str) -> u64 {
    let digest = Sha256::digest(shingle.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes) % PRIME
}

fn signature(shingles: &HashSet<String>) -> Vec<u64> {
    let hashes: Vec<u64> = shingles.iter().map(|shingle| shingle_hash(shingle)).collect();
    PERMUTATIONS
        .iter()
        .map(|&(a, b)| {
            hashes
                .iter()
                .map(|&hash| ((a as u128 * hash as u128 + b as u128) % PRIME as u128) as u64)
                .min()
                .unwrap_or(u64::MAX)
        })
        .collect()
}

/// Estimated Jaccard similarity of the two texts' word bigrams, in `[0, 1]`.
pub fn minhash_similarity(left: &str, right: &str) -> f64 {
    let (left, right) = (shingles(left), shingles(right));
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }
    let matching = signature(&left)
        .iter()
        .zip(signature(&right).iter())
        .filter(|(a, b)| a == b)
        .count();
    matching as f64 / SLOTS as f64
}
