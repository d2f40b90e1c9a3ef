//! Shared text normalisation and feature hashing.
//!
//! Every predictor sees the same token stream: lowercased, digits stripped,
//! split on non-alphanumeric runs. Hashed features use FNV-1a rather than
//! the standard library hasher because model artifacts persist across
//! processes and `DefaultHasher` makes no cross-release stability promise.

/// Normalise and split a message into tokens.
///
/// Lowercases, drops digits, and splits on anything that is not an ASCII
/// letter. `"You've WON £1000!!"` → `["you", "ve", "won"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// FNV-1a hash of a token.
pub fn fnv1a(token: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for b in token.as_bytes() {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Hash tokens into a fixed-dimension count vector, L2-normalised.
///
/// Returns the zero vector for an empty token list, and the empty vector
/// for a zero dimension (there are no buckets to count into).
pub fn hashed_counts(tokens: &[String], dim: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; dim];
    if dim == 0 {
        return v;
    }
    for t in tokens {
        let bucket = (fnv1a(t) % dim as u64) as usize;
        v[bucket] += 1.0;
    }
    normalize(&mut v);
    v
}

/// L2-normalise a vector in place. The zero vector is left untouched.
pub fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
