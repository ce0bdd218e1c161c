//! Vector math over TF-IDF document vectors.
//!
//! Pure Rust implementations without external dependencies. Extracted
//! vectors are unit-length, so cosine similarity reduces to a dot
//! product, but the functions stay correct for unnormalized input too.

/// Calculate cosine similarity between two vectors.
///
/// Returns a value in [-1.0, 1.0], or 0.0 when either vector has zero
/// norm (the extractor emits zero vectors for empty patent text).
///
/// # Panics
/// Panics if vectors have different dimensions.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Calculate the centroid of a group of document vectors.
///
/// Returns the component-wise mean re-normalized to unit length. An
/// all-zero group keeps a zero centroid, since normalization skips
/// zero-norm vectors.
pub fn calculate_centroid(vectors: &[&[f32]]) -> Vec<f32> {
    if vectors.is_empty() {
        return Vec::new();
    }

    let dim = vectors[0].len();
    let n = vectors.len() as f32;
    let mut centroid = vec![0.0f32; dim];

    for vector in vectors {
        assert_eq!(vector.len(), dim, "All vectors must have same dimension");
        for (i, &val) in vector.iter().enumerate() {
            centroid[i] += val;
        }
    }

    for val in centroid.iter_mut() {
        *val /= n;
    }

    normalize(&mut centroid);

    centroid
}

/// Normalize a vector to unit length in place.
///
/// Zero vectors are left untouched.
pub fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in v.iter_mut() {
            *val /= norm;
        }
    }
}

/// Whether every component of the vector is zero.
pub fn is_zero(v: &[f32]) -> bool {
    v.iter().all(|&x| x == 0.0)
}
