//! Free vector operations shared across the pipeline.

pub const EPSILON: f64 = 1e-8;

/// Dot product of two equal-length slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// L2-normalize in place. A (near-)zero vector is left untouched rather
/// than dividing into NaN.
pub fn l2_normalize(v: &mut [f64]) {
    let norm = l2_norm(v);
    if norm > 1e-12 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity. Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let na = l2_norm(a);
    let nb = l2_norm(b);
    if na <= 1e-12 || nb <= 1e-12 {
        return 0.0;
    }
    dot(a, b) / (na * nb)
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Feature normalization: zero mean, unit population variance,
/// ε-guarded denominator.
pub fn feature_normalize(v: &[f64]) -> Vec<f64> {
    let n = v.len() as f64;
    if v.is_empty() {
        return Vec::new();
    }
    let mean = v.iter().sum::<f64>() / n;
    let variance = v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let denom = (variance + EPSILON).sqrt();
    v.iter().map(|x| (x - mean) / denom).collect()
}

/// Mean and population variance of a slice.
pub fn mean_variance(v: &[f64]) -> (f64, f64) {
    if v.is_empty() {
        return (0.0, 0.0);
    }
    let n = v.len() as f64;
    let mean = v.iter().sum::<f64>() / n;
    let variance = v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
