/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in [-1.0, 1.0] where 1.0 means identical direction.
/// If either vector has zero norm the similarity is undefined and `f64::NAN`
/// is returned; callers decide whether to propagate or substitute it.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
  debug_assert_eq!(a.len(), b.len(), "embedding dimensions must match");

  let mut dot = 0.0_f64;
  let mut norm_a = 0.0_f64;
  let mut norm_b = 0.0_f64;

  for (&x, &y) in a.iter().zip(b.iter()) {
    let x = f64::from(x);
    let y = f64::from(y);
    dot = x.mul_add(y, dot);
    norm_a = x.mul_add(x, norm_a);
    norm_b = y.mul_add(y, norm_b);
  }

  let denom = norm_a.sqrt() * norm_b.sqrt();
  if denom == 0.0 {
    return f64::NAN;
  }

  dot / denom
}

/// Similarity of `query` to each candidate, in candidate order.
pub fn batch_cosine_similarity(query: &[f32], candidates: &[Vec<f32>]) -> Vec<f64> {
  candidates
    .iter()
    .map(|candidate| cosine_similarity(query, candidate))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  const EPS: f64 = 1e-9;

  #[test]
  fn identical_vectors_are_one() {
    let v = [0.3_f32, -1.2, 4.0, 0.5];
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < EPS);
  }

  #[test]
  fn orthogonal_vectors_are_zero() {
    assert!(cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).abs() < EPS);
    assert!(cosine_similarity(&[1.0, 1.0], &[1.0, -1.0]).abs() < EPS);
  }

  #[test]
  fn opposite_vectors_are_minus_one() {
    let v = [2.0_f32, -3.0, 1.0];
    let w = [-2.0_f32, 3.0, -1.0];
    assert!((cosine_similarity(&v, &w) + 1.0).abs() < EPS);
  }

  #[test]
  fn scale_does_not_matter() {
    let v = [1.0_f32, 2.0, 3.0];
    let w = [10.0_f32, 20.0, 30.0];
    assert!((cosine_similarity(&v, &w) - 1.0).abs() < EPS);
  }

  #[test]
  fn zero_norm_is_nan() {
    assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_nan());
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]).is_nan());
    assert!(cosine_similarity(&[], &[]).is_nan());
  }

  #[test]
  fn batch_preserves_order() {
    let query = [1.0_f32, 0.0];
    let candidates = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![-1.0, 0.0]];
    let sims = batch_cosine_similarity(&query, &candidates);
    assert_eq!(sims.len(), 3);
    assert!(sims[0].abs() < EPS);
    assert!((sims[1] - 1.0).abs() < EPS);
    assert!((sims[2] + 1.0).abs() < EPS);
  }
}
