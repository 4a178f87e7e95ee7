//! Descriptive statistics over similarity samples.
//!
//! NaN inputs are not filtered: a single NaN makes the mean and standard
//! deviation NaN, the same way it would in any sum.

#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }
  Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
#[must_use]
pub fn std_dev(values: &[f64]) -> Option<f64> {
  let mean = mean(values)?;
  let variance = values
    .iter()
    .map(|v| {
      let d = v - mean;
      d * d
    })
    .sum::<f64>()
    / values.len() as f64;
  Some(variance.sqrt())
}

/// Mean and population standard deviation of a non-empty sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanStd {
  pub mean: f64,
  pub std: f64,
}

impl MeanStd {
  #[must_use]
  pub fn of(values: &[f64]) -> Option<Self> {
    Some(Self {
      mean: mean(values)?,
      std: std_dev(values)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_sample_has_no_statistics() {
    assert_eq!(mean(&[]), None);
    assert_eq!(std_dev(&[]), None);
    assert_eq!(MeanStd::of(&[]), None);
  }

  #[test]
  fn population_std_dev() {
    let s = MeanStd::of(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert!((s.mean - 2.5).abs() < 1e-12);
    assert!((s.std - 1.25_f64.sqrt()).abs() < 1e-12);
  }

  #[test]
  fn single_value_has_zero_spread() {
    let s = MeanStd::of(&[0.42]).unwrap();
    assert!((s.mean - 0.42).abs() < 1e-12);
    assert_eq!(s.std, 0.0);
  }

  #[test]
  fn nan_propagates() {
    let s = MeanStd::of(&[0.5, f64::NAN]).unwrap();
    assert!(s.mean.is_nan());
    assert!(s.std.is_nan());
  }
}
