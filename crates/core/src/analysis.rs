use querysim_shared::{Embedding, MAX_GROUPS, group_key, similarity::batch_cosine_similarity};

use crate::Dataset;

/// Similarity distributions for one present query group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAnalysis {
  /// Group number `n` of the `"{n}_queries"` key this result came from.
  pub number: u32,
  /// Reference embedding vs every member, in member order.
  pub reference_similarities: Vec<f64>,
  /// Every unordered member pair `(i, j)` with `i < j`, in lexicographic order.
  /// Empty for groups with fewer than two members.
  pub within_group_similarities: Vec<f64>,
}

impl GroupAnalysis {
  #[must_use]
  pub fn label(&self) -> String {
    group_key(self.number)
  }
}

/// Per-group results, compacted to the groups present in the dataset.
///
/// Position `i` is the `i`-th present group in ascending group number, not
/// group `i + 1`. Each entry carries its own number so labels never have to
/// be re-derived from positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
  pub groups: Vec<GroupAnalysis>,
}

impl Analysis {
  #[must_use]
  pub fn len(&self) -> usize {
    self.groups.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  /// Reference-vs-member lists, one per present group.
  #[must_use]
  pub fn reference_similarities(&self) -> Vec<&[f64]> {
    self
      .groups
      .iter()
      .map(|g| g.reference_similarities.as_slice())
      .collect()
  }

  /// Member-vs-member lists, one per present group.
  #[must_use]
  pub fn within_group_similarities(&self) -> Vec<&[f64]> {
    self
      .groups
      .iter()
      .map(|g| g.within_group_similarities.as_slice())
      .collect()
  }
}

/// Cosine similarity of every unordered pair of distinct members.
///
/// Pairs are enumerated first index ascending, then second index ascending
/// and greater than the first.
#[must_use]
pub fn pairwise_similarities(embeddings: &[Embedding]) -> Vec<f64> {
  let n = embeddings.len();
  let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
  for (i, a) in embeddings.iter().enumerate() {
    for b in &embeddings[i + 1..] {
      out.push(querysim_shared::cosine_similarity(a, b));
    }
  }
  out
}

pub fn analyze(dataset: &Dataset) -> Analysis {
  let mut groups = Vec::with_capacity(dataset.groups.len());

  for number in 1..=MAX_GROUPS {
    let Some(group) = dataset.group(number) else {
      continue;
    };

    let reference_similarities = batch_cosine_similarity(&dataset.reference, &group.embeddings);
    let within_group_similarities = pairwise_similarities(&group.embeddings);

    let undefined = reference_similarities
      .iter()
      .chain(&within_group_similarities)
      .filter(|s| s.is_nan())
      .count();
    if undefined > 0 {
      tracing::warn!(
        group = %group.label(),
        undefined,
        "Zero-norm embeddings produced undefined (NaN) similarities"
      );
    }

    tracing::debug!(
      group = %group.label(),
      members = group.embeddings.len(),
      pairs = within_group_similarities.len(),
      "Analyzed group"
    );

    groups.push(GroupAnalysis {
      number,
      reference_similarities,
      within_group_similarities,
    });
  }

  Analysis { groups }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  const EPS: f64 = 1e-9;

  fn dataset(value: serde_json::Value) -> Dataset {
    Dataset::from_json(value).unwrap()
  }

  #[test]
  fn singleton_group_has_no_pairs() {
    let analysis = analyze(&dataset(json!({
      "original_query_embedding": [1.0, 0.0],
      "1_queries": [[0.6, 0.8]],
    })));

    assert_eq!(analysis.len(), 1);
    assert_eq!(analysis.groups[0].reference_similarities.len(), 1);
    assert!(analysis.groups[0].within_group_similarities.is_empty());
  }

  #[test]
  fn two_member_group_has_one_pair() {
    let analysis = analyze(&dataset(json!({
      "original_query_embedding": [1.0, 0.0],
      "2_queries": [[1.0, 0.0], [0.0, 1.0]],
    })));

    let group = &analysis.groups[0];
    assert_eq!(group.number, 2);
    assert_eq!(group.reference_similarities.len(), 2);
    assert_eq!(group.within_group_similarities.len(), 1);
    assert!(group.within_group_similarities[0].abs() < EPS);
  }

  #[test]
  fn absent_groups_are_compacted_out() {
    let analysis = analyze(&dataset(json!({
      "original_query_embedding": [1.0, 0.0],
      "6_queries": [[0.0, 1.0]],
      "1_queries": [[1.0, 0.0]],
    })));

    assert_eq!(analysis.len(), 2);
    assert_eq!(analysis.reference_similarities().len(), 2);
    assert_eq!(analysis.within_group_similarities().len(), 2);
    let labels: Vec<String> = analysis.groups.iter().map(GroupAnalysis::label).collect();
    assert_eq!(labels, vec!["1_queries", "6_queries"]);
    // Position 1 holds group 6's data, not group 2's.
    assert!(analysis.reference_similarities()[1][0].abs() < EPS);
  }

  #[test]
  fn reference_similarities_follow_member_order() {
    let analysis = analyze(&dataset(json!({
      "original_query_embedding": [1.0, 0.0, 0.0],
      "1_queries": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    })));

    let sims = &analysis.groups[0].reference_similarities;
    assert!((sims[0] - 1.0).abs() < EPS);
    assert!(sims[1].abs() < EPS);
  }

  #[test]
  fn pairs_are_enumerated_lexicographically() {
    // Unit vectors at 0, 90 and 180 degrees.
    let members = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]];
    let sims = pairwise_similarities(&members);

    assert_eq!(sims.len(), 3);
    assert!(sims[0].abs() < EPS); // (0, 1)
    assert!((sims[1] + 1.0).abs() < EPS); // (0, 2)
    assert!(sims[2].abs() < EPS); // (1, 2)
  }

  #[test]
  fn pair_count_is_n_choose_two() {
    let members: Vec<Embedding> = (0..6).map(|i| vec![1.0, i as f32]).collect();
    assert_eq!(pairwise_similarities(&members).len(), 15);
    assert!(pairwise_similarities(&[]).is_empty());
  }

  #[test]
  fn empty_group_is_kept_with_empty_lists() {
    let analysis = analyze(&dataset(json!({
      "original_query_embedding": [1.0],
      "4_queries": [],
    })));

    assert_eq!(analysis.len(), 1);
    assert!(analysis.groups[0].reference_similarities.is_empty());
    assert!(analysis.groups[0].within_group_similarities.is_empty());
  }

  #[test]
  fn zero_vector_yields_nan() {
    let analysis = analyze(&dataset(json!({
      "original_query_embedding": [1.0, 0.0],
      "2_queries": [[0.0, 0.0], [1.0, 0.0]],
    })));

    let group = &analysis.groups[0];
    assert!(group.reference_similarities[0].is_nan());
    assert!((group.reference_similarities[1] - 1.0).abs() < EPS);
    assert!(group.within_group_similarities[0].is_nan());
  }
}
