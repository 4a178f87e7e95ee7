//! Query subset selection by lazy greedy maximisation of a coverage objective.
//!
//! For candidates `e_j` with relevance `r_j = cos(reference, e_j)`:
//!
//! ```text
//! F(S) = sum_j max(alpha * r_j, max_{s in S} cos(e_s, e_j))
//! ```
//!
//! `F` is monotone submodular, so a stale marginal gain is always an upper
//! bound of the current one and lazy re-evaluation picks the same element as
//! plain greedy.

use std::{
  cmp::Ordering,
  collections::BinaryHeap,
  time::{Duration, Instant},
};

use anyhow::anyhow;
use querysim_shared::{AppError, Embedding, cosine_similarity};

use crate::{CountRange, Dataset, QueryGroup};

pub const DEFAULT_ALPHA: f64 = 0.3;

/// Undefined (zero-norm) similarities count as no coverage.
fn similarity(a: &[f32], b: &[f32]) -> f64 {
  let s = cosine_similarity(a, b);
  if s.is_nan() { 0.0 } else { s }
}

struct Coverage {
  /// `similarity[i][j]` between candidates `i` and `j`.
  similarity: Vec<Vec<f64>>,
  /// Current per-candidate coverage, starting at `alpha * r_j`.
  covered: Vec<f64>,
}

impl Coverage {
  fn new(candidates: &[Embedding], reference: &[f32], alpha: f64) -> Self {
    let covered = candidates
      .iter()
      .map(|c| alpha * similarity(reference, c))
      .collect();
    let matrix = candidates
      .iter()
      .map(|a| candidates.iter().map(|b| similarity(a, b)).collect())
      .collect();

    Self {
      similarity: matrix,
      covered,
    }
  }

  /// `F(S + {candidate}) - F(S)` for the current `S`.
  fn marginal_gain(&self, candidate: usize) -> f64 {
    self.similarity[candidate]
      .iter()
      .zip(&self.covered)
      .map(|(s, c)| (s - c).max(0.0))
      .sum()
  }

  fn add(&mut self, candidate: usize) {
    for (c, s) in self.covered.iter_mut().zip(&self.similarity[candidate]) {
      *c = c.max(*s);
    }
  }
}

/// Heap entry; `stamp` is the iteration in which `gain` was computed.
#[derive(Debug, Clone, Copy)]
struct Entry {
  gain: f64,
  stamp: usize,
  index: usize,
}

impl Ord for Entry {
  // Highest gain first; ties go to the lower index.
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .gain
      .total_cmp(&other.gain)
      .then_with(|| other.index.cmp(&self.index))
  }
}

impl PartialOrd for Entry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for Entry {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for Entry {}

/// Pick `k` candidate indices, in selection order.
pub fn lazy_greedy_select(
  candidates: &[Embedding],
  reference: &[f32],
  k: usize,
  alpha: f64,
) -> Result<Vec<usize>, AppError> {
  if k > candidates.len() {
    return Err(
      anyhow!(
        "cannot select {k} queries from {} candidates",
        candidates.len()
      )
      .into(),
    );
  }

  let mut coverage = Coverage::new(candidates, reference, alpha);
  let mut heap: BinaryHeap<Entry> = (0..candidates.len())
    .map(|index| Entry {
      gain: coverage.marginal_gain(index),
      stamp: 0,
      index,
    })
    .collect();

  let mut selected = Vec::with_capacity(k);
  let mut evaluations = candidates.len();
  for iteration in 0..k {
    loop {
      let top = heap
        .pop()
        .ok_or_else(|| anyhow!("candidate heap exhausted at iteration {iteration}"))?;

      if top.stamp == iteration {
        coverage.add(top.index);
        selected.push(top.index);
        break;
      }

      evaluations += 1;
      heap.push(Entry {
        gain: coverage.marginal_gain(top.index),
        stamp: iteration,
        index: top.index,
      });
    }
  }

  tracing::debug!(k, candidates = candidates.len(), evaluations, "Lazy greedy selection done");
  Ok(selected)
}

/// Outcome of one selection for a given `k`.
#[derive(Debug, Clone)]
pub struct SelectionRun {
  pub k: u32,
  pub indices: Vec<usize>,
  pub elapsed: Duration,
}

/// Run selection from one group for every `k` in `counts`.
///
/// Returns the runs and a dataset holding the selected embeddings as a
/// `"{k}_queries"` group per run, with the reference copied over.
pub fn select_groups(
  dataset: &Dataset,
  group: &QueryGroup,
  counts: CountRange,
  alpha: f64,
) -> Result<(Vec<SelectionRun>, Dataset), AppError> {
  let mut runs = Vec::new();
  let mut output = Dataset {
    original_query: dataset.original_query.clone(),
    reference: dataset.reference.clone(),
    groups: Vec::new(),
  };

  for k in counts.counts() {
    let started = Instant::now();
    let indices = lazy_greedy_select(&group.embeddings, &dataset.reference, k as usize, alpha)?;
    let elapsed = started.elapsed();

    output.groups.push(QueryGroup {
      number: k,
      embeddings: indices
        .iter()
        .map(|&i| group.embeddings[i].clone())
        .collect(),
    });
    runs.push(SelectionRun {
      k,
      indices,
      elapsed,
    });
  }

  Ok((runs, output))
}
