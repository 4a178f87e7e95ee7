use std::path::Path;

use anyhow::{Context, anyhow};
use querysim_shared::{
  AppError, Embedding, MAX_GROUPS, group_key,
  group::{ORIGINAL_QUERY_KEY, REFERENCE_EMBEDDING_KEY},
};
use serde_json::{Map, Value};

use crate::json_file::read_json;

/// One `"{n}_queries"` group of an embeddings file.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryGroup {
  pub number: u32,
  pub embeddings: Vec<Embedding>,
}

impl QueryGroup {
  #[must_use]
  pub fn label(&self) -> String {
    group_key(self.number)
  }
}

/// Parsed embeddings file: the reference embedding plus its present groups.
///
/// `groups` is sorted by group number and only holds groups found in the
/// file; absent numbers leave no placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
  pub original_query: Option<String>,
  pub reference: Embedding,
  pub groups: Vec<QueryGroup>,
}

impl Dataset {
  pub fn from_json(value: Value) -> Result<Self, AppError> {
    let Value::Object(mut map) = value else {
      return Err(anyhow!("embeddings file must contain a JSON object").into());
    };

    let reference = map
      .remove(REFERENCE_EMBEDDING_KEY)
      .ok_or_else(|| anyhow!("missing key `{REFERENCE_EMBEDDING_KEY}`"))?;
    let reference: Embedding = serde_json::from_value(reference)
      .with_context(|| format!("`{REFERENCE_EMBEDDING_KEY}` must be an array of numbers"))?;

    let original_query = match map.remove(ORIGINAL_QUERY_KEY) {
      Some(Value::String(query)) => Some(query),
      _ => None,
    };

    let mut groups = Vec::new();
    for number in 1..=MAX_GROUPS {
      let key = group_key(number);
      let Some(value) = map.remove(&key) else {
        continue;
      };
      let embeddings: Vec<Embedding> = serde_json::from_value(value)
        .with_context(|| format!("`{key}` must be an array of number arrays"))?;
      groups.push(QueryGroup { number, embeddings });
    }

    Ok(Self {
      original_query,
      reference,
      groups,
    })
  }

  #[must_use]
  pub fn group(&self, number: u32) -> Option<&QueryGroup> {
    self.groups.iter().find(|g| g.number == number)
  }

  /// Dimension of the reference embedding.
  #[must_use]
  pub fn dimension(&self) -> usize {
    self.reference.len()
  }

  #[must_use]
  pub fn to_json(&self) -> Value {
    let mut map = Map::new();
    if let Some(query) = &self.original_query {
      map.insert(ORIGINAL_QUERY_KEY.to_owned(), Value::from(query.as_str()));
    }
    map.insert(
      REFERENCE_EMBEDDING_KEY.to_owned(),
      Value::from(self.reference.clone()),
    );
    for group in &self.groups {
      map.insert(group.label(), Value::from(group.embeddings.clone()));
    }
    Value::Object(map)
  }
}

/// Read and parse an embeddings file.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
  let value = read_json(path)?;
  let dataset = Dataset::from_json(value)
    .map_err(|err| err.into_inner().context(format!("invalid dataset {}", path.display())))?;

  tracing::info!(
    path = %path.display(),
    dimension = dataset.dimension(),
    groups = dataset.groups.len(),
    "Loaded embeddings data"
  );

  Ok(dataset)
}

#[cfg(test)]
mod tests {
  use std::fs;

  use serde_json::json;

  use super::*;

  #[test]
  fn parses_present_groups_in_order() {
    let dataset = Dataset::from_json(json!({
      "original_query": "rust vs go",
      "original_query_embedding": [1.0, 0.0],
      "6_queries": [[0.0, 1.0]],
      "1_queries": [[1.0, 0.0], [0.5, 0.5]],
      "unrelated": 42,
    }))
    .unwrap();

    assert_eq!(dataset.original_query.as_deref(), Some("rust vs go"));
    assert_eq!(dataset.reference, vec![1.0, 0.0]);
    let numbers: Vec<u32> = dataset.groups.iter().map(|g| g.number).collect();
    assert_eq!(numbers, vec![1, 6]);
    assert_eq!(dataset.group(1).unwrap().embeddings.len(), 2);
    assert!(dataset.group(5).is_none());
  }

  #[test]
  fn ignores_groups_beyond_the_limit() {
    let dataset = Dataset::from_json(json!({
      "original_query_embedding": [1.0],
      "21_queries": [[1.0]],
    }))
    .unwrap();
    assert!(dataset.groups.is_empty());
  }

  #[test]
  fn missing_reference_is_an_error() {
    let err = Dataset::from_json(json!({ "1_queries": [[1.0]] })).unwrap_err();
    assert!(err.to_string().contains("original_query_embedding"));
  }

  #[test]
  fn malformed_group_is_an_error() {
    let err = Dataset::from_json(json!({
      "original_query_embedding": [1.0],
      "3_queries": ["not a vector"],
    }))
    .unwrap_err();
    assert!(err.to_string().contains("3_queries"));
  }

  #[test]
  fn load_reports_path_for_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_dataset(&path).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
  }

  #[test]
  fn load_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"original_query_embedding\": [1.0, ").unwrap();
    let err = load_dataset(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse"));
  }

  #[test]
  fn json_output_round_trips_through_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selected.embeddings.json");
    let dataset = Dataset {
      original_query: Some("q".to_owned()),
      reference: vec![0.25, 0.75],
      groups: vec![QueryGroup {
        number: 2,
        embeddings: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
      }],
    };
    crate::json_file::write_json(&path, &dataset.to_json()).unwrap();
    assert_eq!(load_dataset(&path).unwrap(), dataset);
  }
}
