use std::path::Path;

use anyhow::{Context, anyhow};
use querysim_shared::{AppError, group::ORIGINAL_QUERY_KEY};
use serde_json::{Map, Value};

use crate::json_file::read_json;

/// Query-groups file: the original query and named lists of query texts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryTexts {
  pub original_query: Option<String>,
  /// Every array-valued key other than `original_query`, in file order.
  pub fields: Vec<(String, Vec<String>)>,
}

impl QueryTexts {
  pub fn from_json(value: Value) -> Result<Self, AppError> {
    let Value::Object(map) = value else {
      return Err(anyhow!("query file must contain a JSON object").into());
    };

    let mut texts = Self::default();
    for (key, value) in map {
      match value {
        Value::String(query) if key == ORIGINAL_QUERY_KEY => texts.original_query = Some(query),
        Value::Array(_) if key != ORIGINAL_QUERY_KEY => {
          let queries: Vec<String> = serde_json::from_value(value)
            .with_context(|| format!("`{key}` must be an array of strings"))?;
          texts.fields.push((key, queries));
        }
        _ => {}
      }
    }

    Ok(texts)
  }

  #[must_use]
  pub fn field(&self, key: &str) -> Option<&[String]> {
    self
      .fields
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_slice())
  }

  #[must_use]
  pub fn to_json(&self) -> Value {
    let mut map = Map::new();
    if let Some(query) = &self.original_query {
      map.insert(ORIGINAL_QUERY_KEY.to_owned(), Value::from(query.as_str()));
    }
    for (key, queries) in &self.fields {
      map.insert(key.clone(), Value::from(queries.clone()));
    }
    Value::Object(map)
  }
}

pub fn load_query_texts(path: &Path) -> Result<QueryTexts, AppError> {
  let value = read_json(path)?;
  QueryTexts::from_json(value)
    .map_err(|err| err.into_inner().context(format!("invalid query file {}", path.display())).into())
}
