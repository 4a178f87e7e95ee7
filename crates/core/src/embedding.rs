use std::path::{Path, PathBuf};

use querysim_ai::{embed, embed_many};
use querysim_shared::{
  AiEnv, AppError,
  group::{ORIGINAL_QUERY_KEY, REFERENCE_EMBEDDING_KEY},
};
use serde_json::{Map, Value};

use crate::QueryTexts;

/// `foo.json` -> `foo.embeddings.json`; other names get the suffix appended.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
  let name = input
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  let stem = name.strip_suffix(".json").unwrap_or(&name);
  input.with_file_name(format!("{stem}.embeddings.json"))
}

/// Embed the original query and every query list, one request per list.
///
/// The result mirrors the input keys; the original query text is kept and
/// its vector stored under `original_query_embedding` (`null` when there is
/// no original query).
pub async fn embed_query_texts(env: &AiEnv, texts: &QueryTexts) -> Result<Value, AppError> {
  let mut out = Map::new();

  let reference = match &texts.original_query {
    Some(query) => {
      tracing::info!("Processing original query");
      out.insert(ORIGINAL_QUERY_KEY.to_owned(), Value::from(query.as_str()));
      Value::from(embed(env, query).await?)
    }
    None => {
      tracing::warn!("No original query; `{REFERENCE_EMBEDDING_KEY}` will be null");
      Value::Null
    }
  };
  out.insert(REFERENCE_EMBEDDING_KEY.to_owned(), reference);

  for (key, queries) in &texts.fields {
    tracing::info!(field = %key, queries = queries.len(), "Processing query list");
    let embeddings = embed_many(env, queries).await?;
    out.insert(key.clone(), Value::from(embeddings));
  }

  Ok(Value::Object(out))
}
