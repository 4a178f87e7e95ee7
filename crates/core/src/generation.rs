use std::path::{Path, PathBuf};

use anyhow::anyhow;
use querysim_ai::{
  ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
  ChatCompletionRequestUserMessage, generate_object,
};
use querysim_shared::{AiEnv, AppError, group_key};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::{CountRange, QueryTexts};

/// Placeholder replaced by the requested number of queries.
pub const NUM_QUERIES_PLACEHOLDER: &str = "{num_queries}";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GeneratedQueries {
  /// Rewritten variants of the user's query
  pub queries: Vec<String>,
}

#[must_use]
pub fn render_prompt(template: &str, num_queries: u32) -> String {
  template.replace(NUM_QUERIES_PLACEHOLDER, &num_queries.to_string())
}

/// `prompts/v1.txt` -> `output-v1.txt.json`
#[must_use]
pub fn default_output_path(prompt_file: &Path) -> PathBuf {
  let name = prompt_file
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  PathBuf::from(format!("output-{name}.json"))
}

fn check_count(queries: Vec<String>, expected: u32) -> Result<Vec<String>, AppError> {
  if queries.len() != expected as usize {
    return Err(
      anyhow!(
        "model returned {} queries, expected {}",
        queries.len(),
        expected
      )
      .into(),
    );
  }
  Ok(queries)
}

/// Ask the chat model for `num_queries` variants of `user_query`.
pub async fn generate_queries(
  env: &AiEnv,
  prompt_template: &str,
  user_query: &str,
  num_queries: u32,
) -> Result<Vec<String>, AppError> {
  let system = ChatCompletionRequestSystemMessage::from(render_prompt(prompt_template, num_queries));
  let user = ChatCompletionRequestUserMessage::from(user_query);

  let output = generate_object::<GeneratedQueries>(
    env,
    vec![
      ChatCompletionRequestMessage::System(system),
      ChatCompletionRequestMessage::User(user),
    ],
    "generated_queries".to_owned(),
    Some(format!("Exactly {num_queries} rewritten search queries")),
  )
  .await?;

  check_count(output.queries, num_queries)
}

/// Generate one `"{n}_queries"` group for every count in `counts`.
pub async fn generate_query_groups(
  env: &AiEnv,
  prompt_template: &str,
  user_query: &str,
  counts: CountRange,
) -> Result<QueryTexts, AppError> {
  let mut texts = QueryTexts {
    original_query: Some(user_query.to_owned()),
    fields: Vec::new(),
  };

  for n in counts.counts() {
    tracing::info!(num_queries = n, "Generating queries");
    let queries = generate_queries(env, prompt_template, user_query, n).await?;
    texts.fields.push((group_key(n), queries));
  }

  Ok(texts)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prompt_placeholder_is_filled() {
    let prompt = render_prompt("Write {num_queries} queries. Only {num_queries}.", 7);
    assert_eq!(prompt, "Write 7 queries. Only 7.");
  }

  #[test]
  fn output_name_uses_prompt_basename() {
    assert_eq!(
      default_output_path(Path::new("prompts/prompt-v1.txt")),
      PathBuf::from("output-prompt-v1.txt.json")
    );
  }

  #[test]
  fn count_mismatch_is_an_error() {
    let queries = vec!["a".to_owned(), "b".to_owned()];
    assert!(check_count(queries.clone(), 2).is_ok());
    let err = check_count(queries, 3).unwrap_err();
    assert!(err.to_string().contains("expected 3"));
  }

  #[test]
  fn schema_requires_queries_array() {
    let schema = serde_json::to_value(schemars::schema_for!(GeneratedQueries)).unwrap();
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["queries"]["type"], "array");
    assert_eq!(schema["required"][0], "queries");
    assert_eq!(schema["additionalProperties"], false);
  }
}
