use anyhow::{Context, anyhow};
use async_openai::types::chat::{
  ChatCompletionRequestMessage, CreateChatCompletionRequestArgs, ResponseFormat,
  ResponseFormatJsonSchema,
};
use querysim_shared::{AiEnv, AppError};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::client::client;

/// Generates a structured object
///
/// # Type Parameters
///
/// * `T` - The output type that implements `DeserializeOwned` and `JsonSchema`
///
/// # Arguments
///
/// * `env` - Endpoint and model settings
/// * `messages` - The chat completion messages
/// * `schema_name` - A name for the schema
/// * `schema_description` - A description for the schema
///
/// # Example
///
/// ```rust,ignore
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct Rewrites {
///     queries: Vec<String>,
/// }
///
/// let result = generate_object::<Rewrites>(
///     &env,
///     messages,
///     "rewrites".to_owned(),
///     None,
/// ).await?;
/// ```
pub async fn generate_object<T>(
  env: &AiEnv,
  messages: Vec<ChatCompletionRequestMessage>,
  schema_name: String,
  schema_description: Option<String>,
) -> Result<T, AppError>
where
  T: DeserializeOwned + JsonSchema,
{
  // Generate JSON schema from type
  let schema = schemars::schema_for!(T);
  let schema = serde_json::to_value(&schema)?;

  let request = CreateChatCompletionRequestArgs::default()
    .model(&env.openai_chat_model)
    .messages(messages)
    .response_format(ResponseFormat::JsonSchema {
      json_schema: ResponseFormatJsonSchema {
        description: schema_description,
        name: schema_name,
        schema: Some(schema),
        strict: Some(true),
      },
    })
    .build()?;

  let response = client(env)
    .chat()
    .create(request)
    .await
    .map(|r| r.choices.into_iter())?
    .find_map(|c| c.message.content)
    .ok_or_else(|| anyhow!("empty message content"))?;

  tracing::debug!(
    output = std::any::type_name::<T>(),
    bytes = response.len(),
    "Structured response received"
  );

  parse_structured(&response)
}

/// Parse the model's reply, tolerating a Markdown code fence around the JSON.
///
/// Some OpenAI-compatible gateways ignore `strict` and wrap the object anyway.
fn parse_structured<T: DeserializeOwned>(content: &str) -> Result<T, AppError> {
  let trimmed = content.trim();
  let body = trimmed
    .strip_prefix("```json")
    .or_else(|| trimmed.strip_prefix("```"))
    .and_then(|rest| rest.strip_suffix("```"))
    .map_or(trimmed, str::trim);

  serde_json::from_str(body)
    .with_context(|| format!("structured response is not valid JSON: {}", preview(body)))
    .map_err(AppError::from)
}

fn preview(body: &str) -> String {
  const MAX_CHARS: usize = 80;
  if body.chars().count() > MAX_CHARS {
    format!("{}...", body.chars().take(MAX_CHARS).collect::<String>())
  } else {
    body.to_owned()
  }
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  use super::*;

  #[derive(Debug, Deserialize, PartialEq)]
  struct Rewrites {
    queries: Vec<String>,
  }

  #[test]
  fn parses_bare_json() {
    let out: Rewrites = parse_structured(r#"{"queries":["a","b"]}"#).unwrap();
    assert_eq!(out.queries, vec!["a", "b"]);
  }

  #[test]
  fn parses_fenced_json() {
    let content = "```json\n{\"queries\": [\"a\"]}\n```\n";
    let out: Rewrites = parse_structured(content).unwrap();
    assert_eq!(out.queries, vec!["a"]);

    let content = "```\n{\"queries\": []}\n```";
    let out: Rewrites = parse_structured(content).unwrap();
    assert!(out.queries.is_empty());
  }

  #[test]
  fn reports_invalid_json_with_preview() {
    let err = parse_structured::<Rewrites>("not json at all").unwrap_err();
    assert!(err.to_string().contains("not json at all"));
  }
}
