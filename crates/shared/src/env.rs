use std::env;

use anyhow::Context;

use crate::AppError;

/// Settings for the OpenAI-compatible endpoint used by `generate` and `embed`.
#[derive(Debug, Clone)]
pub struct AiEnv {
  pub openai_base_url: String,
  pub openai_api_key: String,
  pub openai_chat_model: String,
  pub openai_embedding_model: String,
  /// Requested output dimension, if the model supports truncation.
  pub openai_embedding_dimensions: Option<u32>,
}

impl AiEnv {
  /// Read settings from the process environment.
  pub fn from_env() -> Result<Self, AppError> {
    let openai_embedding_dimensions = match env::var("OPENAI_EMBEDDING_DIMENSIONS") {
      Ok(raw) => Some(
        raw
          .trim()
          .parse::<u32>()
          .with_context(|| format!("OPENAI_EMBEDDING_DIMENSIONS is not a positive integer: {raw}"))?,
      ),
      Err(_) => None,
    };

    Ok(Self {
      openai_base_url: required("OPENAI_BASE_URL")?,
      openai_api_key: required("OPENAI_API_KEY")?,
      openai_chat_model: required("OPENAI_CHAT_MODEL")?,
      openai_embedding_model: required("OPENAI_EMBEDDING_MODEL")?,
      openai_embedding_dimensions,
    })
  }
}

fn required(key: &str) -> Result<String, AppError> {
  env::var(key)
    .with_context(|| format!("{key} must be set"))
    .map_err(AppError::from)
}
