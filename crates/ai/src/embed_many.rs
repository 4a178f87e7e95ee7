use anyhow::anyhow;
use async_openai::types::embeddings::{CreateEmbeddingRequestArgs, Embedding as OpenAIEmbedding};
use querysim_shared::{AiEnv, AppError, Embedding};

use crate::client::client;

/// Embed multiple texts in a single API call.
///
/// Returns one embedding per input, in the same order.
pub async fn embed_many(env: &AiEnv, inputs: &[String]) -> Result<Vec<Embedding>, AppError> {
  if inputs.is_empty() {
    return Ok(vec![]);
  }

  let mut args = CreateEmbeddingRequestArgs::default();
  args
    .model(&env.openai_embedding_model)
    .input(inputs.to_vec());
  if let Some(dimensions) = env.openai_embedding_dimensions {
    args.dimensions(dimensions);
  }
  let request = args.build()?;

  let response = client(env).embeddings().create(request).await?;

  tracing::debug!(
    model = %env.openai_embedding_model,
    inputs = inputs.len(),
    returned = response.data.len(),
    "Embedding batch received"
  );

  order_by_index(response.data, inputs.len())
}

/// Sort by index to ensure ordering matches input, and check nothing went missing.
fn order_by_index(
  mut data: Vec<OpenAIEmbedding>,
  expected: usize,
) -> Result<Vec<Embedding>, AppError> {
  data.sort_by_key(|e| e.index);

  if data.len() != expected {
    return Err(
      anyhow!(
        "embedding count mismatch: expected {}, got {}",
        expected,
        data.len()
      )
      .into(),
    );
  }

  Ok(data.into_iter().map(|e| e.embedding).collect())
}
