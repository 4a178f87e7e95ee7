use anyhow::anyhow;
use async_openai::types::embeddings::CreateEmbeddingRequestArgs;
use querysim_shared::{AiEnv, AppError, Embedding};

use crate::client::client;

pub async fn embed(env: &AiEnv, input: &str) -> Result<Embedding, AppError> {
  let mut args = CreateEmbeddingRequestArgs::default();
  args.model(&env.openai_embedding_model).input(input);
  if let Some(dimensions) = env.openai_embedding_dimensions {
    args.dimensions(dimensions);
  }
  let request = args.build()?;

  client(env)
    .embeddings()
    .create(request)
    .await
    .map(|r| r.data.into_iter())?
    .map(|e| e.embedding)
    .next_back()
    .ok_or_else(|| anyhow!("empty embedding").into())
}
