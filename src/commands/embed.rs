use querysim_core::{embed_query_texts, embedding::default_output_path, load_query_texts, write_json};
use querysim_shared::{AiEnv, AppError};

use crate::cli::EmbedArgs;

pub async fn run(args: EmbedArgs) -> Result<(), AppError> {
  let env = AiEnv::from_env()?;
  let texts = load_query_texts(&args.input)?;

  let embeddings = embed_query_texts(&env, &texts).await?;

  let output = args
    .output
    .unwrap_or_else(|| default_output_path(&args.input));
  write_json(&output, &embeddings)?;
  println!("Embeddings saved to: {}", output.display());

  Ok(())
}
