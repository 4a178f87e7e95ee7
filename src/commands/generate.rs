use std::fs;

use anyhow::Context;
use querysim_core::{generate_query_groups, generation::default_output_path, write_json};
use querysim_shared::{AiEnv, AppError};

use crate::cli::GenerateArgs;

pub async fn run(args: GenerateArgs) -> Result<(), AppError> {
  let template = fs::read_to_string(&args.prompt_file)
    .with_context(|| format!("prompt file not found: {}", args.prompt_file.display()))?;
  let env = AiEnv::from_env()?;

  let texts = generate_query_groups(&env, &template, &args.query, args.counts).await?;

  let output = args
    .output
    .unwrap_or_else(|| default_output_path(&args.prompt_file));
  write_json(&output, &texts.to_json())?;
  println!("Generated queries saved to: {}", output.display());

  for (key, queries) in &texts.fields {
    println!("{key}:");
    for (i, query) in queries.iter().enumerate() {
      println!("{}. {}", i + 1, query);
    }
  }

  Ok(())
}
