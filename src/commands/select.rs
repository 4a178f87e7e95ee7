use anyhow::anyhow;
use querysim_core::{load_dataset, load_query_texts, select_groups, write_json};
use querysim_shared::{AppError, parse_group_key};

use crate::cli::SelectArgs;

pub fn run(args: SelectArgs) -> Result<(), AppError> {
  let number = parse_group_key(&args.group)
    .ok_or_else(|| anyhow!("`{}` is not a query group key", args.group))?;

  let dataset = load_dataset(&args.embeddings)?;
  let texts = load_query_texts(&args.texts)?;

  let group = dataset
    .group(number)
    .ok_or_else(|| anyhow!("`{}` not found in {}", args.group, args.embeddings.display()))?;
  let candidates = texts
    .field(&args.group)
    .ok_or_else(|| anyhow!("`{}` not found in {}", args.group, args.texts.display()))?;
  if candidates.len() != group.embeddings.len() {
    return Err(
      anyhow!(
        "`{}` has {} texts but {} embeddings",
        args.group,
        candidates.len(),
        group.embeddings.len()
      )
      .into(),
    );
  }

  println!(
    "Original query: \"{}\"",
    dataset.original_query.as_deref().unwrap_or_default()
  );
  println!("Total candidates: {}", candidates.len());
  println!("Embedding dimension: {}", dataset.dimension());
  println!();

  let (runs, output) = select_groups(&dataset, group, args.counts, args.alpha)?;

  for run in &runs {
    println!("=== Selecting {} queries ===", run.k);
    println!("Selected queries:");
    for (rank, &index) in run.indices.iter().enumerate() {
      println!("{}. {}", rank + 1, candidates[index]);
    }
    println!("Time taken: {}ms", run.elapsed.as_millis());
    println!();
  }

  write_json(&args.output, &output.to_json())?;
  println!("Output saved to {}", args.output.display());

  Ok(())
}
