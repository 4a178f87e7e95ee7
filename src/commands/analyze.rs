use querysim_core::{analyze, load_dataset, print_summary, render_boxplots, show_figure};
use querysim_shared::AppError;

use crate::cli::AnalyzeArgs;

pub fn run(args: AnalyzeArgs) -> Result<(), AppError> {
  tracing::info!("Loading embeddings data...");
  let dataset = load_dataset(&args.input)?;

  tracing::info!("Calculating cosine similarities...");
  let analysis = analyze(&dataset);
  if analysis.is_empty() {
    tracing::warn!(path = %args.input.display(), "No `N_queries` groups found");
  }

  tracing::info!("Creating boxplots...");
  render_boxplots(&analysis, &args.output)?;
  println!("Plot saved as '{}'", args.output.display());

  if !args.no_show {
    show_figure(&args.output);
  }

  print_summary(&analysis);
  Ok(())
}
