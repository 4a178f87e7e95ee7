use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use querysim_core::{CountRange, selection::DEFAULT_ALPHA};

const DEFAULT_EMBEDDINGS_FILE: &str = "output-prompt-v1.txt.embeddings.json";
const DEFAULT_TEXTS_FILE: &str = "output-prompt-v1.txt.json";
const DEFAULT_PLOT_FILE: &str = "cosine_similarity_analysis.png";
const DEFAULT_SELECTION_FILE: &str = "output-prompt-v1.txt.submodular.embeddings.json";

/// Cosine similarity analysis of generated query groups.
///
/// Without a subcommand, runs `analyze`.
#[derive(Debug, Parser)]
#[command(name = "querysim", version, args_conflicts_with_subcommands = true)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  #[command(flatten)]
  pub analyze: AnalyzeArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Compare each group against the original query and within itself
  Analyze(AnalyzeArgs),
  /// Embed a query-groups file through the configured embeddings endpoint
  Embed(EmbedArgs),
  /// Generate groups of rewritten queries with the configured chat model
  Generate(GenerateArgs),
  /// Select query subsets from one group by submodular coverage
  Select(SelectArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
  /// Embeddings file to analyze
  #[arg(short, long, default_value = DEFAULT_EMBEDDINGS_FILE)]
  pub input: PathBuf,

  /// Where to write the boxplot PNG
  #[arg(short, long, default_value = DEFAULT_PLOT_FILE)]
  pub output: PathBuf,

  /// Save the plot without opening it
  #[arg(long)]
  pub no_show: bool,
}

#[derive(Debug, Args)]
pub struct EmbedArgs {
  /// Query-groups file, e.g. output-prompt-v1.txt.json
  pub input: PathBuf,

  /// Defaults to the input name with `.json` replaced by `.embeddings.json`
  #[arg(short, long)]
  pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
  /// System prompt template; `{num_queries}` is replaced by the count
  pub prompt_file: PathBuf,

  /// The user query to rewrite
  pub query: String,

  /// Number of queries per group: `5` or a range such as `1-20`
  #[arg(default_value = "5")]
  pub counts: CountRange,

  /// Defaults to `output-{prompt file name}.json`
  #[arg(short, long)]
  pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
  /// Subset sizes: `5` or a range such as `1-20`
  pub counts: CountRange,

  /// Embeddings file holding the candidate group
  #[arg(long, default_value = DEFAULT_EMBEDDINGS_FILE)]
  pub embeddings: PathBuf,

  /// Query-groups file with the candidate texts
  #[arg(long, default_value = DEFAULT_TEXTS_FILE)]
  pub texts: PathBuf,

  /// Candidate group key
  #[arg(long, default_value = "20_queries")]
  pub group: String,

  /// Weight of relevance to the original query in the coverage floor
  #[arg(long, default_value_t = DEFAULT_ALPHA)]
  pub alpha: f64,

  #[arg(short, long, default_value = DEFAULT_SELECTION_FILE)]
  pub output: PathBuf,
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn bare_invocation_analyzes_with_defaults() {
    let cli = Cli::try_parse_from(["querysim"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.analyze.input, PathBuf::from(DEFAULT_EMBEDDINGS_FILE));
    assert_eq!(cli.analyze.output, PathBuf::from(DEFAULT_PLOT_FILE));
    assert!(!cli.analyze.no_show);
  }

  #[test]
  fn analyze_accepts_explicit_paths() {
    let cli =
      Cli::try_parse_from(["querysim", "analyze", "-i", "in.json", "-o", "out.png", "--no-show"])
        .unwrap();
    let Some(Command::Analyze(args)) = cli.command else {
      panic!("expected analyze");
    };
    assert_eq!(args.input, PathBuf::from("in.json"));
    assert_eq!(args.output, PathBuf::from("out.png"));
    assert!(args.no_show);
  }

  #[test]
  fn select_parses_count_range() {
    let cli = Cli::try_parse_from(["querysim", "select", "1-20"]).unwrap();
    let Some(Command::Select(args)) = cli.command else {
      panic!("expected select");
    };
    assert_eq!(args.counts.counts().count(), 20);
    assert_eq!(args.group, "20_queries");
    assert!((args.alpha - 0.3).abs() < f64::EPSILON);
  }

  #[test]
  fn invalid_count_is_rejected() {
    assert!(Cli::try_parse_from(["querysim", "select", "0"]).is_err());
    assert!(Cli::try_parse_from(["querysim", "generate", "p.txt", "q", "9-2"]).is_err());
  }

  #[test]
  fn generate_defaults_to_five() {
    let cli = Cli::try_parse_from(["querysim", "generate", "prompt-v1.txt", "best laptops"]).unwrap();
    let Some(Command::Generate(args)) = cli.command else {
      panic!("expected generate");
    };
    assert_eq!(args.counts, CountRange::single(5));
    assert_eq!(args.query, "best laptops");
    assert!(args.output.is_none());
  }
}
