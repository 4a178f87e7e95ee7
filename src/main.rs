use clap::Parser;
use querysim_shared::AppError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), AppError> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
          "{}=info,querysim_core=info,querysim_ai=info",
          env!("CARGO_CRATE_NAME")
        )
        .into()
      }),
    )
    // stdout carries the report
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .with(tracing_error::ErrorLayer::default())
    .init();
  dotenvy::dotenv().ok();

  let cli = Cli::parse();

  match cli.command {
    None => commands::analyze::run(cli.analyze),
    Some(Command::Analyze(args)) => commands::analyze::run(args),
    Some(Command::Embed(args)) => commands::embed::run(args).await,
    Some(Command::Generate(args)) => commands::generate::run(args).await,
    Some(Command::Select(args)) => commands::select::run(args),
  }
}
