use anyhow::Result;
use clap::Parser;
use linkgraph_cli::{logger, Pipeline, Stage};
use linkgraph_core::config::Config;

#[derive(Parser, Debug)]
#[command(name = "linkgraph", about = "Build the search index, similarity graph and backlinks for the blog")]
struct Cli {
    /// Stage to run
    #[arg(value_enum, default_value_t = Stage::All)]
    stage: Stage,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e:#}");
        e
    })?;
    let settings = config.settings()?;
    logger::init(&settings.logging.level)?;
    tracing::debug!(stage = ?cli.stage, "starting");

    Pipeline::new(settings).run(cli.stage)
}
