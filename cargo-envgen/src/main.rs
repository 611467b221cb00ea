//! CLI entrypoint for `cargo-envgen`.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cargo_envgen::{EnvgenError, GeneratorConfig, ProjectContext};

use crate::cli::Args;

fn main() -> Result<(), EnvgenError> {
    let args = Args::parse();
    init_tracing(args.verbose);
    run(&args)
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "cargo_envgen=debug"
    } else {
        "cargo_envgen=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[expect(clippy::print_stdout, reason = "the report is the command output")]
fn run(args: &Args) -> Result<(), EnvgenError> {
    let project = ProjectContext::load(&args.project_dir)?;
    let settings = GeneratorConfig::load(&args.project_dir, &args.overrides())?
        .resolve(&args.project_dir)?;
    let report = cargo_envgen::generate(&project, settings)?;
    tracing::info!(artifacts = report.artifacts.len(), "generation complete");
    print!("{report}");
    Ok(())
}
