//! Command-line interface definitions for `cargo-envgen`.

use camino::Utf8PathBuf;
use clap::Parser;

use cargo_envgen::GeneratorConfig;

/// Parsed CLI arguments for `cargo-envgen`.
#[derive(Debug, Parser)]
#[command(name = "cargo-envgen")]
#[command(about = "Generate environment loaders, .env templates and usage docs from @envconfig structs")]
#[command(version)]
pub struct Args {
    /// Accepts the subcommand name cargo passes when invoked as `cargo envgen`.
    #[arg(hide = true, value_parser = ["envgen"])]
    pub cargo_subcommand: Option<String>,
    /// Project directory containing `Cargo.toml`.
    #[arg(long, value_name = "path", default_value = ".")]
    pub project_dir: Utf8PathBuf,
    /// Annotation tag to look for.
    #[arg(long, value_name = "tag")]
    pub tag_name: Option<String>,
    /// Loader template file.
    #[arg(long, value_name = "path")]
    pub template_file: Option<String>,
    /// Generated loader path, relative to the project directory.
    #[arg(long, value_name = "path")]
    pub target: Option<String>,
    /// Env template output path; an empty value disables it.
    #[arg(long, value_name = "path")]
    pub dot_env: Option<String>,
    /// Usage documentation output path; an empty value disables it.
    #[arg(long, value_name = "path")]
    pub usage_doc: Option<String>,
    /// Source directory to scan (repeat for several).
    #[arg(long = "source", value_name = "path")]
    pub sources: Vec<String>,
    /// Directory holding the crate's `lib.rs` or `main.rs`.
    #[arg(long, value_name = "path")]
    pub crate_root: Option<String>,
    /// Log at debug level.
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// The highest-precedence configuration layer.
    pub fn overrides(&self) -> GeneratorConfig {
        GeneratorConfig {
            tag_name: self.tag_name.clone(),
            template: None,
            template_file: self.template_file.clone(),
            target: self.target.clone(),
            dot_env: self.dot_env.clone(),
            usage_doc: self.usage_doc.clone(),
            sources: (!self.sources.is_empty()).then(|| self.sources.clone()),
            crate_root: self.crate_root.clone(),
        }
    }
}
