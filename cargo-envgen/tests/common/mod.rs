//! Shared helpers for `cargo-envgen` integration tests.
#![allow(
    dead_code,
    reason = "each test crate uses a different subset of helpers"
)]
#![expect(
    clippy::expect_used,
    reason = "fixture setup failures should abort the test"
)]

use cargo_envgen::{GeneratorConfig, ProjectContext, Settings};
use test_helpers::TempProject;

/// Annotated Postgres settings used across scenarios.
pub const POSTGRES_MODULE: &str = r#"
/// Connection settings for the primary database.
/// @envconfig(prefix: "PG")
pub struct PostgresConfig {
    /// @envconfig(default: "localhost")
    pub host: String,
    /// @envconfig(required: true)
    pub port: u16,
}
"#;

/// Creates a project with `src/lib.rs` declaring `modules` and one file per module.
pub fn project_with_modules(modules: &[(&str, &str)]) -> TempProject {
    let project = TempProject::new("billing").expect("create project");
    let lib: String = modules
        .iter()
        .map(|(name, _)| format!("pub mod {name};\n"))
        .collect();
    project.write("src/lib.rs", &lib).expect("write lib.rs");
    for (name, contents) in modules {
        project
            .write(&format!("src/{name}.rs"), contents)
            .expect("write module");
    }
    project
}

/// Settings generating all three artifacts with conventional paths.
pub fn all_artifacts(project: &TempProject) -> Settings {
    GeneratorConfig {
        dot_env: Some(".env".to_owned()),
        usage_doc: Some("USAGE.md".to_owned()),
        ..GeneratorConfig::default()
    }
    .resolve(project.root())
    .expect("resolve settings")
}

/// Loads the project context from the temporary manifest.
pub fn context(project: &TempProject) -> ProjectContext {
    ProjectContext::load(project.root()).expect("load manifest")
}
