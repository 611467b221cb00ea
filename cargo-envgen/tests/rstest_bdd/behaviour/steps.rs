//! Step definitions for `cargo-envgen` behavioural tests.

use anyhow::{Result, anyhow, ensure};
use cargo_envgen::{EnvgenError, Report, generate};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, then, when};
use test_helpers::TempProject;

use crate::common::{POSTGRES_MODULE, all_artifacts, context, project_with_modules};

const LOADER: &str = "src/envconfig_annotated.rs";
const ENV_TEMPLATE: &str = ".env";
const USAGE_DOC: &str = "USAGE.md";

/// Scenario state for generation scenarios.
#[derive(Debug, Default, ScenarioState)]
pub struct EnvgenContext {
    pub project: Slot<TempProject>,
    pub outcome: Slot<Result<Report, EnvgenError>>,
}

/// Provides a clean context for generation scenarios.
#[fixture]
pub fn envgen_context() -> EnvgenContext {
    EnvgenContext::default()
}

fn read(envgen_context: &EnvgenContext, relative: &str) -> Result<String> {
    envgen_context
        .project
        .with_ref(|project| project.read(relative))
        .ok_or_else(|| anyhow!("project not created"))?
}

fn exists(envgen_context: &EnvgenContext, relative: &str) -> Result<bool> {
    envgen_context
        .project
        .with_ref(|project| project.exists(relative))
        .ok_or_else(|| anyhow!("project not created"))
}

#[given("a crate with an annotated PostgresConfig in module {module}")]
fn annotated_crate(envgen_context: &EnvgenContext, module: String) {
    envgen_context
        .project
        .set(project_with_modules(&[(module.as_str(), POSTGRES_MODULE)]));
}

#[given("a crate with a malformed annotation in module {module}")]
fn malformed_crate(envgen_context: &EnvgenContext, module: String) {
    let broken = "/// @envconfig(prefix \"X\")\npub struct Broken {\n    pub a: String,\n}\n";
    envgen_context.project.set(project_with_modules(&[
        ("db", POSTGRES_MODULE),
        (module.as_str(), broken),
    ]));
}

#[when("envgen runs with every artifact enabled")]
fn run_envgen(envgen_context: &EnvgenContext) -> Result<()> {
    let outcome = envgen_context
        .project
        .with_ref(|project| generate(&context(project), all_artifacts(project)))
        .ok_or_else(|| anyhow!("project not created"))?;
    envgen_context.outcome.set(outcome);
    Ok(())
}

#[when("the annotations are stripped from module {module}")]
fn strip_annotations(envgen_context: &EnvgenContext, module: String) -> Result<()> {
    let relative = format!("src/{module}.rs");
    let stripped: String = read(envgen_context, &relative)?
        .lines()
        .filter(|line| !line.contains("@envconfig"))
        .map(|line| format!("{line}\n"))
        .collect();
    envgen_context
        .project
        .with_ref(|project| project.write(&relative, &stripped))
        .ok_or_else(|| anyhow!("project not created"))?
}

#[then("generation succeeds")]
fn generation_succeeds(envgen_context: &EnvgenContext) -> Result<()> {
    let failure = envgen_context
        .outcome
        .with_ref(|outcome| outcome.as_ref().err().map(ToString::to_string))
        .ok_or_else(|| anyhow!("envgen has not run"))?;
    match failure {
        Some(err) => Err(anyhow!("generation failed: {err}")),
        None => Ok(()),
    }
}

#[then("generation fails on declaration {declaration}")]
fn generation_fails_on(envgen_context: &EnvgenContext, declaration: String) -> Result<()> {
    let actual = envgen_context
        .outcome
        .with_ref(|outcome| match outcome {
            Err(EnvgenError::AnnotationParse { declaration, .. }) => Some(declaration.clone()),
            _ => None,
        })
        .ok_or_else(|| anyhow!("envgen has not run"))?;
    ensure!(
        actual.as_deref() == Some(declaration.as_str()),
        "expected an annotation error on {declaration}, got {actual:?}"
    );
    Ok(())
}

#[then("the loader defines {function}")]
fn loader_defines(envgen_context: &EnvgenContext, function: String) -> Result<()> {
    let loader = read(envgen_context, LOADER)?;
    let signature = format!("pub fn {function}()");
    ensure!(
        loader.matches(&signature).count() == 1,
        "expected exactly one `{signature}` in the loader"
    );
    Ok(())
}

#[then("the loader is valid Rust")]
fn loader_parses(envgen_context: &EnvgenContext) -> Result<()> {
    let loader = read(envgen_context, LOADER)?;
    syn::parse_file(&loader)?;
    Ok(())
}

#[then("the loader file is absent")]
fn loader_absent(envgen_context: &EnvgenContext) -> Result<()> {
    ensure!(!exists(envgen_context, LOADER)?, "loader should have been removed");
    Ok(())
}

#[then("the env template sets {key} to {default}")]
fn env_template_sets(envgen_context: &EnvgenContext, key: String, default: String) -> Result<()> {
    let template = read(envgen_context, ENV_TEMPLATE)?;
    let line = format!("{key}={default}");
    ensure!(
        template.lines().any(|candidate| candidate == line),
        "expected `{line}` in:\n{template}"
    );
    Ok(())
}

#[then("the env template leaves {key} empty")]
fn env_template_leaves_empty(envgen_context: &EnvgenContext, key: String) -> Result<()> {
    env_template_sets(envgen_context, key, String::new())
}

#[then("the env template is empty")]
fn env_template_empty(envgen_context: &EnvgenContext) -> Result<()> {
    let template = read(envgen_context, ENV_TEMPLATE)?;
    ensure!(template.is_empty(), "expected an empty env template, got:\n{template}");
    Ok(())
}

#[then("the usage doc marks {key} as required")]
fn usage_doc_marks_required(envgen_context: &EnvgenContext, key: String) -> Result<()> {
    let usage = read(envgen_context, USAGE_DOC)?;
    let prefix = format!("| `{key}` |");
    let row = usage
        .lines()
        .find(|line| line.starts_with(&prefix))
        .ok_or_else(|| anyhow!("no usage row for {key}"))?;
    ensure!(row.ends_with("| yes |"), "expected {key} to be required: {row}");
    Ok(())
}

#[then("no artifacts are written")]
fn no_artifacts(envgen_context: &EnvgenContext) -> Result<()> {
    for relative in [LOADER, ENV_TEMPLATE, USAGE_DOC] {
        ensure!(!exists(envgen_context, relative)?, "{relative} should not exist");
    }
    Ok(())
}
