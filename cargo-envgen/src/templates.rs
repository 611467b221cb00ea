//! Built-in templates and the `tera` rendering shared by every artifact.

use std::collections::HashMap;

use serde::Serialize;
use tera::{Context, Tera, Value};

use crate::error::EnvgenError;
use crate::imports::Import;
use crate::model::{Envconfig, GenerationContext};
use crate::project::ProjectContext;

/// Default loader source template.
pub const LOADER: &str = include_str!("../templates/loader.rs.tera");
/// Env template listing, one `KEY=default` line per field.
pub const DOT_ENV: &str = include_str!("../templates/dotenv.tera");
/// Markdown usage document.
pub const USAGE_DOC: &str = include_str!("../templates/usage.md.tera");

/// Values exposed to every template.
///
/// `configs` keeps the discovery order of the generation context.
#[derive(Debug, Serialize)]
pub struct TemplateData<'a> {
    /// Tag the loaders were generated for.
    pub tag_name: &'a str,
    /// Project identity.
    pub project: &'a ProjectContext,
    /// `use` lines, well-known imports first.
    pub imports: Vec<Import>,
    /// One entry per loader.
    pub configs: &'a [Envconfig],
}

impl<'a> TemplateData<'a> {
    /// Collects the template view of `context`.
    #[must_use]
    pub fn new(tag_name: &'a str, project: &'a ProjectContext, context: &'a GenerationContext) -> Self {
        Self {
            tag_name,
            project,
            imports: context.imports.to_imports(),
            configs: &context.configs,
        }
    }
}

/// Renders `template` (registered as `name`) with `data`.
///
/// Autoescaping is disabled; the `rust_str` filter turns a value into a
/// Rust string literal.
///
/// # Errors
///
/// Returns [`EnvgenError::TemplateRender`] on template syntax errors and
/// on references to missing values.
pub fn render(name: &str, template: &str, data: &TemplateData<'_>) -> Result<String, EnvgenError> {
    let to_error = |source| EnvgenError::TemplateRender {
        template: name.to_owned(),
        source,
    };
    let mut tera = Tera::default();
    tera.autoescape_on(Vec::new());
    tera.register_filter("rust_str", rust_str);
    tera.add_raw_template(name, template).map_err(to_error)?;
    let context = Context::from_serialize(data).map_err(to_error)?;
    tera.render(name, &context).map_err(to_error)
}

fn rust_str(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    Ok(Value::String(format!("{text:?}")))
}
