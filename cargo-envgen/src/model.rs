//! Generation model built from matched directives.
//!
//! Every artifact generator consumes the same [`GenerationContext`], so the
//! loader file, the env template and the usage document stay consistent as
//! long as they are produced from one context.

use heck::{ToSnakeCase, ToUpperCamelCase};
use serde::Serialize;

use crate::directive::{Directive, FieldMeta};
use crate::imports::ImportAliases;

/// One environment variable read by a generated loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Full variable name, `{PREFIX}_{NAME}`.
    pub key: String,
    /// Default value; empty means "no default".
    pub default: String,
    /// Whether an unset variable without default is an error.
    pub required: bool,
    /// Struct field populated from this variable, as a Rust identifier.
    pub ident: String,
}

impl Field {
    /// Derives a field from its metadata under `prefix`.
    ///
    /// The `name` parameter overrides the upper-cased field name.
    #[must_use]
    pub fn from_meta(prefix: &str, meta: &FieldMeta) -> Self {
        let name = match meta.metadata.get("name") {
            "" => meta.name.to_uppercase(),
            explicit => explicit.to_owned(),
        };
        Self {
            key: format!("{prefix}_{name}"),
            default: meta.metadata.get("default").to_owned(),
            required: meta.metadata.get("required") == "true",
            ident: meta.ident.clone(),
        }
    }
}

/// One generated configuration loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envconfig {
    /// Constructor discriminator; empty when not given.
    pub ctor: String,
    /// Variable prefix, explicit or the upper-cased declaration name.
    pub prefix: String,
    /// Alias-qualified type path, for example `db::PostgresConfig`.
    pub spec_type: String,
    /// Declaration name.
    pub name: String,
    /// Variables in field declaration order.
    pub fields: Vec<Field>,
    /// Conventional loader name, `Load{Ctor}{Name}`.
    pub fn_name: String,
    /// Rust identifier of the loader function, the snake-case `fn_name`.
    pub loader: String,
}

impl Envconfig {
    /// Builds the model for `directive`, whose module is imported as `alias`.
    #[must_use]
    pub fn from_directive(directive: &Directive, alias: &str) -> Self {
        let name = directive.name().to_owned();
        let prefix = resolve_prefix(directive);
        let ctor = directive.params.get("ctor").to_owned();
        let fn_name = format!("Load{}{name}", ctor.to_upper_camel_case());
        let spec_type = if alias.is_empty() {
            name.clone()
        } else {
            format!("{alias}::{name}")
        };
        let fields = directive
            .fields
            .iter()
            .map(|meta| Field::from_meta(&prefix, meta))
            .collect();

        Self {
            loader: fn_name.to_snake_case(),
            ctor,
            prefix,
            spec_type,
            name,
            fields,
            fn_name,
        }
    }
}

fn resolve_prefix(directive: &Directive) -> String {
    match directive.params.get("prefix") {
        "" => directive.name().to_uppercase(),
        explicit => explicit.to_owned(),
    }
}

/// The model shared by every artifact generator within one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    /// Loaders in directive discovery order.
    pub configs: Vec<Envconfig>,
    /// Modules the loaders refer to, plus the well-known imports.
    pub imports: ImportAliases,
}

impl GenerationContext {
    /// Builds the context for `directives`, keeping their order.
    #[must_use]
    pub fn build(directives: &[Directive]) -> Self {
        let mut imports = ImportAliases::new();
        let configs = directives
            .iter()
            .map(|directive| {
                let alias = imports.append(directive.package());
                Envconfig::from_directive(directive, &alias)
            })
            .collect();
        Self { configs, imports }
    }

    /// Every field across all loaders, in output order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.configs.iter().flat_map(|config| config.fields.iter())
    }

    /// Returns `true` when no declaration matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
