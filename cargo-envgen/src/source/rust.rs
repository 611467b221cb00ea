//! `syn`-backed declaration source for Rust crates.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use syn::ext::IdentExt;
use syn::{Attribute, Expr, ExprLit, Fields, Item, Lit, Meta};
use tracing::{debug, warn};

use super::{Annotation, Declaration, DeclarationKind, DeclarationSource, FieldDecl, Visibility};
use crate::error::EnvgenError;
use crate::fs_helpers;

/// Scans `*.rs` files and reports the type declarations they contain.
///
/// Module paths are computed relative to `crate_root`, the directory holding
/// the crate's `lib.rs` or `main.rs`.
#[derive(Debug, Clone)]
pub struct RustSource {
    crate_root: Utf8PathBuf,
}

impl RustSource {
    /// Creates a source that resolves module paths against `crate_root`.
    pub fn new(crate_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            crate_root: crate_root.into(),
        }
    }

    /// Parses a single file's contents as if it lived at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::SourceParse`] when `contents` is not valid Rust.
    pub fn parse_file(
        &self,
        path: &Utf8Path,
        contents: &str,
    ) -> Result<Vec<Declaration>, EnvgenError> {
        let file = syn::parse_file(contents).map_err(|err| EnvgenError::SourceParse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let Some(package) = module_path(&self.crate_root, path) else {
            warn!(
                file = %path,
                crate_root = %self.crate_root,
                "file is not a module of this crate; skipping"
            );
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        collect_items(&file.items, &package, path, &mut out);
        Ok(out)
    }
}

impl DeclarationSource for RustSource {
    fn list_declarations(&self, roots: &[Utf8PathBuf]) -> Result<Vec<Declaration>, EnvgenError> {
        let mut files = Vec::new();
        for root in roots {
            let Some(dir) = fs_helpers::open_optional_dir(root)? else {
                warn!(root = %root, "source root does not exist; skipping");
                continue;
            };
            collect_rust_files(&dir, root, &mut files)?;
        }

        let mut declarations = Vec::new();
        for path in files {
            let contents = fs_helpers::read_file(&path)?;
            let found = self.parse_file(&path, &contents)?;
            debug!(file = %path, count = found.len(), "scanned declarations");
            declarations.extend(found);
        }
        Ok(declarations)
    }
}

fn collect_rust_files(
    dir: &Dir,
    base: &Utf8Path,
    out: &mut Vec<Utf8PathBuf>,
) -> Result<(), EnvgenError> {
    let mut entries = Vec::new();
    for entry_result in dir
        .read_dir(".")
        .map_err(|err| EnvgenError::io(base, err))?
    {
        let entry = entry_result.map_err(|err| EnvgenError::io(base, err))?;
        let name = entry.file_name().map_err(|err| EnvgenError::io(base, err))?;
        let file_type = entry.file_type().map_err(|err| EnvgenError::io(base, err))?;
        entries.push((name, file_type));
    }

    entries.sort_by(|(left, _), (right, _)| left.cmp(right));

    for (name, file_type) in entries {
        if name.starts_with('.') {
            continue;
        }
        let path = base.join(&name);
        if file_type.is_dir() {
            let subdir = dir
                .open_dir(&name)
                .map_err(|err| EnvgenError::io(&path, err))?;
            collect_rust_files(&subdir, &path, out)?;
        } else if file_type.is_file() && path.extension() == Some("rs") {
            out.push(path);
        }
    }
    Ok(())
}

/// Maps a file location onto the module path it defines.
///
/// Returns `None` for files outside `crate_root` and for `bin/` targets,
/// which belong to other crates.
fn module_path(crate_root: &Utf8Path, file: &Utf8Path) -> Option<String> {
    let relative = file.strip_prefix(crate_root).ok()?;
    let stem = relative.with_extension("");
    let mut segments: Vec<&str> = stem
        .components()
        .filter_map(|component| match component {
            Utf8Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .collect();

    let drop_last = match segments.as_slice() {
        [] | ["bin", _, ..] => return None,
        [only] => matches!(*only, "lib" | "main" | "mod"),
        [.., last] => *last == "mod",
    };
    if drop_last {
        segments.pop();
    }

    let mut path = String::from("crate");
    for segment in segments {
        path.push_str("::");
        path.push_str(segment);
    }
    Some(path)
}

fn collect_items(items: &[Item], package: &str, file: &Utf8Path, out: &mut Vec<Declaration>) {
    for item in items {
        let (ident, vis, attrs, kind, fields) = match item {
            Item::Struct(item) => {
                let (kind, fields) = match &item.fields {
                    Fields::Named(named) => (
                        DeclarationKind::Record,
                        named
                            .named
                            .iter()
                            .filter_map(|field| {
                                field.ident.as_ref().map(|ident| FieldDecl {
                                    ident: ident.to_string(),
                                    name: ident.unraw().to_string(),
                                    visibility: visibility(&field.vis),
                                    annotations: doc_annotations(&field.attrs),
                                })
                            })
                            .collect(),
                    ),
                    Fields::Unnamed(_) | Fields::Unit => (DeclarationKind::TupleStruct, Vec::new()),
                };
                (&item.ident, &item.vis, &item.attrs, kind, fields)
            }
            Item::Enum(item) => (
                &item.ident,
                &item.vis,
                &item.attrs,
                DeclarationKind::Enum,
                Vec::new(),
            ),
            Item::Union(item) => (
                &item.ident,
                &item.vis,
                &item.attrs,
                DeclarationKind::Union,
                Vec::new(),
            ),
            Item::Trait(item) => (
                &item.ident,
                &item.vis,
                &item.attrs,
                DeclarationKind::Trait,
                Vec::new(),
            ),
            Item::Type(item) => (
                &item.ident,
                &item.vis,
                &item.attrs,
                DeclarationKind::TypeAlias,
                Vec::new(),
            ),
            Item::Mod(item) => {
                if let Some((_, nested)) = &item.content {
                    let nested_package = format!("{package}::{}", item.ident.unraw());
                    collect_items(nested, &nested_package, file, out);
                }
                continue;
            }
            _ => continue,
        };

        out.push(Declaration {
            name: ident.unraw().to_string(),
            visibility: visibility(vis),
            kind,
            package: package.to_owned(),
            file: file.to_path_buf(),
            annotations: doc_annotations(attrs),
            fields,
        });
    }
}

const fn visibility(vis: &syn::Visibility) -> Visibility {
    match vis {
        syn::Visibility::Public(_) => Visibility::Public,
        syn::Visibility::Restricted(_) => Visibility::Restricted,
        syn::Visibility::Inherited => Visibility::Private,
    }
}

/// Collects `@tag` lines from `#[doc = "..."]` attributes.
fn doc_annotations(attrs: &[Attribute]) -> Vec<Annotation> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(name_value) => match &name_value.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text),
                    ..
                }) => Some(text.value()),
                _ => None,
            },
            _ => None,
        })
        .flat_map(|text| {
            text.lines()
                .filter_map(Annotation::from_doc_line)
                .collect::<Vec<_>>()
        })
        .collect()
}
