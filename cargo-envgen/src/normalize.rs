//! Import normalisation for freshly rendered Rust source.
//!
//! Templates emit one `use` per registered module whether or not the body
//! ends up referring to it. This pass drops private imports whose bound
//! name never appears in the rest of the file and re-prints the result with
//! `prettyplease`. Plain `//` comments above the first item survive.

use std::collections::HashSet;

use camino::Utf8Path;
use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{Item, Token, UseTree};

use crate::error::EnvgenError;

/// Normalises imports in `source`, the contents destined for `path`.
///
/// # Errors
///
/// Returns [`EnvgenError::PostProcess`] when `source` is not a valid Rust
/// file.
pub fn normalize_imports(path: &Utf8Path, source: &str) -> Result<String, EnvgenError> {
    let mut file = syn::parse_file(source).map_err(|err| EnvgenError::PostProcess {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut used = HashSet::new();
    for item in &file.items {
        if !matches!(item, Item::Use(_)) {
            collect_idents(item.to_token_stream(), &mut used);
        }
    }

    file.items.retain_mut(|item| match item {
        Item::Use(item_use) => {
            !matches!(item_use.vis, syn::Visibility::Inherited)
                || prune_tree(&mut item_use.tree, &used)
        }
        _ => true,
    });

    let header = leading_comments(source);
    let body = prettyplease::unparse(&file);
    if header.is_empty() {
        Ok(body)
    } else {
        Ok(format!("{header}\n{body}"))
    }
}

fn collect_idents(tokens: TokenStream, used: &mut HashSet<String>) {
    for tree in tokens {
        match tree {
            TokenTree::Ident(ident) => {
                used.insert(ident.to_string());
            }
            TokenTree::Group(group) => collect_idents(group.stream(), used),
            TokenTree::Punct(_) | TokenTree::Literal(_) => {}
        }
    }
}

/// Removes unreferenced leaves from `tree`, returning `false` if nothing is left.
fn prune_tree(tree: &mut UseTree, used: &HashSet<String>) -> bool {
    match tree {
        UseTree::Path(path) => prune_tree(&mut path.tree, used),
        UseTree::Name(name) => name.ident == "self" || used.contains(&name.ident.to_string()),
        UseTree::Rename(rename) => {
            rename.rename == "_" || used.contains(&rename.rename.to_string())
        }
        UseTree::Glob(_) => true,
        UseTree::Group(group) => {
            let kept: Punctuated<UseTree, Token![,]> = group
                .items
                .clone()
                .into_iter()
                .filter_map(|mut item| prune_tree(&mut item, used).then_some(item))
                .collect();
            group.items = kept;
            !group.items.is_empty()
        }
    }
}

/// Returns the `//` comment lines preceding the first item, one per line.
fn leading_comments(source: &str) -> String {
    let mut header = String::new();
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let is_plain_comment =
            trimmed.starts_with("//") && !trimmed.starts_with("///") && !trimmed.starts_with("//!");
        if !is_plain_comment {
            break;
        }
        header.push_str(trimmed);
        header.push('\n');
    }
    header
}
