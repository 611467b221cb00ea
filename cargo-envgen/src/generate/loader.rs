//! Generated loader source.

use camino::Utf8Path;
use tracing::info;

use super::{Artifact, ArtifactAction, ArtifactKind};
use crate::error::EnvgenError;
use crate::fs_helpers;
use crate::normalize;
use crate::templates::{self, TemplateData};

/// Writes the loader file rendered from `template`, or removes it when there
/// is nothing to load.
///
/// An empty model deletes a previously generated `target`; a missing
/// `target` is not an error. Otherwise the rendered source has its imports
/// normalised and then replaces the file wholesale.
///
/// # Errors
///
/// Returns [`EnvgenError::TemplateRender`] when rendering fails and
/// [`EnvgenError::PostProcess`] when the rendered source does not parse;
/// neither touches `target`. Write and delete failures are
/// [`EnvgenError::Io`].
pub fn generate_loader(
    target: &Utf8Path,
    template: &str,
    data: &TemplateData<'_>,
) -> Result<Option<Artifact>, EnvgenError> {
    if data.configs.is_empty() {
        if fs_helpers::remove_file_if_exists(target)? {
            info!(target = %target, tag = data.tag_name, "removed loader; no annotated declarations remain");
            return Ok(Some(Artifact {
                kind: ArtifactKind::Loader,
                path: target.to_path_buf(),
                action: ArtifactAction::Removed,
            }));
        }
        return Ok(None);
    }

    let rendered = templates::render("loader", template, data)?;
    let normalized = normalize::normalize_imports(target, &rendered)?;
    info!(target = %target, tag = data.tag_name, loaders = data.configs.len(), "generating loader");
    fs_helpers::write_file(target, &normalized)?;

    Ok(Some(Artifact {
        kind: ArtifactKind::Loader,
        path: target.to_path_buf(),
        action: ArtifactAction::Written,
    }))
}
