//! Human-readable usage documentation.

use camino::Utf8Path;
use tracing::info;

use super::{Artifact, ArtifactAction, ArtifactKind};
use crate::error::EnvgenError;
use crate::fs_helpers;
use crate::templates::{self, TemplateData};

/// Writes a Markdown document listing key, default and required flag for
/// every field, grouped by loader.
///
/// # Errors
///
/// Returns [`EnvgenError::TemplateRender`] or [`EnvgenError::Io`].
pub fn generate_usage_doc(
    target: &Utf8Path,
    data: &TemplateData<'_>,
) -> Result<Artifact, EnvgenError> {
    let rendered = templates::render("usage-doc", templates::USAGE_DOC, data)?;
    info!(target = %target, "generating usage documentation");
    let path = fs_helpers::write_file(target, &rendered)?;
    Ok(Artifact {
        kind: ArtifactKind::UsageDoc,
        path,
        action: ArtifactAction::Written,
    })
}
