//! Env template listing every generated key with its default.

use camino::Utf8Path;
use tracing::info;

use super::{Artifact, ArtifactAction, ArtifactKind};
use crate::error::EnvgenError;
use crate::fs_helpers;
use crate::templates::{self, TemplateData};

/// Writes one `KEY=default` line per field to `target`.
///
/// Unlike the loader, the file is written even when the model is empty,
/// leaving an empty listing rather than removing it.
///
/// # Errors
///
/// Returns [`EnvgenError::TemplateRender`] or [`EnvgenError::Io`].
pub fn generate_dot_env(target: &Utf8Path, data: &TemplateData<'_>) -> Result<Artifact, EnvgenError> {
    let rendered = templates::render("dotenv", templates::DOT_ENV, data)?;
    info!(target = %target, "generating env template");
    let path = fs_helpers::write_file(target, &rendered)?;
    Ok(Artifact {
        kind: ArtifactKind::DotEnv,
        path,
        action: ArtifactAction::Written,
    })
}
