//! The annotation pipeline: scan, filter, extract, then process.

use std::fmt;

use camino::Utf8PathBuf;
use tracing::info;

use crate::config::Settings;
use crate::directive::{Directive, extract_directives};
use crate::error::EnvgenError;
use crate::filter::Filters;
use crate::generate::{self, Artifact};
use crate::model::GenerationContext;
use crate::project::ProjectContext;
use crate::source::{DeclarationSource, RustSource};
use crate::templates::TemplateData;

/// Handles one annotation kind.
pub trait Annotator {
    /// Tag literal this annotator responds to, for example `@envconfig`.
    fn tag_name(&self) -> &str;

    /// Filter chain selecting candidate declarations.
    fn filters(&self) -> Filters {
        Filters::for_tag(self.tag_name())
    }

    /// Produces artifacts from the directives matched for this annotator.
    ///
    /// # Errors
    ///
    /// Returns the first generator failure; artifacts written before it
    /// are left in place.
    fn process(
        &self,
        project: &ProjectContext,
        directives: &[Directive],
    ) -> Result<Report, EnvgenError>;
}

/// Artifacts touched by a generation pass, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Filesystem changes, in production order.
    pub artifacts: Vec<Artifact>,
}

impl Report {
    fn push(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    fn extend(&mut self, other: Self) {
        self.artifacts.extend(other.artifacts);
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.artifacts.is_empty() {
            return writeln!(f, "nothing to generate");
        }
        for artifact in &self.artifacts {
            writeln!(f, "{artifact}")?;
        }
        Ok(())
    }
}

/// Generates environment loaders for `@envconfig`-style annotations.
#[derive(Debug, Clone)]
pub struct EnvconfigAnnotation {
    settings: Settings,
}

impl EnvconfigAnnotation {
    /// Creates an annotator driven by `settings`.
    #[must_use]
    pub const fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Settings this annotator generates with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl Annotator for EnvconfigAnnotation {
    fn tag_name(&self) -> &str {
        &self.settings.tag_name
    }

    fn process(
        &self,
        project: &ProjectContext,
        directives: &[Directive],
    ) -> Result<Report, EnvgenError> {
        let context = GenerationContext::build(directives);
        let data = TemplateData::new(&self.settings.tag_name, project, &context);

        let mut report = Report::default();
        if let Some(artifact) =
            generate::generate_loader(&self.settings.target, &self.settings.template, &data)?
        {
            report.push(artifact);
        }
        if let Some(path) = &self.settings.dot_env {
            report.push(generate::generate_dot_env(path, &data)?);
        }
        if let Some(path) = &self.settings.usage_doc {
            report.push(generate::generate_usage_doc(path, &data)?);
        }
        Ok(report)
    }
}

/// Runs every annotator over the declarations found below `roots`.
pub struct AnnotateProject {
    roots: Vec<Utf8PathBuf>,
    source: Box<dyn DeclarationSource>,
    annotators: Vec<Box<dyn Annotator>>,
}

impl AnnotateProject {
    /// Creates a pipeline reading `roots` through `source`.
    pub fn new(roots: Vec<Utf8PathBuf>, source: impl DeclarationSource + 'static) -> Self {
        Self {
            roots,
            source: Box::new(source),
            annotators: Vec::new(),
        }
    }

    /// The standard pipeline: Rust sources and a single `@envconfig` annotator.
    #[must_use]
    pub fn for_settings(settings: Settings) -> Self {
        let roots = settings.sources.clone();
        let source = RustSource::new(settings.crate_root.clone());
        Self::new(roots, source).with_annotator(EnvconfigAnnotation::new(settings))
    }

    /// Adds an annotator; annotators run in insertion order.
    #[must_use]
    pub fn with_annotator(mut self, annotator: impl Annotator + 'static) -> Self {
        self.annotators.push(Box::new(annotator));
        self
    }

    /// Executes one generation pass.
    ///
    /// Every annotator's directives are extracted before any artifact is
    /// written, so malformed annotations never leave partial output.
    ///
    /// # Errors
    ///
    /// Propagates source, annotation, template and filesystem errors.
    pub fn run(&self, project: &ProjectContext) -> Result<Report, EnvgenError> {
        let declarations = self.source.list_declarations(&self.roots)?;

        let mut batches = Vec::with_capacity(self.annotators.len());
        for annotator in &self.annotators {
            let tag = annotator.tag_name();
            let directives =
                extract_directives(declarations.clone(), &annotator.filters(), tag)?;
            info!(tag, count = directives.len(), "collected directives");
            batches.push(directives);
        }

        let mut report = Report::default();
        for (annotator, directives) in self.annotators.iter().zip(&batches) {
            report.extend(annotator.process(project, directives)?);
        }
        Ok(report)
    }
}

impl fmt::Debug for AnnotateProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotateProject")
            .field("roots", &self.roots)
            .field("annotators", &self.annotators.len())
            .finish_non_exhaustive()
    }
}
