//! One generation pass over a [`Compilation`].
//!
//! Resolves the registry once, then selects, classifies, groups and emits
//! every view declaration independently. A failing declaration is reported
//! as a diagnostic and never blocks the others.

use serde::Serialize;

use crate::classify::{classify_view, ClassifiedView};
use crate::config::GeneratorConfig;
use crate::emit::{render_manifests, Emitter, ViewManifest};
use crate::error::{CodegenError, Diagnostic, GenerationError};
use crate::group::enforce_row_limit;
use crate::model::{ActionRowGroup, Compilation, GeneratedArtifact, QualifiedName, TypeDeclaration};
use crate::registry::TypeRegistry;
use crate::scan::{capability_binding, select_views};

/// Everything a pass produced.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub artifacts: Vec<GeneratedArtifact>,
    pub diagnostics: Vec<Diagnostic>,
    /// One `include!` list per module that declares views, plus the root.
    pub manifests: Vec<ViewManifest>,
}

impl GenerationReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Declarations that produced no artifact because of an error.
    pub fn failed(&self) -> Vec<QualifiedName> {
        self.diagnostics
            .iter()
            .filter(|d| d.is_error())
            .filter_map(|d| d.declaration.clone())
            .collect()
    }
}

/// Per-declaration classification summary, as printed by `porbeagle inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewReport {
    pub declaration: QualifiedName,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stickers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub action_rows: Vec<ActionRowGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run the pipeline up to classification for a single view.
fn process_view(
    decl: &TypeDeclaration,
    registry: &TypeRegistry,
    config: &GeneratorConfig,
) -> Result<ClassifiedView, GenerationError> {
    if !decl.generics.is_empty() {
        return Err(GenerationError::GenericDeclaration {
            params: decl.generics.clone(),
        });
    }

    let binding = capability_binding(decl, registry);
    let view = classify_view(decl, registry, binding)?;
    enforce_row_limit(&view.action_rows, config.max_action_rows)?;
    Ok(view)
}

fn prepare_registry(
    compilation: &Compilation,
    config: &GeneratorConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<TypeRegistry, CodegenError> {
    let registry = TypeRegistry::resolve(compilation, &config.well_known);

    for missing in registry.unresolved(&config.well_known) {
        if config.strict_registry {
            return Err(CodegenError::Registry(missing));
        }
        tracing::warn!("{}; dependent rules never match", missing);
        diagnostics.push(Diagnostic::warning(None, missing.to_string()));
    }
    Ok(registry)
}

/// Generate companion artifacts for every view in `compilation`.
pub fn generate(compilation: &Compilation, config: &GeneratorConfig) -> Result<GenerationReport, CodegenError> {
    let mut report = GenerationReport::default();
    let registry = prepare_registry(compilation, config, &mut report.diagnostics)?;
    let emitter = Emitter::new(config);

    for decl in select_views(compilation, &registry) {
        let name = decl.qualified_name();
        match process_view(decl, &registry, config) {
            Ok(view) => {
                tracing::debug!(
                    declaration = %name,
                    stickers = view.stickers.len(),
                    embeds = view.embeds.len(),
                    action_rows = view.action_rows.len(),
                    "classified view"
                );
                report.artifacts.push(emitter.emit(decl, &view));
            }
            Err(error) => {
                tracing::error!(declaration = %name, "{}", error);
                report.diagnostics.push(Diagnostic::error(&name, &error));
            }
        }
    }

    report.manifests = render_manifests(&report.artifacts, &config.crate_name);
    Ok(report)
}

/// Classify every view without emitting anything.
pub fn inspect(compilation: &Compilation, config: &GeneratorConfig) -> Result<Vec<ViewReport>, CodegenError> {
    let mut diagnostics = Vec::new();
    let registry = prepare_registry(compilation, config, &mut diagnostics)?;

    Ok(select_views(compilation, &registry)
        .into_iter()
        .map(|decl| {
            let declaration = decl.qualified_name();
            match process_view(decl, &registry, config) {
                Ok(view) => ViewReport {
                    declaration,
                    model: view
                        .binding
                        .as_ref()
                        .and_then(|b| b.model.as_ref())
                        .map(ToString::to_string),
                    stickers: view.stickers,
                    embeds: view.embeds,
                    action_rows: view.action_rows,
                    ignored: view.ignored,
                    error: None,
                },
                Err(error) => ViewReport {
                    declaration,
                    stickers: Vec::new(),
                    embeds: Vec::new(),
                    action_rows: Vec::new(),
                    ignored: Vec::new(),
                    model: None,
                    error: Some(error.to_string()),
                },
            }
        })
        .collect())
}
