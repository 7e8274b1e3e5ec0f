//! Artifact writing and the `build.rs` entry point.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::emit::MANIFEST_DIR;
use crate::error::CodegenError;
use crate::pass::{generate, GenerationReport};
use crate::source::load_crate;

/// File names touched by [`write_artifacts`], by outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
    pub removed: Vec<String>,
}

/// Write every artifact plus the module manifests into `out_dir`.
///
/// Files whose content is already up to date are left untouched so their
/// mtime does not change. `*.generated.{extension}` files in `out_dir` and
/// module manifests that no longer correspond to the report are removed.
pub fn write_artifacts(
    out_dir: &Path,
    report: &GenerationReport,
    extension: &str,
) -> Result<WriteOutcome, CodegenError> {
    fs::create_dir_all(out_dir).map_err(|e| CodegenError::io(out_dir, e))?;

    let mut outcome = WriteOutcome::default();
    let files = report
        .artifacts
        .iter()
        .map(|a| (a.file_name.as_str(), a.content.as_str()))
        .chain(
            report
                .manifests
                .iter()
                .map(|m| (m.file_name.as_str(), m.content.as_str())),
        );

    for (file_name, content) in files {
        let path = out_dir.join(file_name);
        if fs::read_to_string(&path).ok().as_deref() == Some(content) {
            outcome.unchanged.push(file_name.to_string());
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CodegenError::io(parent, e))?;
        }
        fs::write(&path, content).map_err(|e| CodegenError::io(&path, e))?;
        outcome.written.push(file_name.to_string());
    }

    let suffix = format!(".generated.{}", extension);
    let entries = fs::read_dir(out_dir).map_err(|e| CodegenError::io(out_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CodegenError::io(out_dir, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let current = report.artifacts.iter().any(|a| a.file_name == file_name);
        if file_name.ends_with(&suffix) && !current {
            fs::remove_file(entry.path()).map_err(|e| CodegenError::io(entry.path(), e))?;
            tracing::debug!(file = %file_name, "removed stale artifact");
            outcome.removed.push(file_name);
        }
    }

    remove_stale_manifests(out_dir, report, &mut outcome)?;

    outcome.removed.sort();
    tracing::info!(
        written = outcome.written.len(),
        unchanged = outcome.unchanged.len(),
        removed = outcome.removed.len(),
        "wrote view artifacts to {}",
        out_dir.display()
    );
    Ok(outcome)
}

fn remove_stale_manifests(
    out_dir: &Path,
    report: &GenerationReport,
    outcome: &mut WriteOutcome,
) -> Result<(), CodegenError> {
    let mut pending = vec![out_dir.join(MANIFEST_DIR)];
    while let Some(dir) = pending.pop() {
        if !dir.is_dir() {
            continue;
        }
        let entries = fs::read_dir(&dir).map_err(|e| CodegenError::io(&dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| CodegenError::io(&dir, e))?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }

            let file_name = path
                .strip_prefix(out_dir)
                .map(|relative| {
                    relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect::<Vec<_>>()
                        .join("/")
                })
                .unwrap_or_default();
            if !report.manifests.iter().any(|m| m.file_name == file_name) {
                fs::remove_file(&path).map_err(|e| CodegenError::io(&path, e))?;
                tracing::debug!(file = %file_name, "removed stale manifest");
                outcome.removed.push(file_name);
            }
        }
    }
    Ok(())
}

/// Runs a generation pass from a build script.
///
/// ```no_run
/// // build.rs
/// fn main() {
///     porbeagle_codegen::Builder::new().generate().unwrap();
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    config: Option<GeneratorConfig>,
    source_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` instead of loading `porbeagle.toml` from the package root.
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Defaults to `$CARGO_MANIFEST_DIR/src`.
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    /// Defaults to `$OUT_DIR`.
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    pub fn generate(self) -> Result<WriteOutcome, CodegenError> {
        let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or_default();

        let config = match self.config {
            Some(config) => config,
            None => {
                let path = manifest_dir.join("porbeagle.toml");
                println!("cargo:rerun-if-changed={}", path.display());
                GeneratorConfig::load_optional(&path)?
            }
        };
        let source_dir = self.source_dir.unwrap_or_else(|| manifest_dir.join("src"));
        let out_dir = match self.out_dir {
            Some(dir) => dir,
            None => std::env::var_os("OUT_DIR")
                .map(PathBuf::from)
                .ok_or(CodegenError::MissingOutDir)?,
        };

        let tree = load_crate(&source_dir, &config)?;
        for file in &tree.files {
            println!("cargo:rerun-if-changed={}", file.display());
        }

        let report = generate(&tree.compilation, &config)?;
        for diagnostic in &report.diagnostics {
            println!("cargo:warning={}", diagnostic);
        }

        let outcome = write_artifacts(&out_dir, &report, &config.extension)?;
        if report.has_errors() {
            return Err(CodegenError::Generation {
                failed: report.failed(),
            });
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{render_manifests, MANIFEST_FILE};
    use crate::model::{GeneratedArtifact, QualifiedName};

    fn report_in(source: &str, files: &[&str]) -> GenerationReport {
        let artifacts: Vec<GeneratedArtifact> = files
            .iter()
            .map(|file| GeneratedArtifact {
                file_name: file.to_string(),
                source: QualifiedName::new(source),
                content: format!("// {}\n", file),
            })
            .collect();
        GenerationReport {
            manifests: render_manifests(&artifacts, "crate"),
            artifacts,
            diagnostics: Vec::new(),
        }
    }

    fn report(files: &[&str]) -> GenerationReport {
        report_in("crate::View", files)
    }

    #[test]
    fn test_second_write_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let report = report(&["crate_A.generated.rs"]);

        let first = write_artifacts(dir.path(), &report, "rs").unwrap();
        assert_eq!(first.written, vec!["crate_A.generated.rs", MANIFEST_FILE]);

        let second = write_artifacts(dir.path(), &report, "rs").unwrap();
        assert!(second.written.is_empty());
        assert_eq!(second.unchanged.len(), 2);
    }

    #[test]
    fn test_stale_artifacts_removed() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &report(&["crate_A.generated.rs", "crate_B.generated.rs"]), "rs").unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        let outcome = write_artifacts(dir.path(), &report(&["crate_A.generated.rs"]), "rs").unwrap();
        assert_eq!(outcome.removed, vec!["crate_B.generated.rs"]);
        assert!(!dir.path().join("crate_B.generated.rs").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_module_manifests_written_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let nested = report_in("crate::views::welcome::View", &["crate_views_welcome_View.generated.rs"]);

        let first = write_artifacts(dir.path(), &nested, "rs").unwrap();
        assert!(first.written.contains(&"porbeagle_views/views/welcome.rs".to_string()));
        let manifest = fs::read_to_string(dir.path().join("porbeagle_views/views/welcome.rs")).unwrap();
        assert!(manifest.contains("/crate_views_welcome_View.generated.rs"));

        let outcome = write_artifacts(dir.path(), &report(&["crate_A.generated.rs"]), "rs").unwrap();
        assert_eq!(
            outcome.removed,
            vec![
                "crate_views_welcome_View.generated.rs".to_string(),
                "porbeagle_views/views/welcome.rs".to_string(),
            ]
        );
        assert!(dir.path().join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_builder_writes_and_reports_failures() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(
            src.path().join("lib.rs"),
            r#"
            use porbeagle::{Button, DiscordView, MessageView};

            #[derive(DiscordView)]
            pub struct Ok1 {
                #[action_row(0)]
                a: Button,
            }
            impl MessageView for Ok1 {}

            #[derive(DiscordView)]
            pub struct Broken {
                #[action_row]
                a: Button,
            }
            impl MessageView for Broken {}
            "#,
        )
        .unwrap();

        let result = Builder::new()
            .config(GeneratorConfig::default())
            .source_dir(src.path())
            .out_dir(out.path())
            .generate();

        match result {
            Err(CodegenError::Generation { failed }) => {
                assert_eq!(failed, vec![QualifiedName::new("crate::Broken")]);
            }
            other => panic!("expected a generation failure, got {:?}", other),
        }
        assert!(out.path().join("crate_Ok1.generated.rs").exists());
        assert!(!out.path().join("crate_Broken.generated.rs").exists());
    }
}
