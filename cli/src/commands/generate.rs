use std::path::Path;

use anyhow::Result;
use porbeagle_codegen::{write_artifacts, GeneratorConfig, Severity};

use super::load_input;
use crate::ui;
use crate::InputArgs;

pub fn generate(config: &GeneratorConfig, input: &InputArgs, out: &Path) -> Result<()> {
    let compilation = load_input(config, input)?;
    let report = porbeagle_codegen::generate(&compilation, config)?;

    for diagnostic in &report.diagnostics {
        match diagnostic.severity {
            Severity::Warning => ui::print_warning(&diagnostic.to_string()),
            Severity::Error => ui::print_failure(&diagnostic.to_string()),
        }
    }

    let outcome = write_artifacts(out, &report, &config.extension)?;
    ui::print_success(&format!(
        "{} view(s) in {} ({} written, {} unchanged, {} removed)",
        report.artifacts.len(),
        out.display(),
        outcome.written.len(),
        outcome.unchanged.len(),
        outcome.removed.len(),
    ));

    let failed = report.failed();
    if !failed.is_empty() {
        anyhow::bail!("{} view(s) failed to generate", failed.len());
    }
    Ok(())
}
