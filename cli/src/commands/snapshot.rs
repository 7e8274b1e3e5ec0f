use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use porbeagle_codegen::source::load_crate;
use porbeagle_codegen::GeneratorConfig;

use crate::ui;

pub fn snapshot(config: &GeneratorConfig, src: &Path, out: Option<&Path>) -> Result<()> {
    let tree = load_crate(src, config)
        .with_context(|| format!("Failed to scan sources in {}", src.display()))?;
    let json = tree.compilation.to_json()?;

    match out {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
            ui::print_success(&format!(
                "{} declaration(s) from {} file(s) written to {}",
                tree.compilation.declarations.len(),
                tree.files.len(),
                path.display()
            ));
        }
        None => println!("{}", json),
    }
    Ok(())
}
