pub mod generate;
pub mod inspect;
pub mod snapshot;

use anyhow::{Context, Result};
use porbeagle_codegen::source::load_crate;
use porbeagle_codegen::{Compilation, GeneratorConfig};

use crate::InputArgs;

/// Build the compilation from a snapshot file or by scanning sources.
pub fn load_input(config: &GeneratorConfig, input: &InputArgs) -> Result<Compilation> {
    match &input.snapshot {
        Some(path) => Compilation::load(path)
            .with_context(|| format!("Failed to load snapshot: {}", path.display())),
        None => {
            let tree = load_crate(&input.src, config)
                .with_context(|| format!("Failed to scan sources in {}", input.src.display()))?;
            Ok(tree.compilation)
        }
    }
}
