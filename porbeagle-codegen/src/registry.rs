//! Well-known type registry.
//!
//! Resolved once per pass from the compilation's reference set and shared,
//! read-only, by every declaration processed in that pass.

use crate::config::WellKnownNames;
use crate::error::GenerationError;
use crate::model::{Compilation, QualifiedName};

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    pub view_marker: Option<QualifiedName>,
    pub sticker_marker: Option<QualifiedName>,
    pub action_row_marker: Option<QualifiedName>,
    pub capability: Option<QualifiedName>,
    pub snowflake: Option<QualifiedName>,
    pub embed: Option<QualifiedName>,
}

impl TypeRegistry {
    pub fn resolve(compilation: &Compilation, names: &WellKnownNames) -> Self {
        let lookup = |name: &QualifiedName| compilation.defines(name).then(|| name.clone());

        Self {
            view_marker: lookup(&names.view_marker),
            sticker_marker: lookup(&names.sticker_marker),
            action_row_marker: lookup(&names.action_row_marker),
            capability: lookup(&names.capability),
            snowflake: lookup(&names.snowflake),
            embed: lookup(&names.embed),
        }
    }

    /// Well-known names that could not be resolved, as registry errors.
    pub fn unresolved(&self, names: &WellKnownNames) -> Vec<GenerationError> {
        let slots: [(&'static str, &Option<QualifiedName>, &QualifiedName); 6] = [
            ("view marker", &self.view_marker, &names.view_marker),
            ("sticker marker", &self.sticker_marker, &names.sticker_marker),
            (
                "action-row marker",
                &self.action_row_marker,
                &names.action_row_marker,
            ),
            ("capability interface", &self.capability, &names.capability),
            ("snowflake type", &self.snowflake, &names.snowflake),
            ("embed type", &self.embed, &names.embed),
        ];

        slots
            .into_iter()
            .filter(|(_, resolved, _)| resolved.is_none())
            .map(|(slot, _, name)| GenerationError::UnresolvedWellKnownType {
                slot,
                name: name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_only_referenced_names() {
        let names = WellKnownNames::default();
        let mut compilation = Compilation::default();
        compilation.references.insert(names.snowflake.clone());
        compilation.references.insert(names.capability.clone());

        let registry = TypeRegistry::resolve(&compilation, &names);
        assert_eq!(registry.snowflake.as_ref(), Some(&names.snowflake));
        assert_eq!(registry.capability.as_ref(), Some(&names.capability));
        assert!(registry.embed.is_none());

        let missing = registry.unresolved(&names);
        assert_eq!(missing.len(), 4);
        assert!(missing.iter().any(|e| matches!(
            e,
            GenerationError::UnresolvedWellKnownType { slot: "embed type", .. }
        )));
    }
}
