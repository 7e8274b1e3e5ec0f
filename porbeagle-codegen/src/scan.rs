//! Declaration scanner and capability binding lookup.

use crate::model::{Compilation, QualifiedName, TypeDeclaration, TypeRef};
use crate::registry::TypeRegistry;

/// How a declaration binds the capability interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityBinding {
    /// First type argument, when the parameterized form is used.
    pub self_type: Option<TypeRef>,
    /// Second type argument, the model the factory builds from.
    pub model: Option<TypeRef>,
}

/// Select every declaration that carries the generation marker and
/// implements the capability interface, in discovery order.
pub fn select_views<'a>(
    compilation: &'a Compilation,
    registry: &TypeRegistry,
) -> Vec<&'a TypeDeclaration> {
    let (Some(marker), Some(capability)) = (&registry.view_marker, &registry.capability) else {
        return Vec::new();
    };

    compilation
        .declarations
        .iter()
        .filter(|decl| is_view(decl, marker, capability))
        .collect()
}

fn is_view(decl: &TypeDeclaration, marker: &QualifiedName, capability: &QualifiedName) -> bool {
    if !decl.has_attribute(marker) {
        return false;
    }
    let implements = find_capability(decl, capability).is_some();
    if !implements {
        tracing::debug!(
            declaration = %decl.qualified_name(),
            "marked view does not implement {}, skipping",
            capability
        );
    }
    implements
}

fn find_capability<'a>(decl: &'a TypeDeclaration, capability: &QualifiedName) -> Option<&'a TypeRef> {
    decl.interfaces
        .iter()
        .find(|iface| iface.is_instance_of(capability))
}

/// Read the capability binding of `decl`, if it implements the interface.
pub fn capability_binding(decl: &TypeDeclaration, registry: &TypeRegistry) -> Option<CapabilityBinding> {
    let capability = registry.capability.as_ref()?;
    let iface = find_capability(decl, capability)?;

    Some(CapabilityBinding {
        self_type: iface.args.first().cloned(),
        model: iface.args.get(1).cloned(),
    })
}
