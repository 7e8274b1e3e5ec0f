//! Module scopes and path resolution for the source frontend.
//!
//! Resolution is shallow: it understands `use` imports (aliases,
//! groups, globs, `self`/`super`/`crate` prefixes), the module's own items and
//! child modules. Anything it cannot place is kept as written, which is how
//! extern-crate paths and prelude names come through.

use std::collections::{BTreeMap, BTreeSet};

use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type, UseTree};

use crate::model::{QualifiedName, TypeRef};

/// Names visible inside one module.
#[derive(Debug, Clone, Default)]
pub struct ModuleScope {
    pub path: String,
    /// Alias -> import path segments, as written.
    pub imports: BTreeMap<String, Vec<String>>,
    /// Glob import prefixes, as written.
    pub globs: Vec<Vec<String>>,
    /// Types, traits and aliases declared directly in this module.
    pub locals: BTreeSet<String>,
}

impl ModuleScope {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn add_use_tree(&mut self, tree: &UseTree) {
        collect_use_tree(Vec::new(), tree, self);
    }
}

fn collect_use_tree(mut prefix: Vec<String>, tree: &UseTree, scope: &mut ModuleScope) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_use_tree(prefix, &path.tree, scope);
        }
        UseTree::Name(name) => {
            let ident = name.ident.to_string();
            if ident == "self" {
                if let Some(alias) = prefix.last().cloned() {
                    scope.imports.insert(alias, prefix);
                }
            } else {
                prefix.push(ident.clone());
                scope.imports.insert(ident, prefix);
            }
        }
        UseTree::Rename(rename) => {
            let ident = rename.ident.to_string();
            if ident != "self" {
                prefix.push(ident);
            }
            if rename.rename != "_" {
                scope.imports.insert(rename.rename.to_string(), prefix);
            }
        }
        UseTree::Glob(_) => scope.globs.push(prefix),
        UseTree::Group(group) => {
            for item in &group.items {
                collect_use_tree(prefix.clone(), item, scope);
            }
        }
    }
}

/// Resolves paths against the scopes of every scanned module.
pub struct Resolver<'a> {
    crate_name: &'a str,
    modules: &'a BTreeMap<String, ModuleScope>,
    known: &'a BTreeSet<QualifiedName>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        crate_name: &'a str,
        modules: &'a BTreeMap<String, ModuleScope>,
        known: &'a BTreeSet<QualifiedName>,
    ) -> Self {
        Self {
            crate_name,
            modules,
            known,
        }
    }

    pub fn resolve_path(&self, module: &str, path: &syn::Path) -> QualifiedName {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        if path.leading_colon.is_some() {
            return QualifiedName::new(segments.join("::"));
        }
        QualifiedName::new(self.resolve_segments(module, &segments))
    }

    fn resolve_segments(&self, module: &str, segments: &[String]) -> String {
        let Some((first, rest)) = segments.split_first() else {
            return String::new();
        };

        if let Some(anchored) = self.anchor(module, segments) {
            return anchored;
        }

        let Some(scope) = self.modules.get(module) else {
            return segments.join("::");
        };

        if let Some(target) = scope.imports.get(first) {
            let base = self
                .anchor(module, target)
                .unwrap_or_else(|| target.join("::"));
            return join(&base, rest);
        }

        if scope.locals.contains(first) {
            return join(&format!("{}::{}", module, first), rest);
        }

        for glob in &scope.globs {
            let base = self.anchor(module, glob).unwrap_or_else(|| glob.join("::"));
            let candidate = join(&format!("{}::{}", base, first), rest);
            if self.is_known(&candidate) {
                return candidate;
            }
        }

        segments.join("::")
    }

    /// Resolve paths whose meaning does not depend on imports: `crate::`,
    /// `self::`, `super::` and child modules of `module`.
    fn anchor(&self, module: &str, segments: &[String]) -> Option<String> {
        let (first, rest) = segments.split_first()?;
        match first.as_str() {
            "crate" => Some(join(self.crate_name, rest)),
            "self" => Some(join(module, rest)),
            "super" => {
                let mut base = parent(module);
                let mut rest = rest;
                while let Some(("super", tail)) = rest.split_first().map(|(h, t)| (h.as_str(), t)) {
                    base = parent(&base);
                    rest = tail;
                }
                Some(join(&base, rest))
            }
            _ => {
                let child = format!("{}::{}", module, first);
                self.modules
                    .contains_key(&child)
                    .then(|| join(&child, rest))
            }
        }
    }

    fn is_known(&self, candidate: &str) -> bool {
        self.known.contains(&QualifiedName::new(candidate)) || self.modules.contains_key(candidate)
    }

    /// Whether `name` is a referenced or scanned definition.
    pub fn knows(&self, name: &QualifiedName) -> bool {
        self.known.contains(name)
    }

    /// Resolve a type. `Self` maps to `self_type` when one is in scope.
    pub fn resolve_type(&self, module: &str, ty: &Type, self_type: Option<&TypeRef>) -> TypeRef {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => {
                let path = &type_path.path;
                if let (Some(self_type), true) = (self_type, path.is_ident("Self")) {
                    return self_type.clone();
                }
                let name = self.resolve_path(module, path);
                let args = path
                    .segments
                    .last()
                    .map(|segment| self.resolve_args(module, &segment.arguments, self_type))
                    .unwrap_or_default();
                TypeRef::generic(name, args)
            }
            Type::Group(group) => self.resolve_type(module, &group.elem, self_type),
            Type::Paren(paren) => self.resolve_type(module, &paren.elem, self_type),
            other => TypeRef::named(other.to_token_stream().to_string()),
        }
    }

    pub fn resolve_args(
        &self,
        module: &str,
        arguments: &PathArguments,
        self_type: Option<&TypeRef>,
    ) -> Vec<TypeRef> {
        match arguments {
            PathArguments::AngleBracketed(bracketed) => bracketed
                .args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(ty) => Some(self.resolve_type(module, ty, self_type)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn join(base: &str, rest: &[String]) -> String {
    let mut out = base.to_string();
    for segment in rest {
        if !out.is_empty() {
            out.push_str("::");
        }
        out.push_str(segment);
    }
    out
}

fn parent(module: &str) -> String {
    module
        .rsplit_once("::")
        .map(|(parent, _)| parent.to_string())
        .unwrap_or_else(|| module.to_string())
}
