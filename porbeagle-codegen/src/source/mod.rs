//! Rust source frontend.
//!
//! Builds a [`Compilation`] snapshot from a crate's `src/` tree: follows
//! `mod` declarations into their files, records each module's imports and
//! items, resolves every derive, attribute, field type and trait path, and
//! attaches `impl Trait for Type` headers to the declarations they implement.

mod resolve;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, ExprUnary, Fields, Item, ItemImpl, ItemMod, ItemStruct, Lit, Meta, Token, UnOp};

pub use resolve::{ModuleScope, Resolver};

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::model::{
    AttributeArg, AttributeInstance, Compilation, DeclaredMember, QualifiedName, TypeDeclaration,
    TypeRef,
};

/// Public items of the `porbeagle` runtime crate, the default reference set.
pub const RUNTIME_SURFACE: &[&str] = &[
    "porbeagle::DiscordView",
    "porbeagle::MessageView",
    "porbeagle::ViewParts",
    "porbeagle::MessagePayload",
    "porbeagle::Snowflake",
    "porbeagle::Embed",
    "porbeagle::EmbedField",
    "porbeagle::Component",
    "porbeagle::ActionRow",
    "porbeagle::Button",
    "porbeagle::ButtonStyle",
    "porbeagle::SelectMenu",
    "porbeagle::SelectOption",
    "porbeagle::attributes::sticker",
    "porbeagle::attributes::action_row",
];

/// A scanned crate: its snapshot plus every file that went into it.
#[derive(Debug, Clone)]
pub struct SourceTree {
    pub compilation: Compilation,
    pub files: Vec<PathBuf>,
}

/// Scan the crate rooted at `src_dir` (`lib.rs`, else `main.rs`).
pub fn load_crate(src_dir: &Path, config: &GeneratorConfig) -> Result<SourceTree, CodegenError> {
    let root = ["lib.rs", "main.rs"]
        .iter()
        .map(|file| src_dir.join(file))
        .find(|path| path.exists())
        .ok_or_else(|| {
            CodegenError::io(
                src_dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no lib.rs or main.rs"),
            )
        })?;

    let mut loader = ModuleLoader::default();
    loader.load_file(&root, config.crate_name.clone(), src_dir)?;
    tracing::debug!(
        modules = loader.units.len(),
        files = loader.files.len(),
        "scanned crate sources"
    );

    Ok(SourceTree {
        compilation: build_compilation(&loader.units, config),
        files: loader.files,
    })
}

/// Build a snapshot from a single source text. Out-of-line `mod x;`
/// declarations are skipped; inline modules are followed.
pub fn parse_source(source: &str, config: &GeneratorConfig) -> Result<Compilation, syn::Error> {
    let file = syn::parse_file(source)?;
    let mut loader = ModuleLoader::default();
    // No directory: out-of-line modules cannot be followed.
    loader
        .add_module(config.crate_name.clone(), file.items, None)
        .map_err(|e| syn::Error::new(proc_macro2::Span::call_site(), e.to_string()))?;
    Ok(build_compilation(&loader.units, config))
}

struct ModuleUnit {
    path: String,
    items: Vec<Item>,
}

#[derive(Default)]
struct ModuleLoader {
    units: Vec<ModuleUnit>,
    files: Vec<PathBuf>,
}

impl ModuleLoader {
    fn load_file(&mut self, path: &Path, module: String, dir: &Path) -> Result<(), CodegenError> {
        let source = fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        let file = syn::parse_file(&source).map_err(|source| CodegenError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        self.files.push(path.to_path_buf());
        self.add_module(module, file.items, Some(dir))
    }

    /// `dir` is where child module files of `module` live.
    fn add_module(&mut self, module: String, items: Vec<Item>, dir: Option<&Path>) -> Result<(), CodegenError> {
        let children: Vec<ItemMod> = items
            .iter()
            .filter_map(|item| match item {
                Item::Mod(item_mod) if !is_cfg_test(&item_mod.attrs) => Some(item_mod.clone()),
                _ => None,
            })
            .collect();

        self.units.push(ModuleUnit {
            path: module.clone(),
            items,
        });

        for child in children {
            let ident = child.ident.to_string();
            let child_path = format!("{}::{}", module, ident);
            let child_dir = dir.map(|dir| dir.join(&ident));

            match (child.content, dir, child_dir) {
                (Some((_, items)), _, child_dir) => {
                    self.add_module(child_path, items, child_dir.as_deref())?
                }
                (None, Some(dir), Some(child_dir)) => match find_module_file(dir, &ident) {
                    Some(file) => self.load_file(&file, child_path, &child_dir)?,
                    None => tracing::warn!(module = %child_path, "module file not found, skipping"),
                },
                (None, _, _) => {
                    tracing::debug!(module = %child_path, "out-of-line module without a source directory")
                }
            }
        }
        Ok(())
    }
}

fn find_module_file(dir: &Path, ident: &str) -> Option<PathBuf> {
    [
        dir.join(format!("{}.rs", ident)),
        dir.join(ident).join("mod.rs"),
    ]
    .into_iter()
    .find(|path| path.exists())
}

/// Whether a `#[cfg(..)]` on the item can only hold in test builds.
fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("cfg"))
        .filter_map(|attr| attr.parse_args::<Meta>().ok())
        .any(|predicate| requires_test(&predicate))
}

fn requires_test(predicate: &Meta) -> bool {
    match predicate {
        Meta::Path(path) => path.is_ident("test"),
        Meta::List(list) => {
            let Ok(nested) = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) else {
                return false;
            };
            if list.path.is_ident("all") {
                nested.iter().any(requires_test)
            } else if list.path.is_ident("any") {
                !nested.is_empty() && nested.iter().all(requires_test)
            } else {
                false
            }
        }
        Meta::NameValue(_) => false,
    }
}

/// Alias chains longer than this are left unexpanded.
const MAX_ALIAS_DEPTH: usize = 8;

/// Replace type aliases declared in the scanned crate by their targets.
fn expand_aliases(ty: &TypeRef, aliases: &HashMap<QualifiedName, TypeRef>, depth: usize) -> TypeRef {
    if depth == 0 {
        return ty.clone();
    }
    match aliases.get(&ty.name) {
        Some(target) if ty.args.is_empty() => expand_aliases(target, aliases, depth - 1),
        _ => TypeRef::generic(
            ty.name.clone(),
            ty.args
                .iter()
                .map(|arg| expand_aliases(arg, aliases, depth - 1))
                .collect(),
        ),
    }
}

fn build_compilation(units: &[ModuleUnit], config: &GeneratorConfig) -> Compilation {
    let mut scopes = BTreeMap::new();
    for unit in units {
        let mut scope = ModuleScope::new(unit.path.clone());
        for item in &unit.items {
            match item {
                Item::Use(item_use) => scope.add_use_tree(&item_use.tree),
                Item::Struct(s) => {
                    scope.locals.insert(s.ident.to_string());
                }
                Item::Enum(e) => {
                    scope.locals.insert(e.ident.to_string());
                }
                Item::Trait(t) => {
                    scope.locals.insert(t.ident.to_string());
                }
                Item::Type(t) => {
                    scope.locals.insert(t.ident.to_string());
                }
                Item::Union(u) => {
                    scope.locals.insert(u.ident.to_string());
                }
                _ => {}
            }
        }
        scopes.insert(unit.path.clone(), scope);
    }

    let references: BTreeSet<QualifiedName> = RUNTIME_SURFACE
        .iter()
        .map(|name| QualifiedName::new(*name))
        .chain(config.extra_references.iter().cloned())
        .collect();

    let mut known = references.clone();
    for scope in scopes.values() {
        for local in &scope.locals {
            known.insert(QualifiedName::join(&scope.path, local));
        }
    }

    let resolver = Resolver::new(&config.crate_name, &scopes, &known);

    // Generic aliases are kept as written.
    let mut aliases = HashMap::new();
    for unit in units {
        for item in &unit.items {
            if let Item::Type(alias) = item {
                if alias.generics.params.is_empty() {
                    aliases.insert(
                        QualifiedName::join(&unit.path, &alias.ident.to_string()),
                        resolver.resolve_type(&unit.path, &alias.ty, None),
                    );
                }
            }
        }
    }

    let mut declarations = Vec::new();
    for unit in units {
        for item in &unit.items {
            if let Item::Struct(item_struct) = item {
                let mut decl = build_declaration(item_struct, &unit.path, &resolver, config);
                for member in &mut decl.members {
                    member.ty = expand_aliases(&member.ty, &aliases, MAX_ALIAS_DEPTH);
                }
                declarations.push(decl);
            }
        }
    }

    let index: HashMap<QualifiedName, usize> = declarations
        .iter()
        .enumerate()
        .map(|(i, decl)| (decl.qualified_name(), i))
        .collect();

    for unit in units {
        for item in &unit.items {
            let Item::Impl(item_impl) = item else { continue };
            let Some((self_type, iface)) = trait_impl(item_impl, &unit.path, &resolver) else {
                continue;
            };
            if let Some(&i) = index.get(&self_type.name) {
                tracing::trace!(declaration = %self_type.name, interface = %iface, "attached impl");
                declarations[i].interfaces.push(iface);
            }
        }
    }

    Compilation {
        declarations,
        references,
    }
}

fn build_declaration(
    item: &ItemStruct,
    module: &str,
    resolver: &Resolver<'_>,
    config: &GeneratorConfig,
) -> TypeDeclaration {
    let mut decl = TypeDeclaration::new(module, item.ident.to_string());

    decl.generics = item
        .generics
        .params
        .iter()
        .map(|param| match param {
            syn::GenericParam::Type(t) => t.ident.to_string(),
            syn::GenericParam::Lifetime(l) => l.lifetime.to_string(),
            syn::GenericParam::Const(c) => c.ident.to_string(),
        })
        .collect();

    decl.attributes = item
        .attrs
        .iter()
        .flat_map(|attr| parse_attribute(attr, module, resolver, None))
        .collect();

    // Inert helpers of the view derive are unqualified on the fields; only
    // names present in the reference set are treated as helpers.
    let helper_namespace = decl
        .has_attribute(&config.well_known.view_marker)
        .then_some(config.helper_namespace.as_str());

    let fields: Vec<(String, &syn::Field)> = match &item.fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|f| f.ident.as_ref().map(|ident| (ident.to_string(), f)))
            .collect(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, f)| (i.to_string(), f))
            .collect(),
        Fields::Unit => Vec::new(),
    };

    decl.members = fields
        .into_iter()
        .map(|(name, field)| DeclaredMember {
            name,
            ty: resolver.resolve_type(module, &field.ty, None),
            attributes: field
                .attrs
                .iter()
                .flat_map(|attr| parse_attribute(attr, module, resolver, helper_namespace))
                .collect(),
        })
        .collect();

    decl
}

/// `impl Trait<..> for Type` -> (resolved self type, resolved trait).
fn trait_impl(item: &ItemImpl, module: &str, resolver: &Resolver<'_>) -> Option<(TypeRef, TypeRef)> {
    let (negative, trait_path, _) = item.trait_.as_ref()?;
    if negative.is_some() {
        return None;
    }

    let self_type = resolver.resolve_type(module, &item.self_ty, None);
    let args = trait_path
        .segments
        .last()
        .map(|segment| resolver.resolve_args(module, &segment.arguments, Some(&self_type)))
        .unwrap_or_default();
    let iface = TypeRef::generic(resolver.resolve_path(module, trait_path), args);
    Some((self_type, iface))
}

fn parse_attribute(
    attr: &Attribute,
    module: &str,
    resolver: &Resolver<'_>,
    helper_namespace: Option<&str>,
) -> Vec<AttributeInstance> {
    let path = attr.path();

    if path.is_ident("derive") {
        return attr
            .parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
            .map(|paths| {
                paths
                    .iter()
                    .map(|p| AttributeInstance::marker(resolver.resolve_path(module, p)))
                    .collect()
            })
            .unwrap_or_default();
    }
    if path.is_ident("doc") {
        return Vec::new();
    }

    let helper = helper_namespace
        .zip(path.get_ident())
        .map(|(namespace, ident)| QualifiedName::join(namespace, &ident.to_string()))
        .filter(|helper| resolver.knows(helper));
    let class = helper.unwrap_or_else(|| resolver.resolve_path(module, path));

    vec![AttributeInstance::with_args(
        class,
        attribute_args(attr, module, resolver),
    )]
}

fn attribute_args(attr: &Attribute, module: &str, resolver: &Resolver<'_>) -> Vec<AttributeArg> {
    match &attr.meta {
        Meta::Path(_) => Vec::new(),
        Meta::List(list) => match list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
            Ok(exprs) => exprs.iter().map(|e| expr_arg(e, module, resolver)).collect(),
            Err(_) => vec![AttributeArg::Other(list.tokens.to_string())],
        },
        Meta::NameValue(name_value) => vec![expr_arg(&name_value.value, module, resolver)],
    }
}

fn expr_arg(expr: &Expr, module: &str, resolver: &Resolver<'_>) -> AttributeArg {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => lit_arg(lit),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match &**inner {
            Expr::Lit(ExprLit {
                lit: Lit::Int(int), ..
            }) => int
                .base10_parse::<i64>()
                .map(|value| AttributeArg::Int(-value))
                .unwrap_or_else(|_| AttributeArg::Other(expr.to_token_stream().to_string())),
            _ => AttributeArg::Other(expr.to_token_stream().to_string()),
        },
        Expr::Path(expr_path) if expr_path.qself.is_none() => {
            AttributeArg::Type(TypeRef::named(resolver.resolve_path(module, &expr_path.path)))
        }
        other => AttributeArg::Other(other.to_token_stream().to_string()),
    }
}

fn lit_arg(lit: &Lit) -> AttributeArg {
    match lit {
        Lit::Int(int) => int
            .base10_parse::<i64>()
            .map(AttributeArg::Int)
            .unwrap_or_else(|_| AttributeArg::Other(int.to_string())),
        Lit::Str(s) => AttributeArg::Str(s.value()),
        Lit::Bool(b) => AttributeArg::Bool(b.value),
        other => AttributeArg::Other(other.to_token_stream().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWS: &str = r#"
        use porbeagle::{DiscordView, Embed, MessageView, Snowflake};

        pub mod models {
            pub struct Member {
                pub name: String,
            }
        }

        pub mod views {
            use super::models::*;
            use porbeagle::{Button, Embed as Card, Snowflake};

            /// Greets a member.
            #[derive(Debug, Clone, porbeagle::DiscordView)]
            pub struct Welcome {
                text: String,
                #[sticker]
                wave: Snowflake,
                card: Card,
                #[action_row(1)]
                help: Button,
                #[action_row(-2)]
                broken: Button,
                #[serde(rename = "x")]
                other: Option<Snowflake>,
            }

            impl porbeagle::MessageView<Self, Member> for Welcome {}
        }

        #[derive(DiscordView)]
        pub struct Tuple(#[sticker] Snowflake, Embed);

        impl MessageView for Tuple {}

        #[cfg(test)]
        mod tests {
            #[derive(porbeagle::DiscordView)]
            struct Hidden;
        }
    "#;

    fn compilation() -> Compilation {
        parse_source(VIEWS, &GeneratorConfig::default()).expect("source should parse")
    }

    fn find<'a>(compilation: &'a Compilation, name: &str) -> &'a TypeDeclaration {
        compilation
            .declarations
            .iter()
            .find(|d| d.qualified_name().as_str() == name)
            .unwrap_or_else(|| panic!("{} not found", name))
    }

    #[test]
    fn test_discovers_structs_in_inline_modules() {
        let compilation = compilation();
        let names: Vec<String> = compilation
            .declarations
            .iter()
            .map(|d| d.qualified_name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["crate::Tuple", "crate::models::Member", "crate::views::Welcome"]
        );
    }

    #[test]
    fn test_resolves_derives_and_helpers() {
        let compilation = compilation();
        let welcome = find(&compilation, "crate::views::Welcome");

        assert!(welcome.has_attribute(&QualifiedName::new("porbeagle::DiscordView")));
        assert!(welcome.has_attribute(&QualifiedName::new("Debug")));

        let wave = &welcome.members[1];
        assert_eq!(wave.ty, TypeRef::named("porbeagle::Snowflake"));
        assert_eq!(
            wave.attributes,
            vec![AttributeInstance::marker("porbeagle::attributes::sticker")]
        );

        assert_eq!(welcome.members[2].ty, TypeRef::named("porbeagle::Embed"));
        assert_eq!(welcome.members[3].attributes[0].args, vec![AttributeArg::Int(1)]);
        assert_eq!(welcome.members[4].attributes[0].args, vec![AttributeArg::Int(-2)]);
        assert_eq!(
            welcome.members[5].ty,
            TypeRef::generic("Option", vec![TypeRef::named("porbeagle::Snowflake")])
        );
        assert_eq!(
            welcome.members[5].attributes[0].class,
            Some(QualifiedName::new("serde"))
        );
    }

    #[test]
    fn test_attaches_trait_impls_with_self_substitution() {
        let compilation = compilation();
        let welcome = find(&compilation, "crate::views::Welcome");
        assert_eq!(
            welcome.interfaces,
            vec![TypeRef::generic(
                "porbeagle::MessageView",
                vec![
                    TypeRef::named("crate::views::Welcome"),
                    TypeRef::named("crate::models::Member"),
                ],
            )]
        );

        let tuple = find(&compilation, "crate::Tuple");
        assert_eq!(tuple.interfaces, vec![TypeRef::named("porbeagle::MessageView")]);
        assert_eq!(tuple.members[0].name, "0");
        assert_eq!(tuple.members[1].name, "1");
    }

    #[test]
    fn test_reference_set_includes_runtime_surface() {
        let compilation = compilation();
        assert!(compilation.defines(&QualifiedName::new("porbeagle::Snowflake")));
        assert!(compilation.defines(&QualifiedName::new("porbeagle::attributes::action_row")));
    }

    #[test]
    fn test_skips_modules_only_compiled_for_tests() {
        let compilation = parse_source(
            r#"
            #[cfg(all(test, feature = "discord"))]
            mod gated {
                struct Hidden;
            }

            #[cfg(all(feature = "x", any(test, all(test, unix))))]
            mod either {
                struct AlsoHidden;
            }

            #[cfg(not(test))]
            mod release {
                pub struct Shipped;
            }

            #[cfg(any(test, feature = "extra"))]
            mod extra {
                pub struct Optional;
            }
            "#,
            &GeneratorConfig::default(),
        )
        .unwrap();

        let names: Vec<String> = compilation
            .declarations
            .iter()
            .map(|d| d.qualified_name().to_string())
            .collect();
        assert_eq!(names, vec!["crate::release::Shipped", "crate::extra::Optional"]);
    }

    #[test]
    fn test_member_types_follow_aliases() {
        let compilation = parse_source(
            r#"
            mod parts {
                pub type Card = porbeagle::Embed;
                pub type Banner = Card;
            }

            use parts::{Banner, Card};

            #[derive(porbeagle::DiscordView)]
            pub struct Notice {
                card: Card,
                banner: Banner,
                maybe: Option<Card>,
            }
            "#,
            &GeneratorConfig::default(),
        )
        .unwrap();

        let notice = find(&compilation, "crate::Notice");
        assert_eq!(notice.members[0].ty, TypeRef::named("porbeagle::Embed"));
        assert_eq!(notice.members[1].ty, TypeRef::named("porbeagle::Embed"));
        assert_eq!(
            notice.members[2].ty,
            TypeRef::generic("Option", vec![TypeRef::named("porbeagle::Embed")])
        );
    }

    #[test]
    fn test_helpers_outside_views_resolve_normally() {
        let compilation = parse_source(
            r#"
            struct Plain {
                #[sticker]
                id: u64,
            }
            "#,
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert_eq!(
            compilation.declarations[0].members[0].attributes[0].class,
            Some(QualifiedName::new("sticker"))
        );
    }
}
