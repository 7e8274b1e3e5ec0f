//! Companion declaration emitter.
//!
//! Renders a [`ClassifiedView`] as Rust source text: an `impl ViewParts`
//! block with the three derived accessors and, when the capability binding
//! names a model type, an inherent `create` factory.
//!
//! A companion names its view by the bare identifier, so it is included from
//! the view's own module through that module's manifest. Private views and
//! views in private modules are reachable that way.

use std::collections::BTreeMap;

use crate::classify::ClassifiedView;
use crate::config::{GeneratorConfig, WellKnownNames};
use crate::model::{ActionRowGroup, GeneratedArtifact, QualifiedName, TypeDeclaration, TypeRef};

/// Manifest of the crate root, included by `include_views!()`.
pub const MANIFEST_FILE: &str = "porbeagle_views.rs";

/// Directory holding the manifests of every other module.
pub const MANIFEST_DIR: &str = "porbeagle_views";

/// Stable artifact name for a declaration:
/// `{namespace with separators replaced}_{name}.generated.{extension}`.
pub fn artifact_file_name(namespace: &str, name: &str, extension: &str) -> String {
    let namespace = namespace.replace("::", "_").replace('.', "_");
    if namespace.is_empty() {
        format!("{}.generated.{}", name, extension)
    } else {
        format!("{}_{}.generated.{}", namespace, name, extension)
    }
}

/// Manifest path for a module given relative to the crate root (`""` for
/// the root, `views::welcome` otherwise). Always `/`-separated.
pub fn manifest_file_name(module: &str) -> String {
    if module.is_empty() {
        MANIFEST_FILE.to_string()
    } else {
        format!("{}/{}.rs", MANIFEST_DIR, module.replace("::", "/"))
    }
}

/// Module of `namespace` relative to the crate root.
fn relative_module(namespace: &str, crate_name: &str) -> String {
    if namespace.is_empty() || namespace == crate_name {
        return String::new();
    }
    namespace
        .strip_prefix(crate_name)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(namespace)
        .replace('.', "::")
}

pub struct Emitter<'a> {
    names: &'a WellKnownNames,
    extension: &'a str,
    crate_name: &'a str,
    runtime: String,
}

impl<'a> Emitter<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        // Support types (ViewParts, Component, ActionRow) live next to the
        // capability trait.
        let runtime = config
            .well_known
            .capability
            .as_str()
            .rsplit_once("::")
            .map(|(root, _)| root.to_string())
            .unwrap_or_else(|| "porbeagle".to_string());

        Self {
            names: &config.well_known,
            extension: &config.extension,
            crate_name: &config.crate_name,
            runtime,
        }
    }

    fn runtime_name(&self, item: &str) -> String {
        format!("{}::{}", self.runtime, item)
    }

    fn runtime_path(&self, item: &str) -> String {
        render_path(&self.runtime_name(item))
    }

    /// Paths into the scanned crate always start at `crate`, whatever name
    /// the crate was scanned under.
    fn local_path(&self, path: &str) -> String {
        match path
            .strip_prefix(self.crate_name)
            .filter(|rest| rest.is_empty() || rest.starts_with("::"))
        {
            Some(rest) => format!("crate{}", rest),
            None => render_path(path),
        }
    }

    fn render_type(&self, ty: &TypeRef) -> String {
        let base = self.local_path(ty.name.as_str());
        if ty.args.is_empty() {
            return base;
        }
        let args: Vec<String> = ty.args.iter().map(|arg| self.render_type(arg)).collect();
        format!("{}<{}>", base, args.join(", "))
    }

    pub fn emit(&self, decl: &TypeDeclaration, view: &ClassifiedView) -> GeneratedArtifact {
        let source = decl.qualified_name();

        let mut content = format!(
            "// @generated by porbeagle-codegen from `{}`. Do not edit.\n\n",
            source
        );
        content.push_str(&self.generate_view_parts(&decl.name, view));

        if let Some(model) = view.binding.as_ref().and_then(|b| b.model.as_ref()) {
            content.push('\n');
            content.push_str(&self.generate_factory(&decl.name, model));
        }

        GeneratedArtifact {
            file_name: artifact_file_name(&decl.namespace, &decl.name, self.extension),
            source,
            content,
        }
    }

    fn generate_view_parts(&self, self_type: &str, view: &ClassifiedView) -> String {
        // Overridden well-known types convert into the runtime's own.
        let convert_stickers = self.names.snowflake.as_str() != self.runtime_name("Snowflake");
        let convert_embeds = self.names.embed.as_str() != self.runtime_name("Embed");

        format!(
            r#"impl {view_parts} for {self_type} {{
    fn stickers(&self) -> ::std::vec::Vec<{snowflake}> {{
        {stickers}
    }}

    fn embeds(&self) -> ::std::vec::Vec<{embed}> {{
        {embeds}
    }}

    fn components(&self) -> ::std::vec::Vec<{component}> {{
        {components}
    }}
}}
"#,
            view_parts = self.runtime_path("ViewParts"),
            component = self.runtime_path("Component"),
            self_type = self_type,
            snowflake = self.runtime_path("Snowflake"),
            embed = self.runtime_path("Embed"),
            stickers = member_list(&view.stickers, convert_stickers),
            embeds = member_list(&view.embeds, convert_embeds),
            components = self.generate_action_rows(&view.action_rows),
        )
    }

    fn generate_action_rows(&self, groups: &[ActionRowGroup]) -> String {
        if groups.is_empty() {
            return EMPTY_VEC.to_string();
        }

        let rows: Vec<String> = groups.iter().map(|g| self.generate_action_row(g)).collect();
        format!("::std::vec![\n{}\n        ]", rows.join("\n"))
    }

    fn generate_action_row(&self, group: &ActionRowGroup) -> String {
        let component = self.runtime_path("Component");
        let components: Vec<String> = group
            .members
            .iter()
            .map(|member| {
                format!(
                    "                {}::from(self.{}.clone()),",
                    component, member
                )
            })
            .collect();

        format!(
            "            {component}::ActionRow({action_row}::new(::std::vec![\n{components}\n            ])),",
            component = component,
            action_row = self.runtime_path("ActionRow"),
            components = components.join("\n"),
        )
    }

    fn generate_factory(&self, self_type: &str, model: &TypeRef) -> String {
        let model = self.render_type(model);
        format!(
            r#"impl {self_type} {{
    /// Build the view from its model.
    pub fn create(vm: {model}) -> Self {{
        <Self as ::std::convert::From<{model}>>::from(vm)
    }}
}}
"#,
            self_type = self_type,
            model = model,
        )
    }
}

const EMPTY_VEC: &str = "::std::vec::Vec::new()";

fn member_list(members: &[String], convert: bool) -> String {
    if members.is_empty() {
        return EMPTY_VEC.to_string();
    }
    let suffix = if convert { ".into()" } else { "" };
    let refs: Vec<String> = members
        .iter()
        .map(|member| format!("self.{}.clone(){}", member, suffix))
        .collect();
    format!("::std::vec![{}]", refs.join(", "))
}

/// Render a qualified name outside the scanned crate as an absolute path.
fn render_path(path: &str) -> String {
    let is_path = path
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == ':');
    let is_local = ["crate", "self", "super"]
        .iter()
        .any(|root| path == *root || path.starts_with(&format!("{}::", root)));

    if !is_path || is_local || !path.contains("::") {
        path.to_string()
    } else {
        format!("::{}", path)
    }
}

/// The `include!` list for the companions declared in one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewManifest {
    /// Module relative to the crate root, `""` for the root.
    pub module: String,
    /// Path relative to the output directory, see [`manifest_file_name`].
    pub file_name: String,
    pub content: String,
}

/// Render one manifest per module that declares views, sorted by module.
/// The root manifest is always present so `include_views!()` at the crate
/// root compiles even without root-level views.
pub fn render_manifests(artifacts: &[GeneratedArtifact], crate_name: &str) -> Vec<ViewManifest> {
    let mut modules: BTreeMap<String, Vec<(&str, &QualifiedName)>> = BTreeMap::new();
    modules.entry(String::new()).or_default();

    for artifact in artifacts {
        let namespace = artifact
            .source
            .as_str()
            .rsplit_once("::")
            .map(|(namespace, _)| namespace)
            .unwrap_or("");
        modules
            .entry(relative_module(namespace, crate_name))
            .or_default()
            .push((artifact.file_name.as_str(), &artifact.source));
    }

    modules
        .into_iter()
        .map(|(module, mut files)| {
            files.sort();
            let mut content = format!(
                "// @generated by porbeagle-codegen. Do not edit.\n// Included by `porbeagle::include_views!({})`.\n",
                module
            );
            for (file, source) in files {
                content.push_str(&format!(
                    "\n// {}\ninclude!(concat!(env!(\"OUT_DIR\"), \"/{}\"));\n",
                    source, file
                ));
            }
            ViewManifest {
                file_name: manifest_file_name(&module),
                module,
                content,
            }
        })
        .collect()
}
