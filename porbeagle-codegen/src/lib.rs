//! Companion generator for porbeagle message views.
//!
//! A generation pass reads a [`Compilation`] snapshot, selects every struct
//! that derives `DiscordView` and implements `MessageView`, classifies its
//! members into stickers, embeds and action-row components, and emits a
//! `ViewParts` implementation (plus an optional `create` factory) per view.
//!
//! Most crates only need the [`Builder`] from their build script:
//!
//! ```no_run
//! // build.rs
//! fn main() {
//!     porbeagle_codegen::Builder::new().generate().unwrap();
//! }
//! ```
//!
//! Companions are included from the module that declares the view:
//! `porbeagle::include_views!()` at the crate root and
//! `porbeagle::include_views!(views::welcome)` inside `crate::views::welcome`.

pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod group;
pub mod model;
pub mod pass;
pub mod registry;
pub mod scan;
pub mod source;
pub mod writer;

pub use config::{GeneratorConfig, WellKnownNames};
pub use emit::ViewManifest;
pub use error::{CodegenError, Diagnostic, GenerationError, Severity};
pub use model::*;
pub use pass::{generate, inspect, GenerationReport, ViewReport};
pub use writer::{write_artifacts, Builder, WriteOutcome};
