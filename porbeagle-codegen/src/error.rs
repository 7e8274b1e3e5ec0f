//! Error and diagnostic types for the generation pass.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::model::QualifiedName;

/// A failure attributable to one declaration (or, for registry failures, to
/// the reference set of the whole pass).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("malformed #[action_row] on `{member}`: {reason}")]
    MalformedActionRow { member: String, reason: String },

    #[error("`{member}` carries more than one #[action_row] attribute")]
    DuplicateActionRow { member: String },

    #[error("{count} action rows declared, at most {max} are allowed")]
    TooManyActionRows { count: usize, max: usize },

    #[error("generic view declarations are not supported (parameters: {})", .params.join(", "))]
    GenericDeclaration { params: Vec<String> },

    #[error("well-known {slot} `{name}` is not defined in the compilation's references")]
    UnresolvedWellKnownType { slot: &'static str, name: QualifiedName },
}

/// Pass-level and I/O failures.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid declaration snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("type registry is incomplete: {0}")]
    Registry(GenerationError),

    #[error("generation failed for {} declaration(s): {}", .failed.len(), .failed.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Generation { failed: Vec<QualifiedName> },

    #[error("OUT_DIR is not set; call Builder::out_dir or run from a build script")]
    MissingOutDir,
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A generation diagnostic, attributable to a declaration when one is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<QualifiedName>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(declaration: &QualifiedName, error: &GenerationError) -> Self {
        Self {
            severity: Severity::Error,
            declaration: Some(declaration.clone()),
            message: error.to_string(),
        }
    }

    pub fn warning(declaration: Option<&QualifiedName>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            declaration: declaration.cloned(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declaration {
            Some(decl) => write!(f, "{} [{}]: {}", self.severity, decl, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}
