//! Syntax front ends: turn one file's text into top-level statement
//! descriptors.
//!
//! The indexer only sees [`StatementDescriptor`]s, never parser types, so a
//! different parser can be plugged in through [`SyntaxFrontEnd`].

mod oxc;
pub(crate) mod patterns;

pub use oxc::OxcFrontEnd;
pub(crate) use oxc::oxc_source_type;

use std::path::{Path, PathBuf};

use crate::node::{NodeKind, TextSpan};
use crate::source::SourceType;

/// Syntax category of a statement as reported by a front end.
pub type StatementSyntax = NodeKind;

/// One top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementDescriptor {
    pub span: TextSpan,
    pub text: String,
    pub syntax: StatementSyntax,
    pub is_type_only: bool,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FrontEndError {
    #[error("Failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported source type {source_type:?} for '{path}'")]
    Unsupported {
        path: PathBuf,
        source_type: SourceType,
    },
}

/// Parser abstraction used by the indexer.
pub trait SyntaxFrontEnd: Send + Sync + std::fmt::Debug {
    fn parse_statements(
        &self,
        source: &str,
        source_type: SourceType,
        path: &Path,
    ) -> Result<Vec<StatementDescriptor>, FrontEndError>;
}
