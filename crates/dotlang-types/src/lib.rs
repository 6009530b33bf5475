//! Shared error taxonomy for the `dotlang` DOT parser, resolver, and flattener.
//!
//! This crate provides the single error type, [`DotError`], returned by every
//! fallible entry point in `dotlang`: `parse`, `parse_file`, and `resolve`.

/// Unified error type for the DOT parsing/resolving pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DotError {
    #[error("parse error at line {line}, col {col}: {message}")]
    Parse {
        line: usize,
        col: usize,
        message: String,
    },

    #[error("failed to read DOT file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("redefined node '{name}'")]
    RedefinedNode { name: String },

    #[error("edge references undefined node '{name}'")]
    UndefinedNode { name: String },

    #[error("edge {src} {op} {tgt} has direction '{op}' inconsistent with {graph_type}")]
    EdgeDirectionMismatch {
        src: String,
        op: &'static str,
        tgt: String,
        graph_type: &'static str,
    },

    #[error("duplicate edge {src} {op} {tgt} in strict graph")]
    DuplicateEdgeInStrict {
        src: String,
        op: &'static str,
        tgt: String,
    },
}

impl DotError {
    /// Returns `true` if the failure happened while resolving (rather than
    /// while parsing or reading a file).
    pub fn is_resolve_error(&self) -> bool {
        matches!(
            self,
            DotError::RedefinedNode { .. }
                | DotError::UndefinedNode { .. }
                | DotError::EdgeDirectionMismatch { .. }
                | DotError::DuplicateEdgeInStrict { .. }
        )
    }
}

/// Convenience alias for `Result<T, DotError>`.
pub type Result<T> = std::result::Result<T, DotError>;
