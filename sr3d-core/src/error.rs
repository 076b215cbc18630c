/// Error types for model construction and scene loading
use std::path::PathBuf;

/// A model whose topology does not match its vertex buffer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("face {face} references vertex {index}, but the model has {vertex_count} vertices")]
    MalformedModel {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

/// Errors from reading model and scene files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{what} parse error at line {line}: {message}")]
    Parse {
        what: &'static str,
        line: usize,
        message: String,
    },
    #[error("malformed model: {0}")]
    Malformed(#[from] GeometryError),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
