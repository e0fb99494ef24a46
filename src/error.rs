//! Error types for mesh loading and pipeline setup.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the viewer.
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Errors that can occur while loading a mesh or standing up the GL pipeline.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The mesh file could not be opened.
    #[error("cannot open mesh file `{}`: {source}", .path.display())]
    MeshOpen {
        /// Path that was attempted.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mesh file contains malformed content.
    #[error("{}:{line}: {message}", .path.display())]
    ObjParse {
        path: PathBuf,
        /// 1-based line number of the offending record.
        line: usize,
        message: String,
    },

    /// The mesh file holds no vertices at all.
    #[error("mesh `{}` contains no vertices", .path.display())]
    EmptyMesh { path: PathBuf },

    /// SDL window or GL context creation failed.
    #[error("window setup failed: {0}")]
    Window(String),

    /// A shader stage failed to compile.
    #[error("{stage} shader compilation failed: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    /// The shader program failed to link.
    #[error("shader program link failed: {0}")]
    ProgramLink(String),

    /// A uniform the pipeline depends on is absent from the linked program.
    #[error("uniform `{0}` not found in shader program")]
    UniformNotFound(String),

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    /// Build a [`ViewerError::ObjParse`] for a 1-based line of `path`.
    pub fn obj_parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::ObjParse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obj_parse_formats_path_and_line() {
        let err = ViewerError::obj_parse("models/torus.obj", 12, "face index out of range");
        assert_eq!(
            err.to_string(),
            "models/torus.obj:12: face index out of range"
        );
    }

    #[test]
    fn io_errors_convert() {
        fn read() -> ViewerResult<String> {
            Ok(std::fs::read_to_string("/definitely/not/here")?)
        }
        assert!(matches!(read(), Err(ViewerError::Io(_))));
    }
}
