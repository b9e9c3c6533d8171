use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Error parsing {context}: {message}")]
    Parse {
        context: &'static str,
        message: String,
    },

    #[error("Error parsing {context}: {message}")]
    Structural {
        context: &'static str,
        message: String,
    },

    #[error("Unsupported file type. Please provide a .csproj, .vbproj, .fsproj, .sln, or .pbxproj file.")]
    UnsupportedType(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No project file path provided")]
    MissingPath,
}

impl TreeError {
    pub fn parse(context: &'static str, message: impl Into<String>) -> Self {
        TreeError::Parse {
            context,
            message: message.into(),
        }
    }

    pub fn structural(context: &'static str, message: impl Into<String>) -> Self {
        TreeError::Structural {
            context,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TreeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert into the `{ "error": <message> }` payload handed to callers
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.to_string(),
        }
    }
}

/// Single-field error document emitted instead of a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

pub type Result<T, E = TreeError> = std::result::Result<T, E>;
