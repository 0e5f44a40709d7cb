//! Error types for gws-sub

use std::io;
use std::path::{Path, PathBuf};

use gws_ascii::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SubError>;

#[derive(Error, Debug)]
pub enum SubError {
    #[error("{}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record references an id never declared in its parent section,
    /// signalling a corrupted or hand-edited source file.
    #[error("{}: line {}: {}", .path.display(), .line + 1, .message)]
    CrossReference {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SubError {
    pub fn parse(path: &Path, source: ParseError) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn cross_reference(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::CrossReference {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}
