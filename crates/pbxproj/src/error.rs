//! Errors raised while reading, decoding and editing project graphs

use crate::reference::Reference;
use pbxkit_core::error::{Error, ErrorCode};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjError>;

#[derive(Error, Debug)]
pub enum ProjError {
    #[error("Object {reference} has no isa attribute")]
    MissingKind { reference: Reference },

    #[error("Object {reference} has unsupported isa {isa}")]
    UnknownElementKind { reference: Reference, isa: String },

    #[error("{isa} is missing required attribute {field}")]
    MissingField { isa: String, field: &'static str },

    #[error("Attribute {field} should be {expected}")]
    InvalidValue { field: String, expected: &'static str },

    #[error("Syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unsupported property list format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid property list: {0}")]
    Plist(#[from] plist::Error),

    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Group not found in project: {0}")]
    GroupNotFound(Reference),

    #[error("Target not found in project: {0}")]
    TargetNotFound(Reference),

    #[error("project.pbxproj not found in {}", .0.display())]
    PbxprojNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProjError {
    /// Whether the error came from decoding (the whole load failed)
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ProjError::MissingKind { .. }
                | ProjError::UnknownElementKind { .. }
                | ProjError::MissingField { .. }
                | ProjError::InvalidValue { .. }
                | ProjError::Syntax { .. }
                | ProjError::UnsupportedFormat(_)
                | ProjError::Plist(_)
        )
    }
}

impl From<ProjError> for Error {
    fn from(err: ProjError) -> Self {
        let code = match &err {
            ProjError::MissingKind { .. } | ProjError::UnknownElementKind { .. } => {
                ErrorCode::UnknownKind
            }
            ProjError::MissingField { .. } => ErrorCode::MissingField,
            ProjError::InvalidValue { .. } => ErrorCode::DecodeError,
            ProjError::Syntax { .. } | ProjError::UnsupportedFormat(_) | ProjError::Plist(_) => {
                ErrorCode::SyntaxError
            }
            ProjError::FileNotFound(_) | ProjError::PbxprojNotFound(_) => ErrorCode::FileNotFound,
            ProjError::GroupNotFound(_) => ErrorCode::GroupNotFound,
            ProjError::TargetNotFound(_) => ErrorCode::TargetNotFound,
            ProjError::Io(_) => ErrorCode::IoError,
        };
        let suggestion = match &err {
            ProjError::UnknownElementKind { .. } => {
                Some("The project may have been written by a newer Xcode version")
            }
            ProjError::Syntax { .. } => Some("Resolve merge conflicts or re-save the project in Xcode"),
            _ => None,
        };
        let message = err.to_string();
        let mut converted = Error::new(code, message).with_source(err);
        if let Some(suggestion) = suggestion {
            converted = converted.with_suggestion(suggestion);
        }
        converted
    }
}
