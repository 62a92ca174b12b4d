use thiserror::Error;

use crate::core::prototype::fragment::{AttachError, FragmentError};
use crate::core::surface::template::SurfaceError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot place {points} pattern points on {available} available sites")]
    Placement { points: usize, available: usize },

    #[error("Attachment on a closed port of '{fragment}'")]
    PortClosed { fragment: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl From<SurfaceError> for AssemblyError {
    fn from(e: SurfaceError) -> Self {
        AssemblyError::Configuration(e.to_string())
    }
}

impl From<FragmentError> for AssemblyError {
    fn from(e: FragmentError) -> Self {
        AssemblyError::Configuration(e.to_string())
    }
}

impl From<AttachError> for AssemblyError {
    fn from(e: AttachError) -> Self {
        match e {
            AttachError::PortClosed { fragment } => AssemblyError::PortClosed { fragment },
            other => AssemblyError::Internal(other.to_string()),
        }
    }
}
