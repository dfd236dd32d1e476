use crate::analytics::error::ServiceError;
use crate::domain::request::ValidationError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad user input; nothing was sent.
    Validation,
    /// The analytics service or the network failed.
    Service,
}

/// The one error shape the presentation layer sees. `message` is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct DashboardError {
    pub kind: ErrorKind,
    pub message: String,
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Service,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for DashboardError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<&ServiceError> for DashboardError {
    fn from(err: &ServiceError) -> Self {
        Self::service(err.message())
    }
}

impl From<ServiceError> for DashboardError {
    fn from(err: ServiceError) -> Self {
        Self::from(&err)
    }
}
