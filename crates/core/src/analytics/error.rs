use crate::analytics::Endpoint;
use reqwest::StatusCode;
use std::fmt;

/// Failure of a single analytics request.
#[derive(Debug, Clone)]
pub struct ServiceError {
    pub endpoint: Endpoint,
    pub status: Option<StatusCode>,
    /// Service-supplied `detail` from the error body, if any.
    pub detail: Option<String>,
    pub description: String,
}

impl ServiceError {
    pub fn transport(endpoint: Endpoint, description: impl Into<String>) -> Self {
        Self {
            endpoint,
            status: None,
            detail: None,
            description: description.into(),
        }
    }

    /// The text shown to the user: the service's own detail, else our description.
    pub fn message(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.description)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "analytics error (endpoint={}, status={status}): {}",
                self.endpoint,
                self.message()
            ),
            None => write!(
                f,
                "analytics error (endpoint={}): {}",
                self.endpoint,
                self.message()
            ),
        }
    }
}

impl std::error::Error for ServiceError {}
