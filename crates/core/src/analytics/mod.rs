pub mod error;
pub mod http;

use crate::analytics::error::ServiceError;
use crate::domain::analysis::{AnalysisResult, CorrelationResult};
use crate::domain::request::AnalysisRequest;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Analyze,
    Correlation,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Analyze => "/analyze",
            Endpoint::Correlation => "/correlation",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// The external analytics service. Both operations take the same request payload.
#[async_trait::async_trait]
pub trait AnalyticsService: Send + Sync {
    fn service_name(&self) -> &'static str;

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ServiceError>;

    async fn correlation(
        &self,
        request: &AnalysisRequest,
    ) -> Result<CorrelationResult, ServiceError>;
}
