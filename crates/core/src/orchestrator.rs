use crate::analytics::error::ServiceError;
use crate::analytics::AnalyticsService;
use crate::domain::analysis::AnalysisBundle;
use crate::domain::asset::{Asset, AssetCatalog};
use crate::domain::request::{self, AnalysisRequest};
use crate::error::DashboardError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const DEFAULT_WEIGHTS_TEXT: &str = "0.4, 0.3, 0.3";

/// Identifies one analysis attempt. Only the most recently issued token can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptToken {
    generation: u64,
}

impl AttemptToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A validated attempt whose requests have not been dispatched yet.
#[derive(Debug, Clone)]
pub struct PendingAttempt {
    pub token: AttemptToken,
    pub request: AnalysisRequest,
}

/// Lifecycle of the dashboard. Every transition replaces the whole value.
#[derive(Debug, Clone)]
pub enum DashboardState {
    Idle {
        error: Option<DashboardError>,
    },
    Validating,
    Loading {
        attempt: AttemptToken,
    },
    Populated {
        analysis: AnalysisBundle,
        completed_at: DateTime<Utc>,
    },
}

impl DashboardState {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardState::Idle { .. } => "idle",
            DashboardState::Validating => "validating",
            DashboardState::Loading { .. } => "loading",
            DashboardState::Populated { .. } => "populated",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardState::Loading { .. })
    }

    pub fn analysis(&self) -> Option<&AnalysisBundle> {
        match self {
            DashboardState::Populated { analysis, .. } => Some(analysis),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DashboardError> {
        match self {
            DashboardState::Idle { error } => error.as_ref(),
            _ => None,
        }
    }
}

/// Owns the user's inputs and the dashboard state, and drives validate -> fetch -> publish.
pub struct AnalysisOrchestrator {
    service: Arc<dyn AnalyticsService>,
    selection: Vec<Asset>,
    weights_text: String,
    state: DashboardState,
    generation: u64,
}

impl AnalysisOrchestrator {
    pub fn new(service: Arc<dyn AnalyticsService>) -> Self {
        Self {
            service,
            selection: AssetCatalog.default_selection(),
            weights_text: DEFAULT_WEIGHTS_TEXT.to_string(),
            state: DashboardState::Idle { error: None },
            generation: 0,
        }
    }

    pub fn with_inputs(mut self, selection: Vec<Asset>, weights_text: impl Into<String>) -> Self {
        self.selection = selection;
        self.weights_text = weights_text.into();
        self
    }

    pub fn service(&self) -> Arc<dyn AnalyticsService> {
        Arc::clone(&self.service)
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn selection(&self) -> &[Asset] {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Vec<Asset>) {
        self.selection = selection;
    }

    pub fn weights_text(&self) -> &str {
        &self.weights_text
    }

    pub fn set_weights_text(&mut self, weights_text: impl Into<String>) {
        self.weights_text = weights_text.into();
    }

    pub fn weight_count_hint(&self) -> String {
        request::weight_count_hint(&self.weights_text, self.selection.len())
    }

    fn transition(&mut self, next: DashboardState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "dashboard state transition");
        self.state = next;
    }

    /// Validates the current inputs and, on success, enters `Loading`.
    ///
    /// Any attempt still in flight is superseded, whether or not validation passes. Prior
    /// results and errors are cleared before this returns.
    pub fn begin(&mut self) -> Result<PendingAttempt, DashboardError> {
        self.generation += 1;
        self.transition(DashboardState::Validating);

        match request::validate(&self.selection, &self.weights_text) {
            Ok(request) => {
                let token = AttemptToken {
                    generation: self.generation,
                };
                self.transition(DashboardState::Loading { attempt: token });
                Ok(PendingAttempt { token, request })
            }
            Err(err) => {
                let err = DashboardError::from(err);
                tracing::debug!(error = %err, "analysis input rejected");
                self.transition(DashboardState::Idle {
                    error: Some(err.clone()),
                });
                Err(err)
            }
        }
    }

    /// Publishes the outcome of `token`'s attempt. Returns `false` and leaves the state
    /// untouched when a newer attempt has been started since.
    pub fn complete(
        &mut self,
        token: AttemptToken,
        outcome: Result<AnalysisBundle, DashboardError>,
    ) -> bool {
        if token.generation != self.generation {
            tracing::warn!(
                attempt = token.generation,
                current = self.generation,
                "discarding superseded analysis outcome"
            );
            return false;
        }

        match outcome {
            Ok(analysis) => {
                tracing::info!(
                    attempt = token.generation,
                    assets = analysis.correlation.labels.len(),
                    points = analysis.performance.growth_chart.len(),
                    "analysis completed"
                );
                self.transition(DashboardState::Populated {
                    analysis,
                    completed_at: Utc::now(),
                });
            }
            Err(error) => {
                self.transition(DashboardState::Idle { error: Some(error) });
            }
        }
        true
    }

    /// One full user-initiated attempt: validate, fetch both halves, publish.
    pub async fn analyze(&mut self) -> &DashboardState {
        if let Ok(pending) = self.begin() {
            let service = self.service();
            let outcome = run(service.as_ref(), &pending.request).await;
            self.complete(pending.token, outcome);
        }
        &self.state
    }
}

/// Sends the performance and correlation requests concurrently with the same payload and
/// resolves once both have finished. Either failure fails the whole operation.
pub async fn run(
    service: &dyn AnalyticsService,
    request: &AnalysisRequest,
) -> Result<AnalysisBundle, DashboardError> {
    let (performance, correlation) =
        tokio::join!(service.analyze(request), service.correlation(request));

    match (performance, correlation) {
        (Ok(performance), Ok(correlation)) => Ok(AnalysisBundle {
            performance,
            correlation,
        }),
        (performance, correlation) => {
            let failures: Vec<ServiceError> = [performance.err(), correlation.err()]
                .into_iter()
                .flatten()
                .collect();
            for failure in &failures {
                tracing::warn!(
                    service = service.service_name(),
                    endpoint = %failure.endpoint,
                    error = %failure,
                    "analytics request failed"
                );
            }
            Err(select_failure(&failures))
        }
    }
}

// Dispatch order decides ties: the first failure carrying a service detail wins, else the
// first failure's own description.
fn select_failure(failures: &[ServiceError]) -> DashboardError {
    failures
        .iter()
        .find(|f| f.detail.is_some())
        .or_else(|| failures.first())
        .map(DashboardError::from)
        .unwrap_or_else(|| DashboardError::service("analysis failed"))
}
