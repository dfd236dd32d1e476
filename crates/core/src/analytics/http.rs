use crate::analytics::error::ServiceError;
use crate::analytics::{AnalyticsService, Endpoint};
use crate::config::Settings;
use crate::domain::analysis::{AnalysisResult, CorrelationResult};
use crate::domain::request::AnalysisRequest;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// JSON-over-HTTP client for the local analytics service. No auth, no retries.
#[derive(Debug, Clone)]
pub struct HttpAnalyticsService {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    message: String,
}

impl HttpAnalyticsService {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(&settings.analytics_base_url, settings.analytics_timeout)
    }

    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build analytics http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /`: the service's liveness banner.
    pub async fn health(&self) -> anyhow::Result<String> {
        let res = self
            .http
            .get(self.url("/"))
            .send()
            .await
            .context("analytics health request failed")?;

        let status = res.status();
        anyhow::ensure!(status.is_success(), "analytics health HTTP {status}");

        let body = res
            .json::<HealthResponse>()
            .await
            .context("failed to decode analytics health response")?;
        Ok(body.message)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: &AnalysisRequest,
    ) -> Result<T, ServiceError> {
        let res = self
            .http
            .post(self.url(endpoint.path()))
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::transport(endpoint, e.to_string()))?;

        let status = res.status();
        let text = res.text().await.map_err(|e| {
            ServiceError::transport(endpoint, format!("failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| extract_detail(&body));
            tracing::warn!(%endpoint, %status, detail = ?detail, "analytics request rejected");
            return Err(ServiceError {
                endpoint,
                status: Some(status),
                detail,
                description: format!("Request failed with status code {}", status.as_u16()),
            });
        }

        serde_json::from_str::<T>(&text).map_err(|e| ServiceError {
            endpoint,
            status: Some(status),
            detail: None,
            description: format!("failed to decode {endpoint} response: {e}"),
        })
    }
}

/// FastAPI puts a string in `detail`; request-validation failures put a list there instead.
fn extract_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait::async_trait]
impl AnalyticsService for HttpAnalyticsService {
    fn service_name(&self) -> &'static str {
        "analytics_http_json"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ServiceError> {
        self.post_json(Endpoint::Analyze, request).await
    }

    async fn correlation(
        &self,
        request: &AnalysisRequest,
    ) -> Result<CorrelationResult, ServiceError> {
        self.post_json(Endpoint::Correlation, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_service(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> HttpAnalyticsService {
        HttpAnalyticsService::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            tickers: vec!["AAPL".into(), "MSFT".into()],
            weights: vec![0.6, 0.4],
        }
    }

    #[tokio::test]
    async fn posts_payload_and_decodes_analysis() {
        let app = Router::new().route(
            "/analyze",
            post(|Json(req): Json<AnalysisRequest>| async move {
                let allocation: serde_json::Map<String, serde_json::Value> = req
                    .tickers
                    .iter()
                    .zip(&req.weights)
                    .map(|(t, w)| (t.clone(), json!(w)))
                    .collect();
                Json(json!({
                    "expected_annual_return": 12.5,
                    "volatility_risk": 20.0,
                    "sharpe_ratio": 0.53,
                    "portfolio_allocation": allocation,
                    "growth_chart": [
                        {"date": "2025-01-02", "value": 10000.0, "type": "Historical"}
                    ]
                }))
            }),
        );
        let base = spawn_service(app).await;

        let result = client(&base).analyze(&request()).await.unwrap();
        assert_eq!(result.sharpe_ratio, 0.53);
        assert_eq!(result.portfolio_allocation.get("AAPL"), Some(0.6));
        assert_eq!(result.growth_chart.len(), 1);
    }

    #[tokio::test]
    async fn decodes_correlation() {
        let app = Router::new().route(
            "/correlation",
            post(|| async {
                Json(json!({
                    "labels": ["AAPL", "MSFT"],
                    "matrix": [[1.0, 0.62], [0.62, 1.0]]
                }))
            }),
        );
        let base = spawn_service(app).await;

        let result = client(&base).correlation(&request()).await.unwrap();
        assert_eq!(result.labels, vec!["AAPL", "MSFT"]);
        assert_eq!(result.matrix[0][1], 0.62);
    }

    #[tokio::test]
    async fn surfaces_service_detail_on_error_status() {
        let app = Router::new().route(
            "/analyze",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": "Could not fetch stock data."})),
                )
            }),
        );
        let base = spawn_service(app).await;

        let err = client(&base).analyze(&request()).await.unwrap_err();
        assert_eq!(err.endpoint, Endpoint::Analyze);
        assert_eq!(err.status, Some(reqwest::StatusCode::BAD_REQUEST));
        assert_eq!(err.message(), "Could not fetch stock data.");
    }

    #[tokio::test]
    async fn error_without_detail_uses_status_description() {
        let app = Router::new().route(
            "/correlation",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_service(app).await;

        let err = client(&base).correlation(&request()).await.unwrap_err();
        assert!(err.detail.is_none());
        assert_eq!(err.message(), "Request failed with status code 500");
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let app = Router::new().route("/analyze", post(|| async { Json(json!({"foo": 1})) }));
        let base = spawn_service(app).await;

        let err = client(&base).analyze(&request()).await.unwrap_err();
        assert!(err.detail.is_none());
        assert!(err.message().starts_with("failed to decode /analyze response"));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"))
            .analyze(&request())
            .await
            .unwrap_err();
        assert!(err.status.is_none());
        assert!(err.detail.is_none());
        assert!(!err.message().is_empty());
    }

    #[tokio::test]
    async fn health_returns_banner() {
        let app = Router::new().route(
            "/",
            get(|| async { Json(json!({"message": "QuantFolio System Active"})) }),
        );
        let base = spawn_service(app).await;

        let banner = client(&format!("{base}/")).health().await.unwrap();
        assert_eq!(banner, "QuantFolio System Active");
    }

    #[test]
    fn extracts_string_and_structured_detail() {
        assert_eq!(
            extract_detail(&json!({"detail": "bad weights"})),
            Some("bad weights".to_string())
        );
        assert_eq!(
            extract_detail(&json!({"detail": [{"loc": ["body", "weights"]}]})),
            Some(r#"[{"loc":["body","weights"]}]"#.to_string())
        );
        assert_eq!(extract_detail(&json!({"detail": null})), None);
        assert_eq!(extract_detail(&json!({"detail": ""})), None);
        assert_eq!(extract_detail(&json!({"error": "x"})), None);
    }
}
