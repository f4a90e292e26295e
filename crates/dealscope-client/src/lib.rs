//! HTTP contract with the remote startup-analysis service.
//!
//! The service exposes a lightweight health probe plus a multipart analyze
//! endpoint that accepts pitch-deck documents and returns a deeply-optional
//! JSON report (see [`schema`]). Everything here is transport: connectivity
//! state, staging, and result derivation live in `dealscope-core`.

pub mod schema;

use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub use schema::{AnalysisReport, SectorBenchmarks};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("endpoint address is empty")]
    EmptyEndpoint,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service unhealthy: HTTP {status}")]
    Unhealthy { status: u16 },
    #[error("analysis rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Strip trailing path separators from a raw endpoint address.
///
/// An address that is empty after trimming is a validation error; callers
/// must not issue a probe for it.
pub fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let base = raw.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(ApiError::EmptyEndpoint);
    }
    Ok(base.to_string())
}

/// Request timing knobs.
///
/// The health probe gets a bounded deadline so an unreachable host fails in
/// finite time. The analyze call has no overall deadline by default: the
/// service runs a multi-minute pipeline and streams nothing back until done.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub health_timeout: Duration,
    pub analyze_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            health_timeout: Duration::from_secs(10),
            analyze_timeout: None,
        }
    }
}

/// One document in an analyze submission.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content: Bytes,
}

/// Client for one analysis service endpoint.
///
/// Cheap to clone; the inner `reqwest::Client` is shared.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base: String,
    http: reqwest::Client,
    options: ClientOptions,
}

impl AnalysisClient {
    /// Build a client for a raw endpoint address, normalizing it first.
    pub fn new(raw_url: &str, options: ClientOptions) -> Result<Self, ApiError> {
        let base = normalize_base_url(raw_url)?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            base,
            http,
            options,
        })
    }

    /// The normalized base address this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// `GET {base}/health`; any 2xx body counts as healthy.
    pub async fn health(&self) -> Result<(), ApiError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base))
            .timeout(self.options.health_timeout)
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::Unhealthy {
                status: resp.status().as_u16(),
            })
        }
    }

    /// `POST {base}/api/analyze` with one `file` part per document plus
    /// optional `sector`/`stage` fields.
    pub async fn analyze(
        &self,
        files: &[FileUpload],
        sector: Option<&str>,
        stage: Option<&str>,
    ) -> Result<AnalysisReport, ApiError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::stream(reqwest::Body::from(file.content.clone()))
                .file_name(file.file_name.clone());
            form = form.part("file", part);
        }
        if let Some(sector) = sector {
            form = form.text("sector", sector.to_string());
        }
        if let Some(stage) = stage {
            form = form.text("stage", stage.to_string());
        }

        log::debug!(
            "submitting {} file(s) to {}/api/analyze",
            files.len(),
            self.base
        );

        let mut req = self
            .http
            .post(format!("{}/api/analyze", self.base))
            .multipart(form);
        if let Some(deadline) = self.options.analyze_timeout {
            req = req.timeout(deadline);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(rejection(status, &body));
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `GET {base}/api/analysis/{id}`: fetch a previously stored report.
    pub async fn fetch_analysis(&self, analysis_id: &str) -> Result<AnalysisReport, ApiError> {
        let resp = self
            .http
            .get(format!("{}/api/analysis/{}", self.base, analysis_id))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(rejection(status, &body));
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `GET {base}/api/benchmarks/{sector}/{stage}`.
    pub async fn sector_benchmarks(
        &self,
        sector: &str,
        stage: &str,
    ) -> Result<SectorBenchmarks, ApiError> {
        let resp = self
            .http
            .get(format!(
                "{}/api/benchmarks/{}/{}",
                self.base, sector, stage
            ))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(rejection(status, &body));
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Map a non-2xx response to [`ApiError::Rejected`].
///
/// The body's `error` field wins; `detail` (the service's validation errors
/// arrive under that key) is next; the HTTP status phrase is the fallback.
fn rejection(status: StatusCode, body: &str) -> ApiError {
    #[derive(Deserialize, Default)]
    struct ErrorBody {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        detail: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .error
        .or(parsed.detail)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes() {
        assert_eq!(normalize_base_url("http://x///").unwrap(), "http://x");
        assert_eq!(normalize_base_url("http://x").unwrap(), "http://x");
    }

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(
            normalize_base_url("  https://api.example.com/ ").unwrap(),
            "https://api.example.com"
        );
    }

    #[test]
    fn normalize_rejects_empty() {
        assert!(matches!(normalize_base_url(""), Err(ApiError::EmptyEndpoint)));
        assert!(matches!(normalize_base_url("   "), Err(ApiError::EmptyEndpoint)));
        assert!(matches!(normalize_base_url("///"), Err(ApiError::EmptyEndpoint)));
    }

    #[test]
    fn rejection_prefers_error_field() {
        let err = rejection(
            StatusCode::BAD_REQUEST,
            r#"{"error": "unsupported file type"}"#,
        );
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "unsupported file type");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejection_accepts_detail_field() {
        let err = rejection(StatusCode::BAD_REQUEST, r#"{"detail": "No file selected"}"#);
        match err {
            ApiError::Rejected { message, .. } => assert_eq!(message, "No file selected"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejection_falls_back_to_status_phrase() {
        let err = rejection(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
