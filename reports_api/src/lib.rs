pub mod mock;
pub mod ops;

use async_trait::async_trait;
use core_types::{FilterState, ReportFormat};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::ops::SchoolReportsApi;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(String),
    #[error("server returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),
    #[error("report generation failed: {0}")]
    ReportGeneration(String),
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}

/// Request body for the full school report. The server selects the rendering
/// from `format`.
#[derive(Debug, Serialize)]
struct FullReportBody<'a> {
    school: &'a str,
    #[serde(rename = "currentAY")]
    current_ay: &'a str,
    semester: &'a str,
    format: ReportFormat,
}

/// HTTP client for the school reports backend.
///
/// The four list operations return plain string sequences for the filter
/// dropdowns; the two report operations return the response body as opaque
/// bytes, leaving filename and storage decisions to the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // path_segments_mut cannot fail here, cannot_be_a_base was checked in new
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_string_list(&self, url: Url) -> Result<Vec<String>, ApiError> {
        tracing::debug!(%url, "Fetching option list");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
        string_list_from_value(value)
    }
}

#[async_trait]
impl SchoolReportsApi for ApiClient {
    async fn list_schools(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["api", "school-reports", "schools"]);
        tracing::debug!(%url, "Fetching school list");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            let message = server_error_message(
                body.as_deref(),
                &format!("HTTP {}: failed to fetch schools", status.as_u16()),
            );
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
        string_list_from_value(value)
    }

    async fn list_current_academic_years(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["api", "visualization", "current-ay"]);
        self.get_string_list(url).await
    }

    async fn list_semesters(&self, current_ay: &str) -> Result<Vec<String>, ApiError> {
        let mut url = self.endpoint(&["api", "visualization", "semesters"]);
        url.query_pairs_mut().append_pair("currentAY", current_ay);
        self.get_string_list(url).await
    }

    async fn list_departments(&self, school: &str) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["api", "school-reports", "schools", school, "departments"]);
        tracing::debug!(%url, "Fetching department list");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message: "failed to fetch departments".to_string(),
            });
        }
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
        string_list_from_value(value)
    }

    async fn request_full_report(
        &self,
        filters: &FilterState,
        format: ReportFormat,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["api", "school-reports", "generate-school-report"]);
        let body = FullReportBody {
            school: &filters.school,
            current_ay: &filters.current_ay,
            semester: &filters.semester,
            format,
        };
        tracing::info!(school = %filters.school, ?format, "Requesting school report");
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() {
                format!("HTTP {}: failed to generate school report", status.as_u16())
            } else {
                text
            };
            return Err(ApiError::ReportGeneration(message));
        }
        let payload = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(payload.to_vec())
    }

    async fn request_negative_comments_report(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&[
            "api",
            "school-reports",
            "generate-school-negative-comments-excel",
        ]);
        tracing::info!(school = %filters.school, "Requesting negative comments report");
        let response = self
            .client
            .post(url)
            .json(filters)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            let message = server_error_message(
                body.as_deref(),
                &format!(
                    "HTTP {}: failed to generate negative comments report",
                    status.as_u16()
                ),
            );
            return Err(ApiError::ReportGeneration(message));
        }
        let payload = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(payload.to_vec())
    }
}

/// Parse a list endpoint response. Anything other than an array of strings
/// is rejected so callers can fall back to an empty option list.
fn string_list_from_value(value: serde_json::Value) -> Result<Vec<String>, ApiError> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => Ok(s),
                other => Err(ApiError::MalformedResponse(format!(
                    "expected a string, got {}",
                    other
                ))),
            })
            .collect(),
        other => Err(ApiError::MalformedResponse(format!(
            "expected an array of strings, got {}",
            other
        ))),
    }
}

/// Extract the `error` field from a JSON error body, falling back to the
/// given message when the body is missing or not shaped that way.
fn server_error_message(body: Option<&str>, fallback: &str) -> String {
    body.and_then(|text| serde_json::from_str::<serde_json::Value>(text).ok())
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_list_from_array() {
        let value = json!(["School of Engineering", "School of Business"]);
        assert_eq!(
            string_list_from_value(value).unwrap(),
            vec![
                "School of Engineering".to_string(),
                "School of Business".to_string()
            ]
        );
    }

    #[test]
    fn test_string_list_from_empty_array() {
        assert_eq!(string_list_from_value(json!([])).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_string_list_rejects_non_array() {
        let result = string_list_from_value(json!({"schools": []}));
        assert!(matches!(result, Err(ApiError::MalformedResponse(_))));
    }

    #[test]
    fn test_string_list_rejects_non_string_items() {
        let result = string_list_from_value(json!(["ok", 42]));
        assert!(matches!(result, Err(ApiError::MalformedResponse(_))));
    }

    #[test]
    fn test_server_error_message_prefers_error_field() {
        assert_eq!(
            server_error_message(Some(r#"{"error": "no data"}"#), "fallback"),
            "no data"
        );
    }

    #[test]
    fn test_server_error_message_falls_back() {
        assert_eq!(server_error_message(None, "fallback"), "fallback");
        assert_eq!(server_error_message(Some("not json"), "fallback"), "fallback");
        assert_eq!(server_error_message(Some(r#"{"status": 500}"#), "fallback"), "fallback");
    }

    #[test]
    fn test_full_report_body_wire_shape() {
        let filters = FilterState {
            school: "School of Engineering".to_string(),
            current_ay: "2023-2024".to_string(),
            semester: "Odd".to_string(),
        };
        let body = FullReportBody {
            school: &filters.school,
            current_ay: &filters.current_ay,
            semester: &filters.semester,
            format: ReportFormat::Excel,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "school": "School of Engineering",
                "currentAY": "2023-2024",
                "semester": "Odd",
                "format": "excel",
            })
        );
    }

    #[test]
    fn test_endpoint_encodes_path_segments() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let url = client.endpoint(&["api", "school-reports", "schools", "School of Engineering", "departments"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/school-reports/schools/School%20of%20Engineering/departments"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("http://localhost:5000/backend/").unwrap();
        let url = client.endpoint(&["api", "visualization", "current-ay"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/backend/api/visualization/current-ay"
        );
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::InvalidUrl(_))));
    }
}
