//! HTTP client for the RepoGrade service.

use crate::CliResult;
use reqwest::{Client, StatusCode};
use repograde_core::AnalysisResponse;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Default base URL of the RepoGrade server.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

const API_KEY_HEADER: &str = "x-api-key";
const MAX_RAW_ERROR_CHARS: usize = 150;

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    repo_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Remote operations exposed by the RepoGrade server.
pub trait ServiceClient {
    /// Request an analysis of `repo_url`, forwarding the optional narrative key.
    fn analyze<'a>(
        &'a self,
        repo_url: &'a str,
        api_key: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = CliResult<AnalysisResponse>> + Send + 'a>>;

    /// Fetch the server health status string.
    fn health<'a>(&'a self) -> Pin<Box<dyn Future<Output = CliResult<String>> + Send + 'a>>;
}

/// Reqwest-backed service client.
pub struct ReqwestServiceClient {
    base_url: String,
    client: Client,
}

impl ReqwestServiceClient {
    /// Build a client for the server at `server_url`.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let client = Client::builder().user_agent("repograde-cli").build()?;
        Ok(Self {
            base_url: normalize_server_url(server_url)?,
            client,
        })
    }
}

impl ServiceClient for ReqwestServiceClient {
    fn analyze<'a>(
        &'a self,
        repo_url: &'a str,
        api_key: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = CliResult<AnalysisResponse>> + Send + 'a>> {
        Box::pin(post_analyze(&self.client, &self.base_url, repo_url, api_key))
    }

    fn health<'a>(&'a self) -> Pin<Box<dyn Future<Output = CliResult<String>> + Send + 'a>> {
        Box::pin(fetch_health(&self.client, &self.base_url))
    }
}

/// Validate and normalize a server base URL.
pub fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

async fn post_analyze(
    client: &Client,
    base_url: &str,
    repo_url: &str,
    api_key: Option<&str>,
) -> CliResult<AnalysisResponse> {
    let mut request = client
        .post(format!("{base_url}/api/analyze"))
        .json(&AnalyzeRequest { repo_url });
    if let Some(key) = api_key.map(str::trim).filter(|key| !key.is_empty()) {
        request = request.header(API_KEY_HEADER, key);
    }
    let response = request
        .send()
        .await
        .map_err(|err| describe_send_error(err, base_url))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(describe_failure(status, &body).into());
    }
    Ok(response.json::<AnalysisResponse>().await?)
}

async fn fetch_health(client: &Client, base_url: &str) -> CliResult<String> {
    let response = client
        .get(format!("{base_url}/api/health"))
        .send()
        .await
        .map_err(|err| describe_send_error(err, base_url))?
        .error_for_status()?;
    let health: HealthResponse = response.json().await?;
    Ok(health.status)
}

fn describe_send_error(
    err: reqwest::Error,
    base_url: &str,
) -> Box<dyn std::error::Error + Send + Sync> {
    if err.is_connect() {
        return format!(
            "Connection failed. Ensure the backend is running at {base_url} and is accessible."
        )
        .into();
    }
    err.into()
}

/// Turn a failed response into a message for the user.
pub fn describe_failure(status: StatusCode, body: &str) -> String {
    let detail = error_detail(body);
    match status.as_u16() {
        400 | 422 => match detail {
            Some(detail) => format!("Invalid Input: {detail}"),
            None => "Invalid Input: Please check the repository URL format.".to_string(),
        },
        401 => "Unauthorized: Invalid or missing API Key. Please check your settings.".to_string(),
        403 => "Forbidden: Access denied. Check your API key permissions.".to_string(),
        404 => match detail {
            Some(detail) if detail.to_lowercase().contains("repository") => {
                "Repository not found. Please ensure the URL is correct and public.".to_string()
            }
            _ => "Resource not found (404). Check the server URL.".to_string(),
        },
        429 => "Rate Limit Exceeded: You are making too many requests. Please wait a moment."
            .to_string(),
        code if code >= 500 => match detail {
            Some(detail) => {
                format!("Server Error: The backend encountered an issue. Details: {detail}")
            }
            None => "Server Error: The backend encountered an issue.".to_string(),
        },
        code => match detail {
            Some(detail) => detail,
            None if !body.trim().is_empty() => {
                let snippet: String = body.chars().take(MAX_RAW_ERROR_CHARS).collect();
                let ellipsis = if body.chars().count() > MAX_RAW_ERROR_CHARS {
                    "..."
                } else {
                    ""
                };
                format!("Error: {snippet}{ellipsis}")
            }
            None => format!("Analysis failed ({code})"),
        },
    }
}

fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = value.get("message").or_else(|| value.get("detail"))?;
    match detail {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
