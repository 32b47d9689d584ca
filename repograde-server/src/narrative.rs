//! Narrative audit reports produced by a chat-completion model.
//!
//! Generation never fails from the caller's point of view: every problem is
//! rendered into a fallback string that is returned in place of the report.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use repograde_core::{ChecklistItem, FileTreeEntry, RepositoryMetadata, build_audit_prompt};
use serde::{Deserialize, Serialize};

use crate::config::NarrativeConfig;

/// Boxed future returned by [`NarrativeGenerator::generate`].
pub type NarrativeFuture<'a> = Pin<Box<dyn Future<Output = String> + Send + 'a>>;

/// Returned when no caller credential is available.
pub const MISSING_KEY_MESSAGE: &str = "API Key is missing. Please configure your OpenRouter API Key in the settings to unlock the Deep AI Analysis report.";

/// Produces a prose audit for a scored repository.
pub trait NarrativeGenerator {
    /// Generate the report, or a fallback string describing why it could not be produced.
    fn generate<'a>(
        &'a self,
        metadata: &'a RepositoryMetadata,
        tree: &'a [FileTreeEntry],
        checklist: &'a [ChecklistItem],
        api_key: Option<&'a str>,
    ) -> NarrativeFuture<'a>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Role {
    User,
    Assistant,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: Role,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// OpenRouter-compatible chat-completion client.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    api_url: String,
    model: String,
    referer: String,
    client: Client,
}

impl OpenRouterClient {
    /// Build a client whose requests are bounded by the configured timeout.
    pub fn new(config: &NarrativeConfig) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            referer: config.referer.clone(),
            client,
        })
    }

    async fn request_report(&self, prompt: String, api_key: &str) -> String {
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: Role::User,
                content: prompt,
            }],
        };
        let response = match self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                log::warn!("narrative request timed out: {err}");
                return "AI Analysis timed out waiting for the model. Please try again later."
                    .to_string();
            }
            Err(err) => {
                log::warn!("narrative request failed: {err}");
                return format!("AI Analysis failed due to an error: {err}");
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("narrative upstream returned {status}: {body}");
            return format!(
                "AI Analysis failed (Status {}). Please check your API Key.",
                status.as_u16()
            );
        }

        match response.json::<ChatResponse>().await {
            Ok(body) => match body.choices.into_iter().next() {
                Some(choice) if !choice.message.content.trim().is_empty() => {
                    choice.message.content
                }
                _ => {
                    log::warn!("narrative upstream returned no completion");
                    "AI Analysis failed: the model returned an empty response.".to_string()
                }
            },
            Err(err) => {
                log::warn!("narrative response could not be decoded: {err}");
                format!("AI Analysis failed due to an error: {err}")
            }
        }
    }
}

impl NarrativeGenerator for OpenRouterClient {
    fn generate<'a>(
        &'a self,
        metadata: &'a RepositoryMetadata,
        tree: &'a [FileTreeEntry],
        checklist: &'a [ChecklistItem],
        api_key: Option<&'a str>,
    ) -> NarrativeFuture<'a> {
        Box::pin(async move {
            let Some(api_key) = api_key.map(str::trim).filter(|key| !key.is_empty()) else {
                return MISSING_KEY_MESSAGE.to_string();
            };
            let prompt = build_audit_prompt(metadata, tree, checklist);
            self.request_report(prompt, api_key).await
        })
    }
}
