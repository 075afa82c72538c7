//! Google Gemini API LLM client

use std::time::Duration;

use flowsmith_core::{FlowsmithError, LlmRequest, LlmResponse, Message, Role, Runnable};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GoogleClient {
    base_url: String,
    api_key: String,
    model: String,
    http: Client,
}

impl GoogleClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, FlowsmithError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| FlowsmithError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn model_name(&self, request_model: &str) -> String {
        let model = if request_model.trim().is_empty() {
            self.model.as_str()
        } else {
            request_model
        };
        let model = model.trim();
        model.strip_prefix("models/").unwrap_or(model).to_string()
    }

    fn generate_url(&self, request_model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model_name(request_model)
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    }
}

fn map_contents(messages: &[Message]) -> Vec<Content> {
    messages
        .iter()
        .filter_map(|message| match message.role {
            Role::System => None,
            Role::User => Some(text_content(Some("user"), &message.content)),
            Role::Assistant if message.content.is_empty() => None,
            Role::Assistant => Some(text_content(Some("model"), &message.content)),
        })
        .collect()
}

fn system_instruction(messages: &[Message]) -> Option<Content> {
    let parts: Vec<Part> = messages
        .iter()
        .filter(|message| matches!(message.role, Role::System))
        .map(|message| Part {
            text: Some(message.content.clone()),
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(Content { role: None, parts })
    }
}

fn build_request(input: &LlmRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: map_contents(&input.messages),
        system_instruction: system_instruction(&input.messages),
    }
}

fn is_blocked_finish_reason(reason: &str) -> bool {
    matches!(reason, "SAFETY" | "RECITATION" | "BLOCKLIST")
}

/// The request URL is dropped from the message so nothing sensitive that
/// ends up in it is echoed into logs.
fn map_transport_error(err: reqwest::Error) -> FlowsmithError {
    if err.is_timeout() {
        FlowsmithError::Timeout(REQUEST_TIMEOUT)
    } else {
        FlowsmithError::LlmProvider(err.without_url().to_string())
    }
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for GoogleClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, FlowsmithError> {
        let request = build_request(&input);
        let url = self.generate_url(&input.model);
        tracing::debug!(model = %self.model_name(&input.model), "gemini generateContent");

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));
            // Bad requests and auth failures will not succeed on retry.
            if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(FlowsmithError::InvalidConfig(message));
            }
            return Err(FlowsmithError::LlmProvider(message));
        }

        let response = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| FlowsmithError::LlmProvider(err.without_url().to_string()))?;

        let candidate = response
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .ok_or_else(|| FlowsmithError::LlmProvider("No candidates in response".to_string()))?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            if let Some(reason) = candidate
                .finish_reason
                .as_deref()
                .filter(|reason| is_blocked_finish_reason(reason))
            {
                return Err(FlowsmithError::LlmProvider(format!(
                    "Generation blocked: {}",
                    reason
                )));
            }
        }

        Ok(LlmResponse { content: text })
    }
}
