use crate::{FlowsmithError, LlmResponse, Runnable};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// Extracts the completion text from an `LlmResponse`.
#[derive(Clone, Default)]
pub struct StrOutputParser;

#[async_trait]
impl Runnable<LlmResponse, String> for StrOutputParser {
    async fn invoke(&self, input: LlmResponse) -> Result<String, FlowsmithError> {
        Ok(input.content)
    }
}

/// Removes a surrounding markdown code fence (```` ```json ```` or bare
/// ```` ``` ````) if the whole text is wrapped in one.
pub fn strip_code_fences(text: &str) -> &str {
    let cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```") {
        let body = match rest.find('\n') {
            Some(pos) if rest[..pos].chars().all(|c| c.is_ascii_alphanumeric()) => &rest[pos + 1..],
            _ => rest,
        };
        body.trim_end().trim_end_matches("```").trim()
    } else {
        cleaned
    }
}

/// Parses a JSON string into a structured type or `Value`.
#[derive(Clone, Default)]
pub struct JsonOutputParser<T = Value> {
    _marker: PhantomData<T>,
}

impl<T> JsonOutputParser<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> JsonOutputParser<T> {
    pub fn parse(&self, input: &str) -> Result<T, FlowsmithError> {
        let cleaned = strip_code_fences(input);
        if cleaned.is_empty() {
            return Err(FlowsmithError::ParseFailed {
                output: input.to_string(),
                reason: "empty output".to_string(),
            });
        }

        serde_json::from_str(cleaned).map_err(|err| FlowsmithError::ParseFailed {
            output: input.to_string(),
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send + Sync + 'static> Runnable<String, T> for JsonOutputParser<T> {
    async fn invoke(&self, input: String) -> Result<T, FlowsmithError> {
        self.parse(&input)
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send + Sync + 'static> Runnable<LlmResponse, T> for JsonOutputParser<T> {
    async fn invoke(&self, input: LlmResponse) -> Result<T, FlowsmithError> {
        self.parse(&input.content)
    }
}
