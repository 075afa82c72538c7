use async_trait::async_trait;
use flowsmith_core::{FlowsmithError, LlmRequest, Message, Runnable};

use crate::Llm;

/// Anything that turns a prompt into a completion.
pub trait TextGenerator: Runnable<String, String> + Send + Sync {}

impl<T> TextGenerator for T where T: Runnable<String, String> + Send + Sync {}

/// Adapts a chat-style [`Llm`] into a [`TextGenerator`]: each prompt is sent
/// as a single user message to `model`.
pub struct PromptGenerator<L> {
    llm: L,
    model: String,
}

impl<L> PromptGenerator<L> {
    pub fn new(llm: L, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }
}

#[async_trait]
impl<L> Runnable<String, String> for PromptGenerator<L>
where
    L: Llm + Send + Sync,
{
    async fn invoke(&self, prompt: String) -> Result<String, FlowsmithError> {
        let request = LlmRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
        };
        let response = self.llm.invoke(request).await?;
        Ok(response.content)
    }
}
