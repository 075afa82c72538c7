use std::sync::Mutex;

use async_trait::async_trait;
use flowsmith_core::{FlowsmithError, Runnable};
use flowsmith_llm::{LlmRequest, LlmResponse, PromptGenerator, Role, TextGenerator};

#[derive(Default)]
struct RecordingLlm {
    requests: Mutex<Vec<LlmRequest>>,
}

#[async_trait]
impl Runnable<LlmRequest, LlmResponse> for RecordingLlm {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, FlowsmithError> {
        let reply = format!("echo: {}", input.messages[0].content);
        self.requests.lock().unwrap().push(input);
        Ok(LlmResponse { content: reply })
    }
}

fn assert_text_generator<T: TextGenerator>(_: &T) {}

#[tokio::test]
async fn prompt_generator_sends_single_user_message() {
    let generator = PromptGenerator::new(RecordingLlm::default(), "gemini-2.5-flash");
    assert_text_generator(&generator);

    let output = generator.invoke("draft a workflow".to_string()).await.unwrap();
    assert_eq!(output, "echo: draft a workflow");

    let requests = generator_requests(&generator);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gemini-2.5-flash");
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[0].messages[0].role, Role::User);
}

fn generator_requests(generator: &PromptGenerator<RecordingLlm>) -> Vec<LlmRequest> {
    generator.llm().requests.lock().unwrap().clone()
}
