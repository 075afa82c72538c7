mod generator;

// Provider-specific clients (feature-gated)
pub mod providers;

pub use flowsmith_core::{LlmRequest, LlmResponse, Message, Role};
pub use generator::{PromptGenerator, TextGenerator};

#[cfg(feature = "google")]
pub use providers::google::{GoogleClient, DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL};

use flowsmith_core::Runnable;

pub trait Llm: Runnable<LlmRequest, LlmResponse> {}

impl<T> Llm for T where T: Runnable<LlmRequest, LlmResponse> {}
