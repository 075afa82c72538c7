mod error;
mod llm;
mod output_parsers;
mod retry;
mod runnable;
pub mod state;
mod value;

pub use error::FlowsmithError;
pub use llm::{LlmRequest, LlmResponse, Message, Role};
pub use output_parsers::{strip_code_fences, JsonOutputParser, StrOutputParser};
pub use retry::{is_retryable, Retrying, RunnableExt, DEFAULT_BACKOFF};
pub use runnable::Runnable;
pub use state::{GraphState, StateSchema, StateUpdate};
pub use value::{TryFromValue, Value};
