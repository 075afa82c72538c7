use std::time::Duration;

use crate::{FlowsmithError, Runnable};

/// Delay before the second attempt; doubled for every attempt after that.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

pub struct Retrying<R> {
    runnable: R,
    max_attempts: usize,
    backoff: Duration,
}

impl<R> Retrying<R> {
    pub fn new(runnable: R, max_attempts: usize) -> Self {
        Self {
            runnable,
            max_attempts,
            backoff: DEFAULT_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        self.backoff.saturating_mul(1u32 << exponent)
    }
}

pub fn is_retryable(error: &FlowsmithError) -> bool {
    matches!(
        error,
        FlowsmithError::LlmProvider(_) | FlowsmithError::Timeout(_)
    )
}

#[async_trait::async_trait]
impl<Input, Output, R> Runnable<Input, Output> for Retrying<R>
where
    Input: Send + Sync + Clone + 'static,
    Output: Send + 'static,
    R: Runnable<Input, Output> + Send + Sync,
{
    async fn invoke(&self, input: Input) -> Result<Output, FlowsmithError> {
        if self.max_attempts == 0 {
            return Err(FlowsmithError::MaxRetriesExceeded {
                max: 0,
                last: "no attempts were made".to_string(),
            });
        }

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.runnable.invoke(input.clone()).await {
                Ok(output) => return Ok(output),
                Err(error) => {
                    if !is_retryable(&error) {
                        return Err(error);
                    }

                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "transient failure"
                    );

                    if attempt < self.max_attempts {
                        let delay = self.delay_for(attempt);
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                    last_error = Some(error);
                }
            }
        }

        Err(FlowsmithError::MaxRetriesExceeded {
            max: self.max_attempts,
            last: last_error
                .map(|error| error.to_string())
                .unwrap_or_default(),
        })
    }
}

pub trait RunnableExt<Input: Send + 'static, Output: Send + 'static>:
    Runnable<Input, Output> + Sized
{
    fn with_retries(self, max_attempts: usize) -> Retrying<Self> {
        Retrying::new(self, max_attempts)
    }
}

impl<Input: Send + 'static, Output: Send + 'static, T> RunnableExt<Input, Output> for T where
    T: Runnable<Input, Output> + Sized
{
}
