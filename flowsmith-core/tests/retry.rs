use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use flowsmith_core::{FlowsmithError, Runnable, RunnableExt};

struct Flaky {
    failures_before_success: usize,
    attempts: Arc<AtomicUsize>,
}

impl Flaky {
    fn new(failures_before_success: usize) -> Self {
        Self {
            failures_before_success,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn attempts_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

struct ParseFailer {
    attempts: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Runnable<String, String> for Flaky {
    async fn invoke(&self, input: String) -> Result<String, FlowsmithError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures_before_success {
            return Err(FlowsmithError::LlmProvider(format!("transient #{attempt}")));
        }

        Ok(format!("ok:{input}"))
    }
}

#[async_trait::async_trait]
impl Runnable<String, String> for ParseFailer {
    async fn invoke(&self, _input: String) -> Result<String, FlowsmithError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(FlowsmithError::ParseFailed {
            output: "bad".to_string(),
            reason: "invalid".to_string(),
        })
    }
}

#[tokio::test]
async fn retries_until_success() {
    let flaky = Flaky::new(2);
    let attempts = flaky.attempts_counter();
    let output = flaky
        .with_retries(3)
        .with_backoff(Duration::ZERO)
        .invoke("ping".to_string())
        .await
        .unwrap();

    assert_eq!(output, "ok:ping".to_string());
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn returns_max_retries_exceeded_with_last_error() {
    let flaky = Flaky::new(5);
    let attempts = flaky.attempts_counter();
    let err = flaky
        .with_retries(2)
        .with_backoff(Duration::ZERO)
        .invoke("ping".to_string())
        .await
        .unwrap_err();

    match err {
        FlowsmithError::MaxRetriesExceeded { max, last } => {
            assert_eq!(max, 2);
            assert!(last.contains("transient #2"), "last error was {last}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_attempts_fails_without_calling() {
    let flaky = Flaky::new(1);
    let attempts = flaky.attempts_counter();
    let err = flaky
        .with_retries(0)
        .invoke("ping".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, FlowsmithError::MaxRetriesExceeded { max: 0, .. }));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_retryable_error_fails_fast() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let parse_failer = ParseFailer {
        attempts: Arc::clone(&attempts),
    };
    let err = parse_failer
        .with_retries(3)
        .with_backoff(Duration::ZERO)
        .invoke("ping".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, FlowsmithError::ParseFailed { .. }));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn backoff_is_applied_between_attempts() {
    let flaky = Flaky::new(1);
    let started = std::time::Instant::now();
    flaky
        .with_retries(2)
        .with_backoff(Duration::from_millis(20))
        .invoke("ping".to_string())
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(20));
}
