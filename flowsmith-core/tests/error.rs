use std::time::Duration;

use flowsmith_core::{is_retryable, FlowsmithError};

#[test]
fn error_display_for_max_retries() {
    let err = FlowsmithError::MaxRetriesExceeded {
        max: 2,
        last: "LLM provider failed: quota".to_string(),
    };
    assert_eq!(
        format!("{err}"),
        "Max retries (2) exceeded: LLM provider failed: quota"
    );
}

#[test]
fn error_display_for_llm_provider() {
    let err = FlowsmithError::LlmProvider("rate limited".to_string());
    assert_eq!(format!("{err}"), "LLM provider failed: rate limited");
}

#[test]
fn error_display_for_parse_failed() {
    let err = FlowsmithError::ParseFailed {
        output: "<html>".to_string(),
        reason: "unexpected token".to_string(),
    };
    assert_eq!(
        format!("{err}"),
        "Parsing failed on output '<html>': unexpected token"
    );
}

#[test]
fn serde_errors_convert() {
    let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: FlowsmithError = serde_err.into();
    assert!(matches!(err, FlowsmithError::Serde(_)));
}

#[test]
fn only_transient_errors_are_retryable() {
    assert!(is_retryable(&FlowsmithError::LlmProvider("503".to_string())));
    assert!(is_retryable(&FlowsmithError::Timeout(Duration::from_secs(1))));
    assert!(!is_retryable(&FlowsmithError::InvalidConfig("key".to_string())));
    assert!(!is_retryable(&FlowsmithError::ParseFailed {
        output: String::new(),
        reason: String::new(),
    }));
}
