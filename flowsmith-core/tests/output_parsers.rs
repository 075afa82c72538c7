use flowsmith_core::{
    strip_code_fences, FlowsmithError, JsonOutputParser, LlmResponse, Runnable, StrOutputParser,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[tokio::test]
async fn str_output_parser_extracts_content() {
    let response = LlmResponse {
        content: "Hello from LLM".to_string(),
    };
    let output = StrOutputParser.invoke(response).await.unwrap();
    assert_eq!(output, "Hello from LLM");
}

#[tokio::test]
async fn json_output_parser_accepts_plain_and_fenced_json() {
    let parser = JsonOutputParser::<Value>::new();

    let output = parser.invoke(r#"{"key": "value"}"#.to_string()).await.unwrap();
    assert_eq!(output, json!({"key": "value"}));

    let fenced = "```json\n{\n    \"key\": \"value\"\n}\n```";
    let output = parser.invoke(fenced.to_string()).await.unwrap();
    assert_eq!(output, json!({"key": "value"}));

    let response = LlmResponse {
        content: "```\n[1, 2]\n```".to_string(),
    };
    let output = parser.invoke(response).await.unwrap();
    assert_eq!(output, json!([1, 2]));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Workflow {
    name: String,
    steps: Vec<String>,
}

#[tokio::test]
async fn json_output_parser_typed() {
    let parser = JsonOutputParser::<Workflow>::new();
    let output = parser
        .invoke(r#"{"name": "scraper", "steps": ["fetch", "parse"]}"#.to_string())
        .await
        .unwrap();
    assert_eq!(
        output,
        Workflow {
            name: "scraper".to_string(),
            steps: vec!["fetch".to_string(), "parse".to_string()],
        }
    );
}

#[test]
fn json_output_parser_reports_the_offending_output() {
    let parser = JsonOutputParser::<Value>::new();
    let err = parser.parse("Here is your workflow: step 1...").unwrap_err();
    match err {
        FlowsmithError::ParseFailed { output, .. } => {
            assert_eq!(output, "Here is your workflow: step 1...");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(matches!(
        parser.parse("```json\n```"),
        Err(FlowsmithError::ParseFailed { .. })
    ));
}

#[test]
fn strip_code_fences_leaves_unfenced_text_alone() {
    assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    assert_eq!(strip_code_fences("```{\"a\": 1}```"), "{\"a\": 1}");
}
