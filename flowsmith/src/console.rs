//! Console I/O for the chat loop.
//!
//! [`TerminalConsole`] keeps a `rustyline` editor on its own thread so that a
//! blocking read never stalls the async runtime. Prompts are sent to that
//! thread over a channel and the line comes back on a oneshot.

use std::sync::mpsc;
use std::thread;

use async_trait::async_trait;
use flowsmith_core::FlowsmithError;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::oneshot;

/// What the user did at a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A submitted line, without the trailing newline.
    Line(String),
    /// Input closed: Ctrl+D, Ctrl+C or end of a piped stream.
    Eof,
}

#[async_trait]
pub trait Console: Send + Sync {
    async fn read_line(&self, prompt: &str) -> Result<InputEvent, FlowsmithError>;

    fn print(&self, text: &str);
}

struct ReadRequest {
    prompt: String,
    reply: oneshot::Sender<Result<InputEvent, FlowsmithError>>,
}

pub struct TerminalConsole {
    requests: mpsc::Sender<ReadRequest>,
}

impl TerminalConsole {
    pub fn new() -> Result<Self, FlowsmithError> {
        let (requests, inbox) = mpsc::channel::<ReadRequest>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), FlowsmithError>>();

        thread::Builder::new()
            .name("flowsmith-input".to_string())
            .spawn(move || {
                let mut editor = match DefaultEditor::new() {
                    Ok(editor) => {
                        let _ = ready_tx.send(Ok(()));
                        editor
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(readline_error(err)));
                        return;
                    }
                };

                // Ends when the console is dropped.
                while let Ok(request) = inbox.recv() {
                    let event = match editor.readline(&request.prompt) {
                        Ok(line) => {
                            if !line.trim().is_empty() {
                                let _ = editor.add_history_entry(line.as_str());
                            }
                            Ok(InputEvent::Line(line))
                        }
                        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                            Ok(InputEvent::Eof)
                        }
                        Err(err) => Err(readline_error(err)),
                    };
                    let _ = request.reply.send(event);
                }
            })?;

        ready_rx.recv().map_err(|_| {
            FlowsmithError::Custom("input thread exited during startup".to_string())
        })??;

        Ok(Self { requests })
    }
}

fn readline_error(err: ReadlineError) -> FlowsmithError {
    match err {
        ReadlineError::Io(err) => FlowsmithError::Io(err),
        other => FlowsmithError::Custom(format!("readline failed: {other}")),
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn read_line(&self, prompt: &str) -> Result<InputEvent, FlowsmithError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(ReadRequest {
                prompt: prompt.to_string(),
                reply,
            })
            .map_err(|_| FlowsmithError::Custom("input thread is gone".to_string()))?;

        response
            .await
            .map_err(|_| FlowsmithError::Custom("input thread dropped the request".to_string()))?
    }

    fn print(&self, text: &str) {
        println!("{text}");
    }
}
