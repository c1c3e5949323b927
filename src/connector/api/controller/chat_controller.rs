use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::{ChatTranscript, DomainError};

use super::super::Container;

const QUIT_COMMANDS: &[&str] = &["/quit", "/exit"];
const HISTORY_COMMAND: &str = "/history";

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Interactive session on stdin/stdout.
    pub async fn chat(&self, transcript_path: Option<PathBuf>) -> Result<String> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        self.chat_with(stdin, &mut stdout, transcript_path.as_deref()).await
    }

    /// Runs a session and, when `transcript_path` is set, writes the transcript
    /// there. The file is written even if the session stopped on an error.
    pub async fn chat_with<R, W>(
        &self,
        input: R,
        output: &mut W,
        transcript_path: Option<&Path>,
    ) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let (transcript, session) = self.run_session(input, output).await;

        if let Some(path) = transcript_path {
            write_transcript(path, &transcript).await?;
            info!("Transcript written to {}", path.display());
        }

        session?;
        Ok(format!("Session ended after {} turns.", transcript.len()))
    }

    /// Read messages line by line until EOF or a quit command. A failed turn is
    /// reported and the session goes on. Input that is not valid UTF-8 is
    /// decoded lossily.
    ///
    /// The transcript is returned alongside the outcome so that turns taken
    /// before an I/O failure are kept.
    pub async fn run_session<R, W>(
        &self,
        input: R,
        output: &mut W,
    ) -> (ChatTranscript, Result<()>)
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut transcript = ChatTranscript::new();
        let result = self.drive(input, output, &mut transcript).await;
        (transcript, result)
    }

    async fn drive<R, W>(
        &self,
        mut input: R,
        output: &mut W,
        transcript: &mut ChatTranscript,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let use_case = self.container.chat_turn_use_case();
        let mut buf = Vec::new();

        writeln!(
            output,
            "PlanChat using {} -> {}",
            self.container.model_name(),
            self.container.webhook_endpoint()
        )?;
        writeln!(
            output,
            "Type a message, {HISTORY_COMMAND} to show the conversation, /quit to leave."
        )?;

        loop {
            write!(output, "> ")?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                warn!("Input line is not valid UTF-8; invalid bytes were replaced");
            }
            let message = line.trim();

            if message.is_empty() {
                continue;
            }
            if QUIT_COMMANDS.contains(&message) {
                break;
            }
            if message == HISTORY_COMMAND {
                if transcript.is_empty() {
                    writeln!(output, "(no messages yet)")?;
                } else {
                    writeln!(output, "{}", transcript.render())?;
                }
                continue;
            }

            let spinner = spinner();
            let (next, outcome) = use_case
                .execute_with_progress(std::mem::take(transcript), message, |stage| {
                    spinner.set_message(stage.message())
                })
                .await;
            spinner.finish_and_clear();
            *transcript = next;

            match outcome {
                Ok(outcome) => {
                    writeln!(
                        output,
                        "Extracted JSON: {}",
                        serde_json::to_string(&outcome.parameters)?
                    )?;
                    if let Some(turn) = transcript.last() {
                        writeln!(output, "{}: {}", turn.role.label(), turn.text)?;
                    }
                }
                Err(e) => writeln!(output, "Error: {e}")?,
            }
        }

        Ok(())
    }
}

/// Writes the transcript as a JSON array of `{"role", "text"}` objects.
pub async fn write_transcript(
    path: &Path,
    transcript: &ChatTranscript,
) -> Result<(), DomainError> {
    let json = serde_json::to_string_pretty(transcript)
        .map_err(|e| DomainError::internal(format!("cannot serialize transcript: {e}")))?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{ContainerConfig, MockChatClient, MockWebhookClient, Role};

    fn mock_container(webhook: MockWebhookClient) -> Container {
        Container::with_clients(
            Arc::new(MockChatClient::new()),
            Arc::new(webhook),
            ContainerConfig::default(),
        )
    }

    /// Accepts nothing, so the session fails on its first write.
    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn runs_turns_until_quit() {
        let container = mock_container(MockWebhookClient::new());
        let controller = ChatController::new(&container);
        let input: &[u8] = b"Set Plan Year 1 headcount for March to 120\n\n/history\n/quit\nignored\n";
        let mut output = Vec::new();

        let (transcript, result) = controller.run_session(input, &mut output).await;

        result.unwrap();
        assert_eq!(transcript.len(), 2);
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(r#"Extracted JSON: {"version":"Plan Year 1","month":"March","measure":"Headcount","value":"120"}"#));
        assert!(output.contains("You: Set Plan Year 1 headcount for March to 120"));
        assert!(!output.contains("ignored"));
    }

    #[tokio::test]
    async fn failed_turn_does_not_end_session() {
        let container = mock_container(MockWebhookClient::failing("webhook returned 500"));
        let controller = ChatController::new(&container);
        let input: &[u8] = b"hello\nagain\n";
        let mut output = Vec::new();

        let (transcript, result) = controller.run_session(input, &mut output).await;

        result.unwrap();
        assert_eq!(transcript.len(), 2);
        assert!(transcript.turns().iter().all(|t| t.role == Role::User));
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Error: Webhook error").count(), 2);
    }

    #[tokio::test]
    async fn empty_history_is_reported() {
        let container = mock_container(MockWebhookClient::new());
        let controller = ChatController::new(&container);
        let input: &[u8] = b"/history\n";
        let mut output = Vec::new();

        let (transcript, result) = controller.run_session(input, &mut output).await;

        result.unwrap();
        assert!(transcript.is_empty());
        assert!(String::from_utf8(output).unwrap().contains("(no messages yet)"));
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_session() {
        let container = mock_container(MockWebhookClient::new());
        let controller = ChatController::new(&container);
        let input: &[u8] = b"Set Plan Year 1 headcount for March to 120\nPlan Year 2 caf\xe9 May 3\nhello\n";
        let mut output = Vec::new();

        let (transcript, result) = controller.run_session(input, &mut output).await;

        result.unwrap();
        assert_eq!(transcript.len(), 6);
        assert_eq!(
            transcript.turns()[0].text,
            "Set Plan Year 1 headcount for March to 120"
        );
        assert_eq!(transcript.turns()[2].text, "Plan Year 2 caf\u{FFFD} May 3");
        assert_eq!(transcript.turns()[4].text, "hello");
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(r#""version":"Plan Year 2","month":"May","measure":"","value":"3""#));
    }

    #[tokio::test]
    async fn transcript_is_exported_in_order() {
        let container = mock_container(MockWebhookClient::new());
        let controller = ChatController::new(&container);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.json");
        let input: &[u8] = b"Set Plan Year 1 headcount for March to 120\n/quit\n";
        let mut output = Vec::new();

        let summary = controller
            .chat_with(input, &mut output, Some(&path))
            .await
            .unwrap();

        assert_eq!(summary, "Session ended after 2 turns.");
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let turns = written.as_array().expect("transcript is a JSON array");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[0]["text"], "Set Plan Year 1 headcount for March to 120");
        assert_eq!(turns[1]["role"], "bot");
        assert!(turns[1]["text"]
            .as_str()
            .unwrap()
            .contains("[mock] Create Data"));
    }

    #[tokio::test]
    async fn transcript_is_exported_when_session_fails() {
        let container = mock_container(MockWebhookClient::new());
        let controller = ChatController::new(&container);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.json");
        let input: &[u8] = b"hello\n";

        let result = controller
            .chat_with(input, &mut ClosedOutput, Some(&path))
            .await;

        assert!(result.is_err());
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!([]));
    }

    #[tokio::test]
    async fn unwritable_transcript_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("transcript.json");

        let err = write_transcript(&path, &ChatTranscript::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::IoError(_)));
    }
}
