//! External process execution with line-by-line output streaming

use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{MixerError, MixerResult};

/// Which of the process's text streams a line arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    Stdout,
    Stderr,
}

/// One line of process output, tagged with its stream
#[derive(Debug, Clone)]
pub struct OutputLine {
    pub source: StreamSource,
    pub text: String,
}

/// Runs one external process at a time, streaming its output lines to a handler.
///
/// Both text streams are read concurrently and funneled through one channel,
/// so the handler is only ever invoked from a single place. Per-stream line
/// order is preserved; no ordering holds between the two streams.
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Launch the tool with `args`, deliver every output line to `on_line`,
    /// and await its exit status.
    ///
    /// A spawn failure with `ErrorKind::NotFound` is reported as
    /// [`MixerError::ToolNotFound`]; the exit status itself is returned
    /// untouched for the caller to interpret.
    pub async fn run<F>(&self, args: &[String], mut on_line: F) -> MixerResult<ExitStatus>
    where
        F: FnMut(OutputLine),
    {
        debug!(program = %self.program, ?args, "spawning external tool");

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MixerError::ToolNotFound {
                        program: self.program.clone(),
                    }
                } else {
                    MixerError::IoError(e)
                }
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MixerError::IoError(std::io::Error::other("stdout pipe missing")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| MixerError::IoError(std::io::Error::other("stderr pipe missing")))?;

        let (tx, mut rx) = mpsc::channel(64);
        tokio::spawn(forward_lines(stdout, StreamSource::Stdout, tx.clone()));
        tokio::spawn(forward_lines(stderr, StreamSource::Stderr, tx));

        // Channel closes once both reader tasks hit end-of-stream.
        while let Some(line) = rx.recv().await {
            on_line(line);
        }

        let status = child.wait().await?;
        debug!(%status, "external tool exited");
        Ok(status)
    }
}

async fn forward_lines<R>(reader: R, source: StreamSource, tx: mpsc::Sender<OutputLine>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(text)) = lines.next_line().await {
        if tx.send(OutputLine { source, text }).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_lines_from_both_streams_in_per_stream_order() {
        let runner = ProcessRunner::new("sh");
        let args: Vec<String> = vec![
            "-c".to_string(),
            "echo out1; echo err1 1>&2; echo out2; echo err2 1>&2".to_string(),
        ];

        let mut collected = Vec::new();
        let status = runner
            .run(&args, |line| collected.push(line))
            .await
            .unwrap();
        assert!(status.success());

        let stdout: Vec<&str> = collected
            .iter()
            .filter(|l| l.source == StreamSource::Stdout)
            .map(|l| l.text.as_str())
            .collect();
        let stderr: Vec<&str> = collected
            .iter()
            .filter(|l| l.source == StreamSource::Stderr)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(stdout, vec!["out1", "out2"]);
        assert_eq!(stderr, vec!["err1", "err2"]);
    }

    #[tokio::test]
    async fn reports_missing_binary_as_tool_not_found() {
        let runner = ProcessRunner::new("definitely-not-a-real-binary-name");
        let result = runner.run(&[], |_| {}).await;
        assert!(matches!(
            result,
            Err(MixerError::ToolNotFound { ref program }) if program.contains("definitely-not")
        ));
    }

    #[tokio::test]
    async fn returns_nonzero_exit_status_untouched() {
        let runner = ProcessRunner::new("sh");
        let args: Vec<String> = vec!["-c".to_string(), "exit 3".to_string()];
        let status = runner.run(&args, |_| {}).await.unwrap();
        assert!(!status.success());
    }
}
