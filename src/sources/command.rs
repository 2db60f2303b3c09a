//! External annotation generator run as a child process.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::constants::lyrics::DEFAULT_ANNOTATION_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::sources::{check_aligned, AnnotationSource};

/// Pipes the lyric lines into a shell command and reads one annotation per line back.
///
/// This is how transliteration or translation tools are plugged in without the
/// core knowing anything about languages. The child is killed when it does not
/// finish within the timeout.
#[derive(Debug, Clone)]
pub struct CommandAnnotationSource {
    command: String,
    timeout: Duration,
}

impl CommandAnnotationSource {
    /// Create a source running `command` through `sh -c`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: Duration::from_secs(DEFAULT_ANNOTATION_TIMEOUT_SECS),
        }
    }

    /// Limit how long the command may run.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, lines: &[String]) -> Result<Vec<String>> {
        let unavailable = |e: std::io::Error| Error::source_unavailable(format!("{}: {e}", self.command));

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(unavailable)?;

        let mut input = lines.join("\n");
        input.push('\n');
        let stdin = child.stdin.take();

        // Feed stdin while the output is drained, so neither pipe can fill up
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes()).await?;
            }
            Ok::<_, std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(unavailable)?;
        if let Err(e) = fed {
            // The command may stop reading early; its output decides
            tracing::debug!("Annotation command {:?} did not take all input: {e}", self.command);
        }

        if !output.status.success() {
            return Err(Error::source_unavailable(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let annotations = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|l| l.trim().to_string())
            .collect();
        tracing::debug!("Annotation command {:?} finished", self.command);
        check_aligned(annotations, lines.len(), &self.command)
    }
}

#[async_trait]
impl AnnotationSource for CommandAnnotationSource {
    async fn generate(&self, lines: &[String]) -> Result<Vec<String>> {
        tokio::time::timeout(self.timeout, self.run(lines))
            .await
            .unwrap_or_else(|_| {
                tracing::warn!("Annotation command {:?} timed out", self.command);
                Err(Error::source_unavailable(format!(
                    "{} gave no answer within {}s",
                    self.command,
                    self.timeout.as_secs_f64()
                )))
            })
    }

    fn describe(&self) -> String {
        format!("Run: {}", self.command)
    }
}
