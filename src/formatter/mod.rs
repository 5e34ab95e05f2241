// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! External formatters
//!
//! The `update` command can pipe the re-serialized project through a code
//! formatter before writing it back, so that files kept under a formatter
//! do not churn.

mod prettier;

pub use prettier::PrettierFormatter;

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::errors::{SptError, SptResult};
use crate::project::ProjectFormat;

/// Default bound on a single formatter run
pub const DEFAULT_FORMAT_TIMEOUT_SECS: u64 = 30;

/// Trait for output formatters
#[async_trait]
pub trait Formatter: Send + Sync {
    /// Format serialized project text
    ///
    /// Formats the formatter does not understand are returned unchanged.
    async fn format(&self, input: &str, format: ProjectFormat) -> SptResult<String>;

    /// Name used in messages
    fn name(&self) -> &str;
}

/// Pipe `input` through `program args...` and return its stdout
///
/// The child is killed if it is still running when `timeout` expires.
pub(crate) async fn run_filter(
    tool: &str,
    program: &Path,
    args: &[&str],
    input: &str,
    timeout: Duration,
) -> SptResult<String> {
    debug!(tool, program = %program.display(), ?args, "running formatter");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SptError::FormatterFailed {
            tool: tool.to_string(),
            stderr: e.to_string(),
        })?;

    // Feed stdin concurrently so a chatty child cannot fill its stdout pipe
    // while we are still writing
    if let Some(mut stdin) = child.stdin.take() {
        let bytes = input.as_bytes().to_vec();
        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(&bytes).await {
                debug!("formatter closed stdin early: {}", e);
            }
        });
    }

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(SptError::FormatterTimedOut {
                tool: tool.to_string(),
                seconds: timeout.as_secs(),
            })
        }
    };

    if !output.status.success() {
        return Err(SptError::FormatterFailed {
            tool: tool.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UppercaseFormatter;

    #[async_trait]
    impl Formatter for UppercaseFormatter {
        async fn format(&self, input: &str, format: ProjectFormat) -> SptResult<String> {
            match format {
                ProjectFormat::Toml => Ok(input.to_string()),
                _ => Ok(input.to_uppercase()),
            }
        }

        fn name(&self) -> &str {
            "uppercase"
        }
    }

    #[tokio::test]
    async fn test_formatter_trait_object() {
        let formatter: Box<dyn Formatter> = Box::new(UppercaseFormatter);

        let yaml = formatter.format("title: a\n", ProjectFormat::Yaml).await.unwrap();
        let toml = formatter.format("title = 'a'\n", ProjectFormat::Toml).await.unwrap();

        assert_eq!(yaml, "TITLE: A\n");
        assert_eq!(toml, "title = 'a'\n");
        assert_eq!(formatter.name(), "uppercase");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_filter_passes_stdin_through() {
        let output = run_filter("cat", Path::new("cat"), &[], "title: Ship\n", Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(output, "title: Ship\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_filter_reports_stderr() {
        let result = run_filter(
            "sh",
            Path::new("sh"),
            &["-c", "echo '[error] bad indentation' >&2; exit 2"],
            "",
            Duration::from_secs(10),
        )
        .await;

        match result {
            Err(SptError::FormatterFailed { tool, stderr }) => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr, "[error] bad indentation\n");
            }
            other => panic!("expected FormatterFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_filter_times_out() {
        let result = run_filter(
            "sh",
            Path::new("sh"),
            &["-c", "exec sleep 5"],
            "",
            Duration::from_millis(200),
        )
        .await;

        assert!(matches!(result, Err(SptError::FormatterTimedOut { .. })));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let result = run_filter(
            "ghost",
            Path::new("/definitely/not/a/formatter"),
            &[],
            "",
            Duration::from_secs(1),
        )
        .await;

        assert!(matches!(result, Err(SptError::FormatterFailed { .. })));
    }
}
