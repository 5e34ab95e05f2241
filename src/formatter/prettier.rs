// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Prettier formatter

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use super::{run_filter, Formatter, DEFAULT_FORMAT_TIMEOUT_SECS};
use crate::errors::SptResult;
use crate::project::ProjectFormat;

/// Formats YAML and JSON with `prettier --parser <yaml|json>`
#[derive(Debug, Clone)]
pub struct PrettierFormatter {
    program: PathBuf,
    timeout: Duration,
}

impl PrettierFormatter {
    /// Use the given prettier executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_secs(DEFAULT_FORMAT_TIMEOUT_SECS),
        }
    }

    /// Look for `prettier` on PATH
    pub fn detect() -> Option<Self> {
        match which::which("prettier") {
            Ok(path) => Some(Self::new(path)),
            Err(_) => {
                debug!("prettier not found on PATH, skipping formatting");
                None
            }
        }
    }

    /// Bound each run by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    /// Prettier parser for a project format, if prettier handles it
    fn parser(format: ProjectFormat) -> Option<&'static str> {
        match format {
            ProjectFormat::Yaml => Some("yaml"),
            ProjectFormat::Json => Some("json"),
            ProjectFormat::Toml => None,
        }
    }
}

#[async_trait]
impl Formatter for PrettierFormatter {
    async fn format(&self, input: &str, format: ProjectFormat) -> SptResult<String> {
        let Some(parser) = Self::parser(format) else {
            debug!(%format, "prettier has no parser for this format, leaving it as is");
            return Ok(input.to_string());
        };

        run_filter(
            self.name(),
            &self.program,
            &["--parser", parser],
            input,
            self.timeout,
        )
        .await
    }

    fn name(&self) -> &str {
        "prettier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SptError;

    #[test]
    fn test_parser_selection() {
        assert_eq!(PrettierFormatter::parser(ProjectFormat::Yaml), Some("yaml"));
        assert_eq!(PrettierFormatter::parser(ProjectFormat::Json), Some("json"));
        assert_eq!(PrettierFormatter::parser(ProjectFormat::Toml), None);
    }

    #[tokio::test]
    async fn test_toml_is_passed_through() {
        let formatter = PrettierFormatter::new("/definitely/not/prettier");

        let output = formatter
            .format("title = \"Ship\"\n", ProjectFormat::Toml)
            .await
            .unwrap();

        assert_eq!(output, "title = \"Ship\"\n");
    }

    #[tokio::test]
    async fn test_missing_executable_fails() {
        let formatter = PrettierFormatter::new("/definitely/not/prettier")
            .with_timeout(Duration::from_secs(1));

        let result = formatter.format("title: Ship\n", ProjectFormat::Yaml).await;

        assert!(matches!(
            result,
            Err(SptError::FormatterFailed { tool, .. }) if tool == "prettier"
        ));
    }
}
