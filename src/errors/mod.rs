// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Error types
//!
//! Every failure carries the stage titles involved so the user can find the
//! offending entry in the project file.

mod recovery;

pub use recovery::RecoverySuggestion;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for spt operations
pub type SptResult<T> = Result<T, SptError>;

/// Main error type for spt
#[derive(Error, Debug, Diagnostic)]
pub enum SptError {
    // ─────────────────────────────────────────────────────────────────────────
    // Project Structure Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Stage '{stage}' depends on unknown stage '{dependency}'")]
    #[diagnostic(
        code(spt::unknown_dependency),
        help("Check that '{dependency}' is spelled exactly like the title of an existing stage")
    )]
    UnknownDependency { stage: String, dependency: String },

    #[error("Circular dependency detected between: {}", .stages.join(", "))]
    #[diagnostic(
        code(spt::circular_dependency),
        help("Review the depends_on entries of these stages to remove the cycle")
    )]
    CircularDependency { stages: Vec<String> },

    #[error("Stage '{stage}' depends on '{ancestor}', which contains it")]
    #[diagnostic(
        code(spt::depends_on_ancestor),
        help("A group only completes after its children, so a child cannot wait for it")
    )]
    DependsOnAncestor { stage: String, ancestor: String },

    #[error("Parallel stage '{stage}' has no parent stage to join into")]
    #[diagnostic(code(spt::orphan_parallel_stage))]
    OrphanParallelStage { stage: String },

    #[error("Stage title '{title}' is used more than once")]
    #[diagnostic(
        code(spt::duplicate_title),
        help("Titles identify stages; rename one of the '{title}' stages")
    )]
    DuplicateTitle { title: String },

    #[error("Stage '{stage}' is invalid: {reason}")]
    #[diagnostic(code(spt::invalid_stage))]
    InvalidStage { stage: String, reason: String },

    #[error("Stage '{stage}' not found in project")]
    #[diagnostic(code(spt::stage_not_found))]
    StageNotFound { stage: String },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Project file not found: {path}")]
    #[diagnostic(
        code(spt::project_not_found),
        help("Pass the path of your project file, e.g. 'spt diagram plan.yaml'")
    )]
    ProjectNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(spt::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(spt::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    #[error("Unsupported project file format: {path}")]
    #[diagnostic(
        code(spt::unsupported_format),
        help("Supported extensions: .yaml, .yml, .json, .toml")
    )]
    UnsupportedFormat { path: PathBuf },

    // ─────────────────────────────────────────────────────────────────────────
    // Formatter Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Formatter '{tool}' failed:\n{stderr}")]
    #[diagnostic(
        code(spt::formatter_failed),
        help("Fix or remove '{tool}', or rerun with --no-format")
    )]
    FormatterFailed { tool: String, stderr: String },

    #[error("Formatter '{tool}' did not finish within {seconds}s")]
    #[diagnostic(
        code(spt::formatter_timed_out),
        help("Raise --format-timeout or rerun with --no-format")
    )]
    FormatterTimedOut { tool: String, seconds: u64 },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/Parsing Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(spt::io_error))]
    Io { message: String },

    #[error("YAML error: {message}")]
    #[diagnostic(code(spt::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(spt::json_error))]
    Json { message: String },

    #[error("TOML error: {message}")]
    #[diagnostic(code(spt::toml_error))]
    Toml { message: String },
}

impl From<std::io::Error> for SptError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for SptError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for SptError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for SptError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl From<toml::ser::Error> for SptError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl SptError {
    /// Whether the error describes a problem in the stage tree itself
    /// (as opposed to IO, parsing or the external formatter).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnknownDependency { .. }
                | Self::CircularDependency { .. }
                | Self::DependsOnAncestor { .. }
                | Self::OrphanParallelStage { .. }
                | Self::DuplicateTitle { .. }
                | Self::InvalidStage { .. }
                | Self::StageNotFound { .. }
        )
    }

    /// Recovery steps for this error, if there is something concrete to suggest
    pub fn recovery(&self) -> Option<RecoverySuggestion> {
        match self {
            Self::CircularDependency { stages } => {
                Some(RecoverySuggestion::fix_circular_dependency(stages))
            }
            Self::UnknownDependency { stage, dependency } => {
                Some(RecoverySuggestion::fix_unknown_dependency(stage, dependency))
            }
            Self::DuplicateTitle { title } => Some(RecoverySuggestion::fix_duplicate_title(title)),
            Self::DependsOnAncestor { stage, ancestor } => {
                Some(RecoverySuggestion::fix_ancestor_dependency(stage, ancestor))
            }
            Self::FormatterFailed { tool, .. } | Self::FormatterTimedOut { tool, .. } => {
                Some(RecoverySuggestion::skip_formatter(tool))
            }
            _ => None,
        }
    }
}
