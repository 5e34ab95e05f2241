// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Project definition structures
//!
//! Defines the schema for project files. The root stage is the project
//! itself; every other stage hangs below it through `stages` (sequential) or
//! `parallel_stages` children.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{SptError, SptResult};

/// A unit of work, either a leaf or a group of child stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stage {
    /// Stage title (must be unique within the project)
    pub title: String,

    /// Titles of stages that must finish before this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Purely presentational marker
    #[serde(default, skip_serializing_if = "is_false")]
    pub milestone: bool,

    /// Whether the stage is done
    #[serde(default, skip_serializing_if = "is_false")]
    pub complete: bool,

    /// Higher values are worked on first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// Children that run strictly one after another
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<Stage>,

    /// Children with no ordering among themselves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parallel_stages: Vec<Stage>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Stage {
    /// Create a leaf stage with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            depends_on: Vec::new(),
            milestone: false,
            complete: false,
            priority: None,
            stages: Vec::new(),
            parallel_stages: Vec::new(),
        }
    }

    /// Add a dependency on another stage
    pub fn depends_on(mut self, title: impl Into<String>) -> Self {
        self.depends_on.push(title.into());
        self
    }

    /// Append a sequential child
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Append a parallel child
    pub fn with_parallel_stage(mut self, stage: Stage) -> Self {
        self.parallel_stages.push(stage);
        self
    }

    /// Mark the stage as a milestone
    pub fn milestone(mut self) -> Self {
        self.milestone = true;
        self
    }

    /// Mark the stage as complete
    pub fn complete(mut self) -> Self {
        self.complete = true;
        self
    }

    /// Set an explicit priority
    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// A leaf has neither sequential nor parallel children
    pub fn is_leaf(&self) -> bool {
        self.stages.is_empty() && self.parallel_stages.is_empty()
    }

    /// Pre-order walk over this stage and all of its descendants,
    /// sequential children before parallel ones
    pub fn walk(&self) -> Vec<&Stage> {
        let mut out = Vec::new();
        let mut stack = vec![self];

        while let Some(stage) = stack.pop() {
            out.push(stage);
            for child in stage.parallel_stages.iter().rev() {
                stack.push(child);
            }
            for child in stage.stages.iter().rev() {
                stack.push(child);
            }
        }

        out
    }

    /// Load a project from a file, picking the format from its extension
    pub fn from_file(path: &Path) -> SptResult<Self> {
        if !path.exists() {
            return Err(SptError::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }

        let format = ProjectFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SptError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_str_with(&content, format)
    }

    /// Parse a project from a string in the given format
    pub fn from_str_with(content: &str, format: ProjectFormat) -> SptResult<Self> {
        match format {
            ProjectFormat::Yaml => Self::from_yaml(content),
            ProjectFormat::Json => serde_json::from_str(content).map_err(Into::into),
            ProjectFormat::Toml => toml::from_str(content).map_err(Into::into),
        }
    }

    /// Parse a project from YAML
    pub fn from_yaml(yaml: &str) -> SptResult<Self> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Serialize the project in the given format
    pub fn to_string_with(&self, format: ProjectFormat) -> SptResult<String> {
        match format {
            ProjectFormat::Yaml => self.to_yaml(),
            ProjectFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)?;
                json.push('\n');
                Ok(json)
            }
            ProjectFormat::Toml => toml::to_string_pretty(self).map_err(Into::into),
        }
    }

    /// Serialize the project to YAML
    pub fn to_yaml(&self) -> SptResult<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }
}

/// On-disk format of a project file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Yaml,
    Json,
    Toml,
}

impl ProjectFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> SptResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(SptError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl std::fmt::Display for ProjectFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
            Self::Toml => write!(f, "toml"),
        }
    }
}
