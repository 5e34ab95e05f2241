// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Error recovery suggestions
//!
//! Provides actionable suggestions for recovering from errors.

/// A recovery suggestion with concrete steps
#[derive(Debug, Clone)]
pub struct RecoverySuggestion {
    /// Brief description of what to do
    pub action: String,
    /// Detailed steps
    pub steps: Vec<String>,
    /// Commands to run
    pub commands: Vec<String>,
}

impl RecoverySuggestion {
    /// Suggest fixing a circular dependency
    pub fn fix_circular_dependency(stages: &[String]) -> Self {
        Self {
            action: "Remove circular dependency".into(),
            steps: vec![
                format!("Stages in the cycle: {}", stages.join(", ")),
                "Every edge comes from a depends_on entry, a sequential chain, or a child joining its parent".into(),
                "Drop the depends_on entry that points back into the cycle".into(),
            ],
            commands: vec![
                "# List every problem in the project:".into(),
                "spt validate".into(),
            ],
        }
    }

    /// Suggest fixing a reference to a stage that does not exist
    pub fn fix_unknown_dependency(stage: &str, dependency: &str) -> Self {
        Self {
            action: format!("Fix depends_on of '{}'", stage),
            steps: vec![
                format!("No stage is titled '{}'", dependency),
                "Titles are matched exactly, including case and spacing".into(),
                "Either add the missing stage or correct the reference".into(),
            ],
            commands: vec![],
        }
    }

    /// Suggest renaming a duplicated title
    pub fn fix_duplicate_title(title: &str) -> Self {
        Self {
            action: format!("Rename one of the '{}' stages", title),
            steps: vec![
                "Stage titles must be unique across the whole project".into(),
                "depends_on entries refer to stages by title, so update them after renaming".into(),
            ],
            commands: vec![],
        }
    }

    /// Suggest removing a dependency on an enclosing group
    pub fn fix_ancestor_dependency(stage: &str, ancestor: &str) -> Self {
        Self {
            action: format!("Remove '{}' from the depends_on of '{}'", ancestor, stage),
            steps: vec![
                format!("'{}' is only reached once all of its children are done", ancestor),
                format!("'{}' is one of those children, so it can never start", stage),
                "Depend on a sibling or an earlier stage instead".into(),
            ],
            commands: vec![],
        }
    }

    /// Suggest bypassing the external formatter
    pub fn skip_formatter(tool: &str) -> Self {
        Self {
            action: format!("Bypass '{}'", tool),
            steps: vec![
                format!("The project was not written because '{}' failed", tool),
                "The unformatted output is still valid".into(),
            ],
            commands: vec![
                "# Write the project without formatting:".into(),
                "spt update --no-format".into(),
            ],
        }
    }
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "→ {}", self.action)?;

        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }

        if !self.commands.is_empty() {
            writeln!(f)?;
            for cmd in &self.commands {
                writeln!(f, "  {}", cmd)?;
            }
        }

        Ok(())
    }
}
