// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Project validation
//!
//! Unlike [`StageGraph::build`], which stops at the first problem, the
//! validator walks the whole tree and reports everything it finds.

use std::collections::HashSet;
use tracing::warn;

use crate::errors::SptError;
use crate::project::{Stage, StageGraph};

/// Project validator
pub struct ProjectValidator;

impl ProjectValidator {
    /// Validate a project tree
    pub fn validate(root: &Stage) -> ValidationResult {
        let mut result = ValidationResult::new();

        let mut seen = HashSet::new();
        for stage in root.walk() {
            if stage.title.trim().is_empty() {
                result.add_error(SptError::InvalidStage {
                    stage: "<untitled>".into(),
                    reason: "title is empty".into(),
                });
                continue;
            }
            if !seen.insert(stage.title.as_str()) {
                result.add_error(SptError::DuplicateTitle {
                    title: stage.title.clone(),
                });
            }
            if stage.title.contains('"') {
                result.add_warning(&format!(
                    "Stage '{}': title contains a double quote, which diagrams show as #quot;",
                    stage.title
                ));
            }
        }

        let mut ancestors = Vec::new();
        Self::validate_stage(root, None, &mut ancestors, &seen, &mut result);

        // Cycles can only be seen on the assembled graph
        if result.is_valid() {
            if let Err(e) = StageGraph::build(root) {
                result.add_error(e);
            }
        }

        for warning in &result.warnings {
            warn!("{}", warning);
        }

        result
    }

    /// Check the `depends_on` entries of a stage, then its children
    fn validate_stage<'a>(
        stage: &'a Stage,
        previous_sibling: Option<&str>,
        ancestors: &mut Vec<&'a str>,
        titles: &HashSet<&str>,
        result: &mut ValidationResult,
    ) {
        let mut listed = HashSet::new();

        for dependency in &stage.depends_on {
            if !listed.insert(dependency.as_str()) {
                result.add_warning(&format!(
                    "Stage '{}': '{}' is listed more than once in depends_on",
                    stage.title, dependency
                ));
                continue;
            }

            if dependency == &stage.title {
                result.add_error(SptError::InvalidStage {
                    stage: stage.title.clone(),
                    reason: "it depends on itself".into(),
                });
            } else if !titles.contains(dependency.as_str()) {
                result.add_error(SptError::UnknownDependency {
                    stage: stage.title.clone(),
                    dependency: dependency.clone(),
                });
            } else if ancestors.contains(&dependency.as_str()) {
                result.add_error(SptError::DependsOnAncestor {
                    stage: stage.title.clone(),
                    ancestor: dependency.clone(),
                });
            } else if previous_sibling == Some(dependency.as_str()) {
                result.add_warning(&format!(
                    "Stage '{}': depends_on '{}' is redundant, it already comes right before",
                    stage.title, dependency
                ));
            }
        }

        ancestors.push(&stage.title);

        let mut previous = None;
        for child in &stage.stages {
            Self::validate_stage(child, previous, ancestors, titles, result);
            previous = Some(child.title.as_str());
        }
        for child in &stage.parallel_stages {
            Self::validate_stage(child, None, ancestors, titles, result);
        }

        ancestors.pop();
    }
}

/// Result of project validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<SptError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: SptError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::graph::tests::ship_project;

    #[test]
    fn test_valid_project() {
        let result = ProjectValidator::validate(&ship_project());

        assert!(result.is_valid());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_collects_every_error() {
        let project = Stage::new("P")
            .with_stage(Stage::new("A").depends_on("missing"))
            .with_stage(Stage::new("A"))
            .with_parallel_stage(Stage::new("B").depends_on("B"))
            .with_parallel_stage(Stage::new(""));

        let result = ProjectValidator::validate(&project);

        assert_eq!(result.errors.len(), 4);
        assert!(result
            .errors
            .iter()
            .any(|e| matches!(e, SptError::DuplicateTitle { title } if title == "A")));
        assert!(result
            .errors
            .iter()
            .any(|e| matches!(e, SptError::UnknownDependency { dependency, .. } if dependency == "missing")));
        assert_eq!(
            result
                .errors
                .iter()
                .filter(|e| matches!(e, SptError::InvalidStage { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_ancestor_dependency() {
        let project = Stage::new("P").with_stage(
            Stage::new("G").with_stage(Stage::new("Inner").depends_on("G")),
        );

        let result = ProjectValidator::validate(&project);

        assert!(matches!(
            result.errors.as_slice(),
            [SptError::DependsOnAncestor { stage, ancestor }] if stage == "Inner" && ancestor == "G"
        ));
    }

    #[test]
    fn test_cycle_is_reported() {
        let project = Stage::new("P")
            .with_parallel_stage(Stage::new("A").depends_on("B"))
            .with_parallel_stage(Stage::new("B").depends_on("A"));

        let result = ProjectValidator::validate(&project);

        assert!(matches!(
            result.errors.as_slice(),
            [SptError::CircularDependency { stages }] if stages == &vec!["A".to_string(), "B".to_string()]
        ));
    }

    #[test]
    fn test_redundant_sibling_dependency_warns() {
        let project = Stage::new("P")
            .with_stage(Stage::new("A"))
            .with_stage(Stage::new("B").depends_on("A"));

        let result = ProjectValidator::validate(&project);

        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.contains("redundant")));
    }

    #[test]
    fn test_repeated_dependency_warns() {
        let project = Stage::new("P")
            .with_parallel_stage(Stage::new("A"))
            .with_parallel_stage(Stage::new("B").depends_on("A").depends_on("A"));

        let result = ProjectValidator::validate(&project);

        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("more than once"));
    }

    #[test]
    fn test_quoted_title_warns() {
        let project = Stage::new("P").with_stage(Stage::new("Say \"hi\""));

        let result = ProjectValidator::validate(&project);

        assert!(result.is_valid());
        assert!(result.warnings[0].contains("#quot;"));
    }
}
