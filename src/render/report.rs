// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Work-order report

use serde::Serialize;
use std::fmt;

use crate::errors::SptResult;
use crate::project::{StageGraph, StageKind};

pub const REPORT_TITLE: &str = "# Suggested order of work";
pub const COMPLETE_MARKER: &str = "✅";

/// What a report line stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Leaf,
    Group,
    Project,
}

/// One numbered line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkOrderEntry {
    pub number: usize,
    pub title: String,
    pub kind: EntryKind,
    pub milestone: bool,
    pub complete: bool,
}

/// Numbered list of stages in the order they should be worked on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkOrder {
    pub entries: Vec<WorkOrderEntry>,
    pub total: usize,
}

/// Build the work order from the sequenced titles
///
/// The project root is moved to the end wherever the sequence put it. With
/// `incomplete_only`, complete stages are left out and do not use up a
/// number.
pub fn report(ordered: &[String], graph: &StageGraph, incomplete_only: bool) -> SptResult<WorkOrder> {
    let root = graph.root();
    let mut entries = Vec::new();

    let stages = ordered
        .iter()
        .filter(|title| **title != root.title)
        .chain(std::iter::once(&root.title));

    for title in stages {
        let stage = graph.get(title)?;
        if incomplete_only && stage.complete {
            continue;
        }

        let kind = if stage.is_root() {
            EntryKind::Project
        } else if stage.kind == StageKind::Group {
            EntryKind::Group
        } else {
            EntryKind::Leaf
        };

        entries.push(WorkOrderEntry {
            number: entries.len() + 1,
            title: stage.title.clone(),
            kind,
            milestone: stage.milestone && kind != EntryKind::Project,
            complete: stage.complete,
        });
    }

    Ok(WorkOrder {
        total: entries.len(),
        entries,
    })
}

impl WorkOrderEntry {
    /// Qualifiers after the title, e.g. ` (group) (milestone) ✅`
    pub fn suffix(&self) -> String {
        let mut suffix = String::new();
        match self.kind {
            EntryKind::Group => suffix.push_str(" (group)"),
            EntryKind::Project => suffix.push_str(" (project)"),
            EntryKind::Leaf => {}
        }
        if self.milestone {
            suffix.push_str(" (milestone)");
        }
        if self.complete {
            suffix.push(' ');
            suffix.push_str(COMPLETE_MARKER);
        }
        suffix
    }
}

impl fmt::Display for WorkOrderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}{}", self.number, self.title, self.suffix())
    }
}

impl WorkOrder {
    /// Plain-text form of the report
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(REPORT_TITLE);
        out.push_str("\n\n");
        for entry in &self.entries {
            out.push_str(&format!("{}\n", entry));
        }
        out.push_str(&format!("\nTotal stages: {}\n", self.total));
        out
    }

    /// JSON form of the report
    pub fn to_json(&self) -> SptResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
