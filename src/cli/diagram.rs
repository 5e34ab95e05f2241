// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Diagram command - render the project as a Mermaid flowchart

use miette::Result;
use std::path::PathBuf;

use super::{load_project, write_output};
use crate::project::sequence;
use crate::render::render;

/// Run the diagram command
pub async fn run(
    project_path: PathBuf,
    complete_is_tree: bool,
    output: Option<PathBuf>,
    _verbose: bool,
) -> Result<()> {
    let (_, graph) = load_project(&project_path, complete_is_tree)?;

    let ordered = sequence(&graph)?;
    let diagram = render(&ordered, &graph)?;

    write_output(output.as_deref(), &diagram)
}
