// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Order command - print the suggested order of work

use miette::Result;
use std::path::PathBuf;

use super::{load_project, write_output, OutputFormat};
use crate::project::sequence;
use crate::render::report;
use crate::utils::paint_work_order;

/// Run the order command
pub async fn run(
    project_path: PathBuf,
    complete_is_tree: bool,
    incomplete_only: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
    _verbose: bool,
) -> Result<()> {
    let (_, graph) = load_project(&project_path, complete_is_tree)?;

    let ordered = sequence(&graph)?;
    let work_order = report(&ordered, &graph, incomplete_only)?;

    let text = match (format, &output) {
        (OutputFormat::Json, _) => work_order.to_json()?,
        // Files never get escape codes
        (OutputFormat::Text, Some(_)) => work_order.to_text(),
        (OutputFormat::Text, None) => paint_work_order(&work_order),
    };

    write_output(output.as_deref(), &text)
}
