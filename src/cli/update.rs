// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Update command - re-emit the project with implied completion filled in

use miette::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use super::write_output;
use crate::formatter::{Formatter, PrettierFormatter};
use crate::project::{propagate, ProjectFormat, Stage, StageGraph};
use crate::utils::interactive_spinner;

/// Run the update command
///
/// Completion always propagates in tree mode here, since persisting it is
/// the point of the command. Only completion is written back; priorities
/// keep the values they were authored with.
pub async fn run(
    project_path: PathBuf,
    no_format: bool,
    formatter: Option<PathBuf>,
    format_timeout: u64,
    output: Option<PathBuf>,
    _verbose: bool,
) -> Result<()> {
    let format = ProjectFormat::from_path(&project_path)?;
    let mut project = Stage::from_file(&project_path)?;

    let mut graph = StageGraph::build(&project)?;
    let summary = propagate(&mut graph, true)?;
    graph.apply_completion(&mut project);
    info!(completed = summary.completed, "propagated completion");

    let mut text = project.to_string_with(format)?;

    if no_format {
        debug!("formatting disabled");
    } else {
        let formatter = match formatter {
            Some(path) => Some(PrettierFormatter::new(path)),
            None => PrettierFormatter::detect(),
        };

        if let Some(formatter) = formatter {
            let formatter = formatter.with_timeout(Duration::from_secs(format_timeout));
            let spinner = interactive_spinner(&format!("Formatting with {}", formatter.name()));

            let result = formatter.format(&text, format).await;
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            text = result?;
        }
    }

    write_output(output.as_deref(), &text)
}
