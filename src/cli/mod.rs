// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for spt.

pub mod diagram;
pub mod order;
pub mod update;
pub mod validate;

use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::SptError;
use crate::formatter::DEFAULT_FORMAT_TIMEOUT_SECS;
use crate::project::{propagate, Stage, StageGraph};

/// Project file used when none is given
pub const DEFAULT_PROJECT_FILE: &str = "project.yaml";

/// Stage dependency planner
///
/// Orders the stages of a project and renders them as a diagram or a work order.
#[derive(Parser, Debug)]
#[clap(
    name = "spt",
    version,
    about = "Stage dependency planner: order project stages, draw them, track completion",
    long_about = None,
    after_help = "Examples:\n\
        spt diagram                     Mermaid flowchart of project.yaml\n\
        spt order -c -i                 Remaining work, in order\n\
        spt update -o project.yaml      Persist completion implied by completed stages\n\
        spt validate plan.yaml          List every problem in plan.yaml\n\n\
        See 'spt <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the project as a Mermaid flowchart
    Diagram {
        /// Project file (.yaml, .yml, .json or .toml)
        #[clap(default_value = DEFAULT_PROJECT_FILE)]
        project: PathBuf,

        /// Treat everything a complete stage depends on as complete
        #[clap(short = 'c', long)]
        complete_is_tree: bool,

        /// Write to a file instead of stdout
        #[clap(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the suggested order of work
    Order {
        /// Project file (.yaml, .yml, .json or .toml)
        #[clap(default_value = DEFAULT_PROJECT_FILE)]
        project: PathBuf,

        /// Treat everything a complete stage depends on as complete
        #[clap(short = 'c', long)]
        complete_is_tree: bool,

        /// Leave out complete stages
        #[clap(short = 'i', long)]
        incomplete_only: bool,

        /// Output format
        #[clap(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[clap(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Re-emit the project with implied completion filled in
    Update {
        /// Project file (.yaml, .yml, .json or .toml)
        #[clap(default_value = DEFAULT_PROJECT_FILE)]
        project: PathBuf,

        /// Do not run an external formatter on the output
        #[clap(long)]
        no_format: bool,

        /// Prettier executable (default: looked up on PATH)
        #[clap(long, env = "SPT_FORMATTER", value_name = "PATH")]
        formatter: Option<PathBuf>,

        /// Seconds to wait for the formatter
        #[clap(
            long,
            env = "SPT_FORMAT_TIMEOUT",
            value_name = "SECS",
            default_value_t = DEFAULT_FORMAT_TIMEOUT_SECS,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        format_timeout: u64,

        /// Write to a file instead of stdout
        #[clap(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Check the project and report every problem found
    Validate {
        /// Project file (.yaml, .yml, .json or .toml)
        #[clap(default_value = DEFAULT_PROJECT_FILE)]
        project: PathBuf,
    },
}

/// Output format for the order command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Load a project, build its graph and propagate completion and priority
pub(crate) fn load_project(path: &Path, complete_is_tree: bool) -> Result<(Stage, StageGraph)> {
    let project = Stage::from_file(path)?;
    let mut graph = StageGraph::build(&project)?;
    let summary = propagate(&mut graph, complete_is_tree)?;

    info!(
        project = %project.title,
        stages = graph.len(),
        completed = summary.completed,
        raised = summary.raised,
        "loaded {}",
        path.display()
    );

    Ok((project, graph))
}

/// Print `text` or write it to `output`
pub(crate) fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| SptError::FileWriteError {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
            info!("wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["spt", "order"]);

        match cli.command {
            Commands::Order {
                project,
                complete_is_tree,
                incomplete_only,
                format,
                output,
            } => {
                assert_eq!(project, PathBuf::from(DEFAULT_PROJECT_FILE));
                assert!(!complete_is_tree);
                assert!(!incomplete_only);
                assert_eq!(format, OutputFormat::Text);
                assert!(output.is_none());
            }
            other => panic!("expected order, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["spt", "diagram", "plan.yaml", "-c", "-v", "-C", "/tmp"]);

        assert!(cli.verbose);
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp")));
        assert!(matches!(
            cli.command,
            Commands::Diagram { complete_is_tree: true, .. }
        ));
    }

    #[test]
    fn test_json_format_flag() {
        let cli = Cli::parse_from(["spt", "order", "-f", "json"]);
        assert!(matches!(
            cli.command,
            Commands::Order { format: OutputFormat::Json, .. }
        ));
    }

    #[test]
    fn test_zero_format_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["spt", "update", "--format-timeout", "0"]).is_err());

        let cli = Cli::parse_from(["spt", "update", "--format-timeout", "5"]);
        assert!(matches!(
            cli.command,
            Commands::Update { format_timeout: 5, .. }
        ));
    }

    #[test]
    fn test_incomplete_only_is_not_a_diagram_flag() {
        let result = Cli::try_parse_from(["spt", "diagram", "-i"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mmd");

        write_output(Some(&path), "flowchart BT\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "flowchart BT\n");
    }
}
