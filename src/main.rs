// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! spt - Stage dependency planner
//!
//! Orders the stages of a project and renders them as a Mermaid flowchart or
//! a work-order report.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spt::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let default_filter = if cli.verbose { "spt=debug" } else { "spt=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if !spt::utils::should_use_colors() {
        colored::control::set_override(false);
    }

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Diagram {
            project,
            complete_is_tree,
            output,
        } => spt::cli::diagram::run(project, complete_is_tree, output, cli.verbose).await,
        Commands::Order {
            project,
            complete_is_tree,
            incomplete_only,
            format,
            output,
        } => {
            spt::cli::order::run(
                project,
                complete_is_tree,
                incomplete_only,
                format,
                output,
                cli.verbose,
            )
            .await
        }
        Commands::Update {
            project,
            no_format,
            formatter,
            format_timeout,
            output,
        } => {
            spt::cli::update::run(
                project,
                no_format,
                formatter,
                format_timeout,
                output,
                cli.verbose,
            )
            .await
        }
        Commands::Validate { project } => spt::cli::validate::run(project, cli.verbose).await,
    }
}
