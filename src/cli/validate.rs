// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Validate command - check the project file

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::project::{ProjectValidator, Stage};
use crate::utils::{print_error, print_success, print_warning};

/// Run the validate command
pub async fn run(project_path: PathBuf, verbose: bool) -> Result<()> {
    println!("{}", "Validating project...".bold());
    println!();

    // Load project
    let project = match Stage::from_file(&project_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  {} Failed to load project", "✗".red());
            eprintln!();
            return Err(e.into());
        }
    };

    print_success(&format!("{} parses", project_path.display()));

    let validation = ProjectValidator::validate(&project);

    if !validation.errors.is_empty() {
        println!();
        println!("{}:", "Errors".red().bold());
        for error in &validation.errors {
            print_error(&error.to_string());
            if let Some(recovery) = error.recovery() {
                for line in recovery.to_string().lines() {
                    println!("      {}", line.dimmed());
                }
            }
        }
    }

    if validation.has_warnings() {
        println!();
        println!("{}:", "Warnings".yellow().bold());
        for warning in &validation.warnings {
            print_warning(warning);
        }
    }

    if verbose {
        let stages = project.walk();
        let groups = stages.iter().filter(|s| !s.is_leaf()).count();
        println!();
        println!("{}:", "Project summary".bold());
        println!("  Title: {}", project.title);
        println!("  Stages: {} ({} groups, {} leaves)", stages.len(), groups, stages.len() - groups);
        println!(
            "  Complete: {}",
            stages.iter().filter(|s| s.complete).count()
        );
    }

    println!();

    if !validation.is_valid() {
        return Err(miette::miette!(
            "Project validation failed with {} error(s)",
            validation.errors.len()
        ));
    }

    if validation.has_warnings() {
        println!("{}", "Project is valid but has warnings.".yellow().bold());
    } else {
        println!("{}", "Project is valid!".green().bold());
    }
    Ok(())
}
