// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! # spt - Stage dependency planner
//!
//! `spt` models a project as a tree of stages, works out the order they
//! should be done in and renders the result.
//!
//! ## Features
//!
//! - **Dependency graph** - sequential chains, parallel joins and explicit `depends_on`
//! - **Propagation** - completion and priority flow to the stages work depends on
//! - **Deterministic ordering** - priority first, then groups, then declaration order
//! - **Mermaid diagrams** - nested subgraphs with stable identifiers
//! - **Work orders** - numbered report, optionally only what is left
//!
//! ## Quick Start
//!
//! ```bash
//! # Draw the project
//! spt diagram project.yaml > project.mmd
//!
//! # What is left to do, in order
//! spt order -c -i
//!
//! # Persist completion implied by completed stages
//! spt update -o project.yaml
//! ```
//!
//! ## Library use
//!
//! ```
//! use spt::{propagate, render, report, sequence, Stage, StageGraph};
//!
//! let project = Stage::new("Ship")
//!     .with_stage(Stage::new("Build"))
//!     .with_stage(Stage::new("Test"));
//!
//! let mut graph = StageGraph::build(&project)?;
//! propagate(&mut graph, false)?;
//! let ordered = sequence(&graph)?;
//!
//! assert_eq!(ordered, vec!["Build", "Test", "Ship"]);
//! assert!(render(&ordered, &graph)?.starts_with("flowchart BT"));
//! assert_eq!(report(&ordered, &graph, false)?.total, 3);
//! # Ok::<(), spt::SptError>(())
//! ```

pub mod cli;
pub mod errors;
pub mod formatter;
pub mod project;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use errors::{SptError, SptResult};
pub use project::{propagate, sequence, ProjectFormat, Stage, StageGraph};
pub use render::{render, report, WorkOrder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
