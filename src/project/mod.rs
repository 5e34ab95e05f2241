// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Project model and dependency graph engine
//!
//! A project is a tree of stages. It is compiled into a [`StageGraph`],
//! completion and priority are pushed along its edges by [`propagate`], and
//! [`sequence`] turns it into a work order.

mod definition;
pub(crate) mod graph;
mod propagation;
mod sequencer;
mod validation;

pub use definition::{ProjectFormat, Stage};
pub use graph::{StageGraph, StageKind, StageNode};
pub use propagation::{propagate, PropagationSummary};
pub use sequencer::sequence;
pub use validation::{ProjectValidator, ValidationResult};
