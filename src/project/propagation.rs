// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Completion and priority propagation
//!
//! Information flows from a stage to the stages it depends on. Dependents are
//! visited before their dependencies, so one pass over the graph is enough.

use petgraph::algo::toposort;
use petgraph::Direction;
use tracing::debug;

use crate::errors::{SptError, SptResult};
use crate::project::StageGraph;

/// What a propagation pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationSummary {
    /// Stages that became complete
    pub completed: usize,
    /// Stages whose effective priority was raised
    pub raised: usize,
}

/// Push completion (tree mode only) and priority upstream
///
/// With `tree_completion`, a stage is complete once anything that depends on
/// it is complete. Independently of the mode, a stage's effective priority is
/// the highest of its own and that of every stage depending on it; a missing
/// priority ranks below any explicit one.
pub fn propagate(graph: &mut StageGraph, tree_completion: bool) -> SptResult<PropagationSummary> {
    let order = toposort(graph.inner(), None).map_err(|cycle| SptError::CircularDependency {
        stages: graph.cycle_members(cycle.node_id()),
    })?;

    let mut summary = PropagationSummary::default();
    let inner = graph.inner_mut();

    for &node in order.iter().rev() {
        let mut complete = inner[node].complete;
        let mut priority = inner[node].priority;

        for dependent in inner.neighbors_directed(node, Direction::Outgoing) {
            let entry = &inner[dependent];
            complete |= tree_completion && entry.complete;
            priority = priority.max(entry.priority);
        }

        let entry = &mut inner[node];
        if complete && !entry.complete {
            entry.complete = true;
            summary.completed += 1;
        }
        if priority != entry.priority {
            entry.priority = priority;
            summary.raised += 1;
        }
    }

    debug!(
        tree_completion,
        completed = summary.completed,
        raised = summary.raised,
        "propagated stage state"
    );

    Ok(summary)
}
