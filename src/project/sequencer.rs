// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Priority-ordered topological sort

use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::debug;

use crate::errors::{SptError, SptResult};
use crate::project::{StageGraph, StageKind, StageNode};

/// Ordering key among stages that are ready at the same time
///
/// Compared field by field: higher priority first (none ranks last), groups
/// before leaves, then the order in which the tree first names the stage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ReadyKey<'a> {
    priority: Reverse<Option<i64>>,
    kind: StageKind,
    mention: usize,
    title: &'a str,
}

impl<'a> ReadyKey<'a> {
    fn of(stage: &'a StageNode) -> Self {
        Self {
            priority: Reverse(stage.priority),
            kind: stage.kind,
            mention: stage.mention,
            title: &stage.title,
        }
    }
}

/// Order every stage so that each edge `A -> B` puts A before B
///
/// Among the stages whose dependencies are all placed, the one with the
/// smallest [`ReadyKey`] goes next. Identical graphs always yield identical
/// orders.
pub fn sequence(graph: &StageGraph) -> SptResult<Vec<String>> {
    let inner = graph.inner();

    let mut in_degree: Vec<usize> = inner
        .node_indices()
        .map(|n| inner.neighbors_directed(n, Direction::Incoming).count())
        .collect();

    let mut ready: BinaryHeap<Reverse<(ReadyKey<'_>, NodeIndex)>> = inner
        .node_indices()
        .filter(|n| in_degree[n.index()] == 0)
        .map(|n| Reverse((ReadyKey::of(&inner[n]), n)))
        .collect();

    let mut order = Vec::with_capacity(inner.node_count());

    while let Some(Reverse((_, node))) = ready.pop() {
        order.push(inner[node].title.clone());

        for dependent in inner.neighbors_directed(node, Direction::Outgoing) {
            let degree = &mut in_degree[dependent.index()];
            *degree -= 1;
            if *degree == 0 {
                ready.push(Reverse((ReadyKey::of(&inner[dependent]), dependent)));
            }
        }
    }

    if order.len() < inner.node_count() {
        let stuck = inner
            .node_indices()
            .find(|n| in_degree[n.index()] > 0)
            .ok_or_else(|| SptError::CircularDependency { stages: Vec::new() })?;
        return Err(SptError::CircularDependency {
            stages: graph.cycle_members(stuck),
        });
    }

    debug!(stages = order.len(), "sequenced stages");

    Ok(order)
}
