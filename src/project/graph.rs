// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Stage dependency graph
//!
//! Compiles the stage tree into a directed graph. An edge `A -> B` means
//! "A must be done before B". Edges come from three places:
//!
//! - `depends_on` entries (`dependency -> stage`)
//! - sequential children (`child[i] -> child[i + 1]` and `last child -> parent`)
//! - parallel children (`child -> parent` for every child)
//!
//! The structural parent of each stage is kept as a title in its node entry
//! rather than as a reference into the tree.

use petgraph::algo::{has_path_connecting, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::errors::{SptError, SptResult};
use crate::project::Stage;

/// Coarse classification of a stage
///
/// Declaration order matters: groups sort before leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Group,
    Leaf,
}

/// Lookup entry for one stage
#[derive(Debug, Clone)]
pub struct StageNode {
    /// Stage title (node identity)
    pub title: String,
    /// Title of the structural parent; `None` for the project root
    pub parent: Option<String>,
    pub kind: StageKind,
    pub milestone: bool,
    /// Completion, possibly set by propagation
    pub complete: bool,
    /// Priority as written in the project file
    pub explicit_priority: Option<i64>,
    /// Priority after propagation (starts as the explicit one)
    pub priority: Option<i64>,
    /// Pre-order position in the tree
    pub position: usize,
    /// Order of first mention, either as a declaration or as a `depends_on`
    /// target named before its own declaration
    pub mention: usize,
}

impl StageNode {
    pub fn is_leaf(&self) -> bool {
        self.kind == StageKind::Leaf
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Dependency graph over all stages of a project, plus a title lookup
#[derive(Debug, Clone)]
pub struct StageGraph {
    graph: DiGraph<StageNode, ()>,
    title_to_index: HashMap<String, NodeIndex>,
    root: NodeIndex,
}

impl StageGraph {
    /// Build the graph from the project root
    ///
    /// Fails on empty or duplicate titles, self dependencies, unknown
    /// dependencies, dependencies on an enclosing group, and cycles.
    pub fn build(root: &Stage) -> SptResult<Self> {
        let mut builder = Self {
            graph: DiGraph::new(),
            title_to_index: HashMap::new(),
            root: NodeIndex::new(0),
        };

        builder.register(root, None)?;
        let mut next = 0;
        builder.number_mentions(root, &mut next);
        builder.connect(root, None, false)?;
        builder.validate_acyclic()?;

        debug!(
            stages = builder.graph.node_count(),
            edges = builder.graph.edge_count(),
            "built stage graph"
        );

        Ok(builder)
    }

    /// Add a node for every stage, depth-first, before any edge exists
    fn register(&mut self, stage: &Stage, parent: Option<&str>) -> SptResult<()> {
        if stage.title.trim().is_empty() {
            let location = match parent {
                Some(parent) => format!("<untitled child of '{}'>", parent),
                None => "<project>".to_string(),
            };
            return Err(SptError::InvalidStage {
                stage: location,
                reason: "title is empty".into(),
            });
        }

        if self.title_to_index.contains_key(&stage.title) {
            return Err(SptError::DuplicateTitle {
                title: stage.title.clone(),
            });
        }

        let position = self.graph.node_count();
        let node = self.graph.add_node(StageNode {
            title: stage.title.clone(),
            parent: parent.map(String::from),
            kind: if stage.is_leaf() {
                StageKind::Leaf
            } else {
                StageKind::Group
            },
            milestone: stage.milestone,
            complete: stage.complete,
            explicit_priority: stage.priority,
            priority: stage.priority,
            position,
            mention: usize::MAX,
        });
        self.title_to_index.insert(stage.title.clone(), node);

        for child in &stage.stages {
            self.register(child, Some(&stage.title))?;
        }
        for child in &stage.parallel_stages {
            self.register(child, Some(&stage.title))?;
        }

        Ok(())
    }

    /// Number stages in the order the tree first names them: the stage, then
    /// any `depends_on` target not seen yet, then its children
    fn number_mentions(&mut self, stage: &Stage, next: &mut usize) {
        let titles = std::iter::once(&stage.title).chain(&stage.depends_on);
        for title in titles {
            let Some(&node) = self.title_to_index.get(title) else {
                continue;
            };
            let entry = &mut self.graph[node].mention;
            if *entry == usize::MAX {
                *entry = *next;
                *next += 1;
            }
        }

        for child in stage.stages.iter().chain(&stage.parallel_stages) {
            self.number_mentions(child, next);
        }
    }

    /// Add the edges contributed by `stage` and its descendants
    fn connect(&mut self, stage: &Stage, parent: Option<NodeIndex>, parallel: bool) -> SptResult<()> {
        let node = self.index(&stage.title)?;

        for dependency in &stage.depends_on {
            if dependency == &stage.title {
                return Err(SptError::InvalidStage {
                    stage: stage.title.clone(),
                    reason: "it depends on itself".into(),
                });
            }

            let dep_node = self.title_to_index.get(dependency).copied().ok_or_else(|| {
                SptError::UnknownDependency {
                    stage: stage.title.clone(),
                    dependency: dependency.clone(),
                }
            })?;

            if self.is_ancestor(dependency, &stage.title) {
                return Err(SptError::DependsOnAncestor {
                    stage: stage.title.clone(),
                    ancestor: dependency.clone(),
                });
            }

            self.graph.update_edge(dep_node, node, ());
        }

        let mut previous: Option<NodeIndex> = None;
        for child in &stage.stages {
            self.connect(child, Some(node), false)?;
            let child_node = self.index(&child.title)?;
            if let Some(prev) = previous {
                self.graph.update_edge(prev, child_node, ());
            }
            previous = Some(child_node);
        }
        if let Some(last) = previous {
            self.graph.update_edge(last, node, ());
        }

        for child in &stage.parallel_stages {
            self.connect(child, Some(node), true)?;
        }

        if parallel {
            let parent = parent.ok_or_else(|| SptError::OrphanParallelStage {
                stage: stage.title.clone(),
            })?;
            self.graph.update_edge(node, parent, ());
        }

        Ok(())
    }

    /// Whether `ancestor` structurally contains `title`
    fn is_ancestor(&self, ancestor: &str, title: &str) -> bool {
        let mut current = self.stage(title).and_then(|n| n.parent.as_deref());
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.stage(parent).and_then(|n| n.parent.as_deref());
        }
        false
    }

    /// Validate that the graph is acyclic
    fn validate_acyclic(&self) -> SptResult<()> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(SptError::CircularDependency {
                stages: self.cycle_members(cycle.node_id()),
            }),
        }
    }

    /// Titles of the strongly connected component containing `start`,
    /// in declaration order
    pub(crate) fn cycle_members(&self, start: NodeIndex) -> Vec<String> {
        let component = tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| scc.contains(&start))
            .unwrap_or_else(|| vec![start]);

        let mut nodes: Vec<&StageNode> = component.iter().map(|&n| &self.graph[n]).collect();
        nodes.sort_by_key(|n| n.position);
        nodes.into_iter().map(|n| n.title.clone()).collect()
    }

    fn index(&self, title: &str) -> SptResult<NodeIndex> {
        self.title_to_index
            .get(title)
            .copied()
            .ok_or_else(|| SptError::StageNotFound {
                stage: title.to_string(),
            })
    }

    /// Neighbours in the order their edges were added
    fn neighbors_in_order(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, direction)
            .map(|e| match direction {
                Direction::Outgoing => (e.id(), e.target()),
                Direction::Incoming => (e.id(), e.source()),
            })
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, n)| n).collect()
    }

    pub(crate) fn inner(&self) -> &DiGraph<StageNode, ()> {
        &self.graph
    }

    pub(crate) fn inner_mut(&mut self) -> &mut DiGraph<StageNode, ()> {
        &mut self.graph
    }

    pub(crate) fn node_index(&self, title: &str) -> Option<NodeIndex> {
        self.title_to_index.get(title).copied()
    }

    /// Number of stages, root included
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The project root
    pub fn root(&self) -> &StageNode {
        &self.graph[self.root]
    }

    /// Look up a stage by title
    pub fn stage(&self, title: &str) -> Option<&StageNode> {
        self.title_to_index.get(title).map(|&n| &self.graph[n])
    }

    /// Look up a stage by title, failing if it does not exist
    pub fn get(&self, title: &str) -> SptResult<&StageNode> {
        self.index(title).map(|n| &self.graph[n])
    }

    /// All stages in declaration order
    pub fn stages(&self) -> impl Iterator<Item = &StageNode> {
        self.graph.node_weights()
    }

    /// All edges as `(from, to)` titles, in the order they were added
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_references().map(move |e| {
            (
                self.graph[e.source()].title.as_str(),
                self.graph[e.target()].title.as_str(),
            )
        })
    }

    /// Stages that must be done before `title`
    pub fn dependencies(&self, title: &str) -> Option<Vec<&str>> {
        let node = self.node_index(title)?;
        Some(
            self.neighbors_in_order(node, Direction::Incoming)
                .into_iter()
                .map(|n| self.graph[n].title.as_str())
                .collect(),
        )
    }

    /// Stages waiting on `title`
    pub fn dependents(&self, title: &str) -> Option<Vec<&str>> {
        let node = self.node_index(title)?;
        Some(
            self.neighbors_in_order(node, Direction::Outgoing)
                .into_iter()
                .map(|n| self.graph[n].title.as_str())
                .collect(),
        )
    }

    /// Check if stage A depends (directly or transitively) on stage B
    pub fn depends_on(&self, stage_a: &str, stage_b: &str) -> bool {
        let (Some(node_a), Some(node_b)) = (self.node_index(stage_a), self.node_index(stage_b))
        else {
            return false;
        };

        node_a != node_b && has_path_connecting(&self.graph, node_b, node_a, None)
    }

    /// Copy completion flags from the graph back into a stage tree
    pub fn apply_completion(&self, stage: &mut Stage) {
        if let Some(node) = self.stage(&stage.title) {
            stage.complete = node.complete;
        }
        for child in stage.stages.iter_mut().chain(stage.parallel_stages.iter_mut()) {
            self.apply_completion(child);
        }
    }
}
