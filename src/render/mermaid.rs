// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Mermaid flowchart output
//!
//! Groups become nested `subgraph` blocks with a head marker, leaves become
//! markers inside the block of their parent group. Identifiers are derived
//! from the order of work, never from titles, so they need no sanitizing:
//!
//! - every group gets a letter namespace (`A`, `B`, ..., `Z`, `AA`, ...) and
//!   a container id `Group_<n>` whose head marker is `Group_<n>_head`
//! - leaves are numbered inside the namespace of their parent (`A1`, `A2`)
//! - the project root is always `Project`

use std::collections::HashMap;
use tracing::debug;

use crate::errors::{SptError, SptResult};
use crate::project::{StageGraph, StageNode};

const INDENT: &str = "    ";
const STROKE: &str = "stroke:#333,stroke-width:2px,color:#fff";
const PROJECT_ID: &str = "Project";

const PROJECT_FILL: &str = "#AC36BC";
const MILESTONE_FILL: &str = "#7444EE";
const LEAF_FILL: &str = "#047D08";
const GROUP_FILL: &str = "#327E96";

/// Bijective base-26 label: 1 -> A, 26 -> Z, 27 -> AA
pub fn alpha_label(mut n: usize) -> String {
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// Hands out namespace letters and container ids for one render
#[derive(Debug, Default)]
struct IdAllocator {
    labels: usize,
    groups: usize,
}

impl IdAllocator {
    fn next_namespace(&mut self) -> Namespace {
        self.labels += 1;
        Namespace {
            prefix: alpha_label(self.labels),
            next: 0,
        }
    }

    fn next_group(&mut self) -> String {
        self.groups += 1;
        format!("Group_{}", self.groups)
    }
}

/// Leaf numbering inside one letter namespace
#[derive(Debug)]
struct Namespace {
    prefix: String,
    next: usize,
}

impl Namespace {
    fn next_ref(&mut self) -> String {
        self.next += 1;
        format!("{}{}", self.prefix, self.next)
    }
}

/// A group stage and what ends up inside its subgraph
#[derive(Debug)]
struct Container<'a> {
    stage: &'a StageNode,
    head: String,
    namespace: Namespace,
    groups: Vec<usize>,
    leaves: Vec<&'a StageNode>,
}

struct MermaidRenderer<'a> {
    graph: &'a StageGraph,
    ids: IdAllocator,
    containers: Vec<Container<'a>>,
    container_of: HashMap<&'a str, usize>,
    top_level: Vec<usize>,
    stages: Vec<&'a StageNode>,
    leaves: Vec<&'a StageNode>,
    root_leaves: Vec<&'a StageNode>,
    root_namespace: Option<Namespace>,
    refs: HashMap<&'a str, String>,
    out: String,
}

/// Render the ordered stages as a Mermaid flowchart
pub fn render(ordered: &[String], graph: &StageGraph) -> SptResult<String> {
    let mut renderer = MermaidRenderer {
        graph,
        ids: IdAllocator::default(),
        containers: Vec::new(),
        container_of: HashMap::new(),
        top_level: Vec::new(),
        stages: Vec::new(),
        leaves: Vec::new(),
        root_leaves: Vec::new(),
        root_namespace: None,
        refs: HashMap::new(),
        out: String::new(),
    };

    renderer.classify(ordered)?;
    renderer.nest()?;
    renderer.emit()?;

    debug!(
        groups = renderer.containers.len(),
        leaves = renderer.leaves.len(),
        "rendered mermaid diagram"
    );

    Ok(renderer.out)
}

/// Make a title safe inside a quoted Mermaid label
fn escape(title: &str) -> String {
    title.replace('"', "#quot;")
}

fn marker(id: &str, stage: &StageNode) -> String {
    if stage.milestone {
        format!("{}{{{{\"{}\"}}}}", id, escape(&stage.title))
    } else {
        format!("{}[\"{}\"]", id, escape(&stage.title))
    }
}

impl<'a> MermaidRenderer<'a> {
    /// Split stages into group shells and flat leaves, handing out ids
    fn classify(&mut self, ordered: &[String]) -> SptResult<()> {
        let graph = self.graph;
        for title in ordered {
            let stage = graph.get(title)?;
            if stage.is_root() {
                continue;
            }
            self.stages.push(stage);

            if stage.is_leaf() {
                if self.is_top_level(stage) && self.root_namespace.is_none() {
                    self.root_namespace = Some(self.ids.next_namespace());
                }
                self.leaves.push(stage);
            } else {
                let namespace = self.ids.next_namespace();
                let head = format!("{}_head", self.ids.next_group());
                self.container_of
                    .insert(stage.title.as_str(), self.containers.len());
                self.containers.push(Container {
                    stage,
                    head,
                    namespace,
                    groups: Vec::new(),
                    leaves: Vec::new(),
                });
            }
        }
        Ok(())
    }

    /// Attach every group and leaf to the container of its parent
    fn nest(&mut self) -> SptResult<()> {
        for index in 0..self.containers.len() {
            let stage = self.containers[index].stage;
            if self.is_top_level(stage) {
                self.top_level.push(index);
            } else {
                let parent = self.parent_container(stage)?;
                self.containers[parent].groups.push(index);
            }
        }

        for i in 0..self.leaves.len() {
            let leaf = self.leaves[i];
            if self.is_top_level(leaf) {
                self.root_leaves.push(leaf);
            } else {
                let parent = self.parent_container(leaf)?;
                self.containers[parent].leaves.push(leaf);
            }
        }
        Ok(())
    }

    fn emit(&mut self) -> SptResult<()> {
        let graph = self.graph;
        let root = graph.root();
        self.out.push_str("flowchart BT\n");
        self.out
            .push_str(&format!("{}([\"{}\"])\n\n", PROJECT_ID, escape(&root.title)));
        self.out
            .push_str(&format!("style {} fill:{},{}\n\n", PROJECT_ID, PROJECT_FILL, STROKE));

        let root_leaves = std::mem::take(&mut self.root_leaves);
        for leaf in root_leaves {
            let id = match self.root_namespace.as_mut() {
                Some(namespace) => namespace.next_ref(),
                None => {
                    return Err(SptError::StageNotFound {
                        stage: root.title.clone(),
                    })
                }
            };
            self.out.push_str(&marker(&id, leaf));
            self.out.push('\n');
            self.refs.insert(leaf.title.as_str(), id);
        }

        for index in self.top_level.clone() {
            self.emit_container(index, 0);
            self.out.push('\n');
        }

        self.emit_connectors()?;
        self.out.push('\n');
        self.emit_styles()?;

        Ok(())
    }

    fn emit_container(&mut self, index: usize, depth: usize) {
        let indent = INDENT.repeat(depth);
        let inner = INDENT.repeat(depth + 1);
        let stage = self.containers[index].stage;
        let head = self.containers[index].head.clone();

        self.out.push_str(&format!(
            "{}subgraph \"{}\"\n",
            indent,
            escape(&stage.title)
        ));
        self.out
            .push_str(&format!("{}{}\n", inner, marker(&head, stage)));
        self.refs.insert(stage.title.as_str(), head);

        for child in self.containers[index].groups.clone() {
            self.emit_container(child, depth + 1);
        }

        for leaf in self.containers[index].leaves.clone() {
            let id = self.containers[index].namespace.next_ref();
            self.out
                .push_str(&format!("{}{}\n", inner, marker(&id, leaf)));
            self.refs.insert(leaf.title.as_str(), id);
        }

        self.out.push_str(&format!("{}end\n", indent));
    }

    /// One connector per outgoing edge, groups first, then leaves
    fn emit_connectors(&mut self) -> SptResult<()> {
        let sources: Vec<&'a StageNode> = self
            .containers
            .iter()
            .map(|c| c.stage)
            .chain(self.leaves.iter().copied())
            .collect();

        let graph = self.graph;
        for stage in sources {
            let from = self.reference(&stage.title)?;
            let dependents = graph.dependents(&stage.title).unwrap_or_default();
            for dependent in dependents {
                let to = self.reference(dependent)?;
                self.out.push_str(&format!("{} --> {}\n", from, to));
            }
        }
        Ok(())
    }

    /// Colour complete stages; the root keeps its own style
    fn emit_styles(&mut self) -> SptResult<()> {
        let complete: Vec<&'a StageNode> =
            self.stages.iter().copied().filter(|s| s.complete).collect();

        for stage in complete {
            let id = self.reference(&stage.title)?;
            let fill = if stage.milestone {
                MILESTONE_FILL
            } else if stage.is_leaf() {
                LEAF_FILL
            } else {
                GROUP_FILL
            };
            self.out
                .push_str(&format!("style {} fill:{},{}\n", id, fill, STROKE));
        }
        Ok(())
    }

    fn is_top_level(&self, stage: &StageNode) -> bool {
        stage.parent.as_deref() == Some(self.graph.root().title.as_str())
    }

    fn parent_container(&self, stage: &StageNode) -> SptResult<usize> {
        let parent = stage.parent.as_deref().unwrap_or_default();
        self.container_of
            .get(parent)
            .copied()
            .ok_or_else(|| SptError::StageNotFound {
                stage: parent.to_string(),
            })
    }

    fn reference(&self, title: &str) -> SptResult<String> {
        if title == self.graph.root().title {
            return Ok(PROJECT_ID.to_string());
        }
        self.refs
            .get(title)
            .cloned()
            .ok_or_else(|| SptError::StageNotFound {
                stage: title.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::graph::tests::ship_project;
    use crate::project::{propagate, sequence, Stage};

    fn diagram(project: &Stage, tree_completion: bool) -> String {
        let mut graph = StageGraph::build(project).unwrap();
        propagate(&mut graph, tree_completion).unwrap();
        let ordered = sequence(&graph).unwrap();
        render(&ordered, &graph).unwrap()
    }

    #[test]
    fn test_alpha_labels() {
        assert_eq!(alpha_label(1), "A");
        assert_eq!(alpha_label(26), "Z");
        assert_eq!(alpha_label(27), "AA");
        assert_eq!(alpha_label(28), "AB");
        assert_eq!(alpha_label(52), "AZ");
        assert_eq!(alpha_label(53), "BA");
        assert_eq!(alpha_label(702), "ZZ");
        assert_eq!(alpha_label(703), "AAA");
    }

    #[test]
    fn test_ship_diagram() {
        let expected = r#"flowchart BT
Project(["Ship"])

style Project fill:#AC36BC,stroke:#333,stroke-width:2px,color:#fff

subgraph "Build"
    Group_1_head["Build"]
    A1["Compile"]
    A2["Link"]
end

subgraph "Test"
    Group_2_head["Test"]
    B1["Unit"]
    B2["Integration"]
end

Group_1_head --> Group_2_head
Group_2_head --> Project
A1 --> A2
A2 --> Group_1_head
B1 --> Group_2_head
B2 --> Group_2_head

"#;

        assert_eq!(diagram(&ship_project(), false), expected);
    }

    #[test]
    fn test_root_leaves_and_nested_groups() {
        let project = Stage::new("P")
            .with_stage(Stage::new("Kickoff").milestone())
            .with_stage(
                Stage::new("Outer")
                    .with_stage(Stage::new("Inner").with_parallel_stage(Stage::new("Deep")))
                    .with_stage(Stage::new("After")),
            );

        let expected = r#"flowchart BT
Project(["P"])

style Project fill:#AC36BC,stroke:#333,stroke-width:2px,color:#fff

A1{{"Kickoff"}}
subgraph "Outer"
    Group_2_head["Outer"]
    subgraph "Inner"
        Group_1_head["Inner"]
        B1["Deep"]
    end
    C1["After"]
end

Group_1_head --> C1
Group_2_head --> Project
A1 --> Group_2_head
B1 --> Group_1_head
C1 --> Group_2_head

"#;

        assert_eq!(diagram(&project, false), expected);
    }

    #[test]
    fn test_complete_stages_are_styled() {
        let mut project = ship_project();
        project.stages[1].parallel_stages[0].complete = true;
        project.stages[0] = Stage::new("Build")
            .milestone()
            .complete()
            .with_stage(Stage::new("Compile"))
            .with_stage(Stage::new("Link"));

        let output = diagram(&project, true);
        let styles: Vec<&str> = output
            .lines()
            .filter(|l| l.starts_with("style ") && !l.starts_with("style Project"))
            .collect();

        assert_eq!(
            styles,
            vec![
                "style A1 fill:#047D08,stroke:#333,stroke-width:2px,color:#fff",
                "style A2 fill:#047D08,stroke:#333,stroke-width:2px,color:#fff",
                "style Group_1_head fill:#7444EE,stroke:#333,stroke-width:2px,color:#fff",
                "style B1 fill:#047D08,stroke:#333,stroke-width:2px,color:#fff",
            ]
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let project = Stage::new("The \"big\" one").with_stage(Stage::new("Say \"hi\""));

        let output = diagram(&project, false);

        assert!(output.contains(r#"Project(["The #quot;big#quot; one"])"#));
        assert!(output.contains(r#"A1["Say #quot;hi#quot;"]"#));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = diagram(&ship_project(), false);
        for _ in 0..5 {
            assert_eq!(diagram(&ship_project(), false), first);
        }
    }

    #[test]
    fn test_single_stage_project() {
        let output = diagram(&Stage::new("Solo"), false);

        assert_eq!(
            output,
            "flowchart BT\nProject([\"Solo\"])\n\nstyle Project fill:#AC36BC,stroke:#333,stroke-width:2px,color:#fff\n\n\n"
        );
    }
}
