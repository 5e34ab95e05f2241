// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Output forms for a sequenced project
//!
//! Both consumers take the order produced by
//! [`sequence`](crate::project::sequence) together with the graph it came
//! from.

mod mermaid;
mod report;

pub use mermaid::{alpha_label, render};
pub use report::{report, EntryKind, WorkOrder, WorkOrderEntry, COMPLETE_MARKER, REPORT_TITLE};
