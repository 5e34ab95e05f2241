// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Terminal color utilities
//!
//! Provides consistent color schemes across the CLI.

use colored::{ColoredString, Colorize};

use crate::render::{EntryKind, WorkOrder, WorkOrderEntry, REPORT_TITLE};

/// Check if colors should be used on stdout
pub fn should_use_colors() -> bool {
    // Respect NO_COLOR environment variable
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    console::Term::stdout().is_term()
}

/// Style for one work-order line, without its number
fn entry_style(entry: &WorkOrderEntry, text: &str) -> ColoredString {
    match (entry.kind, entry.milestone) {
        (EntryKind::Project, _) => text.bright_magenta(),
        (EntryKind::Group, true) => text.bright_green(),
        (EntryKind::Group, false) => text.green(),
        (EntryKind::Leaf, true) => text.bright_cyan(),
        (EntryKind::Leaf, false) => text.cyan(),
    }
}

/// Render a work order with terminal colors
pub fn paint_work_order(order: &WorkOrder) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", REPORT_TITLE.bright_magenta()));

    for entry in &order.entries {
        let number = format!("{}.", entry.number);
        let line = format!("{}{}", entry.title, entry.suffix());
        out.push_str(&format!(
            "{} {}\n",
            number.bright_cyan(),
            entry_style(entry, &line)
        ));
    }

    let total = format!("Total stages: {}", order.total);
    out.push_str(&format!("\n{}\n", total.bright_yellow()));
    out
}

/// Print a success check
pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print an error cross
pub fn print_error(msg: &str) {
    println!("  {} {}", "✗".red(), msg);
}

/// Print a warning
pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}
