// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 spt contributors

//! Progress spinner utilities
//!
//! Spinners draw on stderr and are only shown when stderr is a terminal, so
//! redirected output stays clean.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Spinner on an interactive stderr, nothing otherwise
pub fn interactive_spinner(message: &str) -> Option<ProgressBar> {
    if console::Term::stderr().is_term() {
        Some(create_spinner(message))
    } else {
        None
    }
}
