//! CLI subcommand modules.
//!
//! This module contains the implementations for all prime CLI subcommands.

pub(crate) mod compose;
pub(crate) mod evaluate;
pub(crate) mod rank;
pub(crate) mod select;

/// Horizontal rule under section titles.
pub(crate) const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Prints a boxed title.
pub(crate) fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║ {title:^60} ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}
