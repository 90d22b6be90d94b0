// Colored terminal output for the ledger and dry-run previews.

use colored::Colorize;

use super::{single_line, truncate_chars};
use crate::engine::PlannedComment;
use crate::ledger::Reaction;

const PREVIEW_CHARS: usize = 60;

/// Display the most recent reactions as a table.
pub fn display_reactions(reactions: &[Reaction]) {
    if reactions.is_empty() {
        println!("No reactions recorded yet.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Recent reactions ({}) ===", reactions.len()).bold()
    );
    println!();
    println!(
        "  {:>10}  {:<8} {:>10}  {:<19}  {}",
        "Item".dimmed(),
        "Family".dimmed(),
        "Comment".dimmed(),
        "Created".dimmed(),
        "Preview".dimmed(),
    );
    println!("  {}", "-".repeat(100).dimmed());

    for r in reactions {
        println!(
            "  {:>10}  {:<8} {:>10}  {:<19}  {}",
            r.item_id,
            r.family.as_str().cyan(),
            r.comment_id,
            r.created_at,
            truncate_chars(&single_line(&r.body), PREVIEW_CHARS).dimmed(),
        );
    }
    println!();
}

/// Show what `run` would post for a URL.
pub fn display_plan(url: &str, planned: &[PlannedComment]) {
    if planned.is_empty() {
        println!("{} {}", "No link family matches".yellow(), url);
        return;
    }

    for plan in planned {
        println!(
            "\n{} {} (captured {})",
            "Matches".green().bold(),
            plan.link.family.as_str().cyan(),
            plan.link.capture.bold()
        );
        println!("{}", "-".repeat(60).dimmed());
        println!("{}", plan.body);
        println!("{}", "-".repeat(60).dimmed());
    }
}
