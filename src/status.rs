// System status display: ledger location, reaction count, recent reactions.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::ledger::Ledger;
use crate::output::terminal;

const RECENT_LIMIT: u32 = 10;

/// Display system status to the terminal.
///
/// `is_file` is false for Postgres, where there's no file to size.
pub async fn show(ledger: &Arc<dyn Ledger>, ledger_display: &str, is_file: bool) -> Result<()> {
    if is_file {
        let file_size = std::fs::metadata(Path::new(ledger_display))
            .map(|m| format_bytes(m.len()))
            .unwrap_or_else(|_| "unknown".to_string());
        println!("Ledger: {} ({})", ledger_display, file_size);
    } else {
        println!("Ledger: {}", ledger_display);
    }

    let count = ledger.reaction_count().await?;
    println!("Reactions recorded: {}", count);

    let recent = ledger.recent_reactions(RECENT_LIMIT).await?;
    terminal::display_reactions(&recent);

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
