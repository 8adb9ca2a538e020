//! `finlens history` subcommands.

use anyhow::Context;

use crate::cli::HistoryAction;
use crate::history::{default_db_path, AnalysisHistory};

pub async fn handle(action: HistoryAction) -> anyhow::Result<()> {
    match action {
        HistoryAction::List => {
            let summaries = tokio::task::spawn_blocking(|| {
                AnalysisHistory::new(&default_db_path()?)?.list()
            })
            .await
            .context("history task failed")??;

            if summaries.is_empty() {
                println!("No recorded analyses.");
                return Ok(());
            }
            println!("{:>4}  {:19}  {:6}  score  model", "id", "created", "ticker");
            for s in summaries {
                println!(
                    "{:>4}  {:19}  {:6}  {}/8    {}",
                    s.id,
                    display_timestamp(&s.created_at),
                    s.ticker,
                    s.score,
                    s.model
                );
            }
        }
        HistoryAction::Show { id } => {
            let record = tokio::task::spawn_blocking(move || {
                AnalysisHistory::new(&default_db_path()?)?.get(id)
            })
            .await
            .context("history task failed")??;

            match record {
                Some(record) => {
                    // Stored JSON is already the decoded report; re-indent it
                    // for display.
                    match serde_json::from_str::<serde_json::Value>(&record.report_json) {
                        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                        Err(_) => println!("{}", record.report_json),
                    }
                }
                None => println!("No analysis with id {}.", id),
            }
        }
        HistoryAction::Clear => {
            let removed = tokio::task::spawn_blocking(|| {
                AnalysisHistory::new(&default_db_path()?)?.clear()
            })
            .await
            .context("history task failed")??;
            println!("Removed {} recorded analyses.", removed);
        }
    }
    Ok(())
}

/// Stored timestamps are full RFC 3339 with sub-second precision; trim to
/// "YYYY-MM-DD HH:MM:SS" (19 chars) so rows line up under the list header.
fn display_timestamp(created_at: &str) -> String {
    created_at
        .chars()
        .take(19)
        .map(|c| if c == 'T' { ' ' } else { c })
        .collect()
}
