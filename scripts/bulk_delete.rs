//! Run with: cargo run --bin bulk-delete

use std::env;
use std::io::{self, Write};

use anyhow::Context;
use console::style;
use tracing_subscriber::EnvFilter;

use mongopurge::modules::bulk_delete::{
    controller::{is_affirmative, run_bulk_delete, ConfirmationGate, ProgressSink, PurgeError},
    model::{self, DeletionRequest},
    progress::{format_duration, ProgressState},
    schema::{DeletePlan, RunOutcome},
};

struct TerminalGate;

impl ConfirmationGate for TerminalGate {
    fn confirm(&mut self, plan: &DeletePlan) -> Result<bool, PurgeError> {
        println!();
        println!(
            "- Total collection document count: {}",
            plan.total_document_count
        );
        println!(
            "- To be deleted document count:    {}",
            plan.to_be_deleted_count
        );
        println!(
            "- To be remaining document count:  {}",
            plan.to_be_remaining_count
        );
        println!();

        let prompt = format!(
            "⚠️   Are you sure you want to delete {} documents created before {} from '{}' collection? (y/n)",
            plan.to_be_deleted_count,
            plan.cutoff.format("%Y-%m-%d %H:%M:%S"),
            plan.collection_name
        );
        let answer: String = dialoguer::Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| PurgeError::Prompt(e.to_string()))?;

        Ok(is_affirmative(&answer))
    }
}

struct TerminalProgress;

impl ProgressSink for TerminalProgress {
    fn batch_completed(&mut self, state: &ProgressState) {
        let percent = if state.total == 0 {
            100
        } else {
            state.deleted * 100 / state.total
        };
        let remaining = state
            .eta()
            .map(format_duration)
            .unwrap_or_else(|| "?".to_string());

        print!(
            "\rProgress | {:>3}% | {}/{} documents | Elapsed: {} | Time remaining: {}",
            percent,
            state.deleted,
            state.total,
            format_duration(state.elapsed()),
            remaining
        );
        let _ = io::stdout().flush();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("\n🚀 Starting bulk delete...\n");

    let uri = env::var("MONGODB_URI").context("MONGODB_URI must be set")?;
    let db_name = env::var("MONGODB_DATABASE").context("MONGODB_DATABASE must be set")?;
    let collection_name = env::var("COLLECTION_NAME").context("COLLECTION_NAME must be set")?;
    let cutoff_raw = env::var("DELETE_BEFORE").context("DELETE_BEFORE must be set")?;
    let delete_before = model::parse_cutoff(&cutoff_raw)?;

    let batch_size = env::var("BATCH_SIZE")
        .ok()
        .map(|raw| raw.parse::<i64>())
        .transpose()
        .context("BATCH_SIZE must be an integer")?;
    let delete_interval_ms = env::var("DELETE_INTERVAL_MS")
        .ok()
        .map(|raw| raw.parse::<u64>())
        .transpose()
        .context("DELETE_INTERVAL_MS must be an integer")?;

    let request = DeletionRequest::new(
        uri,
        db_name,
        collection_name,
        delete_before,
        batch_size,
        delete_interval_ms,
    )?;

    match run_bulk_delete(&request, &mut TerminalGate, &mut TerminalProgress).await? {
        RunOutcome::Aborted => println!("\nAborting..."),
        RunOutcome::Completed(summary) => {
            println!(
                "\n\n{} Deleted {} documents in {} batches ({})",
                style("✓").green(),
                summary.deleted_count,
                summary.batches,
                format_duration(summary.elapsed)
            );
        }
    }

    Ok(())
}
