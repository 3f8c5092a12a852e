use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

use crate::config;
use crate::modules::bulk_delete::{
    crud::PurgeCrud,
    model::DeletionRequest,
    progress::ProgressState,
    schema::{DeletePlan, DeleteSummary, RunOutcome},
};

/// Consecutive empty batches tolerated before the run is declared stalled.
pub const MAX_EMPTY_BATCHES: u32 = 3;

#[derive(Error, Debug)]
pub enum PurgeError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("failed to connect to MongoDB: {0}")]
    Connection(mongodb::error::Error),
    #[error("collection '{0}' does not exist or has 0 documents")]
    CollectionNotFound(String),
    #[error("deletion stalled after {0} consecutive empty batches")]
    Stalled(u32),
    #[error("confirmation prompt failed: {0}")]
    Prompt(String),
    #[error("database operation failed: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Answers the one go/no-go question of a run. Implementations decide how the
/// answer is obtained; the terminal one lives in the `bulk-delete` binary and
/// tests inject canned answers.
pub trait ConfirmationGate {
    fn confirm(&mut self, plan: &DeletePlan) -> Result<bool, PurgeError>;
}

/// Receives one progress update per loop iteration.
pub trait ProgressSink {
    fn batch_completed(&mut self, state: &ProgressState);
}

/// Only the literal answer `y` counts as consent. `"Y"`, `"yes"` and an empty
/// answer all decline.
pub fn is_affirmative(answer: &str) -> bool {
    answer == "y"
}

/// The whole procedure: validate, connect, probe the collection, count, ask,
/// then delete in paced batches until the target count is reached.
///
/// The client handle is acquired here and dropped on every exit path,
/// including an operator abort.
pub async fn run_bulk_delete(
    request: &DeletionRequest,
    gate: &mut impl ConfirmationGate,
    sink: &mut impl ProgressSink,
) -> Result<RunOutcome, PurgeError> {
    request
        .validate()
        .map_err(|e| PurgeError::Configuration(e.to_string()))?;

    let db = config::database::connect(&request.uri, &request.db_name)
        .await
        .map_err(PurgeError::Connection)?;
    let crud = PurgeCrud::new(&db, &request.collection_name);

    if !crud.has_any_documents().await? {
        return Err(PurgeError::CollectionNotFound(
            request.collection_name.clone(),
        ));
    }

    let cutoff_id = request.cutoff_object_id();
    let total_document_count = crud.estimated_count().await?;
    let to_be_deleted_count = crud.count_older_than(&cutoff_id).await?;
    let plan = DeletePlan {
        collection_name: request.collection_name.clone(),
        total_document_count,
        to_be_deleted_count,
        to_be_remaining_count: total_document_count.saturating_sub(to_be_deleted_count),
        cutoff: request.delete_before,
    };
    info!(
        collection = %plan.collection_name,
        total = plan.total_document_count,
        to_delete = plan.to_be_deleted_count,
        "computed deletion plan"
    );

    if !gate.confirm(&plan)? {
        info!("operator declined, nothing deleted");
        return Ok(RunOutcome::Aborted);
    }

    let mut progress = ProgressState::new(plan.to_be_deleted_count);
    let mut batches = 0u64;
    let mut empty_batches = 0u32;

    while !progress.is_complete() {
        let ids = crud.fetch_batch_ids(&cutoff_id, request.batch_size).await?;

        if ids.is_empty() {
            // The target count was taken once up front; concurrent writers can
            // leave it stale with no matching documents left.
            empty_batches += 1;
            warn!(empty_batches, "batch matched no documents while work remains");
            if empty_batches >= MAX_EMPTY_BATCHES {
                return Err(PurgeError::Stalled(empty_batches));
            }
        } else {
            empty_batches = 0;
            // Trust the count the store reports, not the batch size we asked
            // for; another process may have deleted some of these ids already.
            let deleted = crud.delete_ids(&ids).await?;
            progress.record_deleted(deleted);
            batches += 1;
        }

        sink.batch_completed(&progress);
        tokio::time::sleep(request.pace()).await;
    }

    Ok(RunOutcome::Completed(DeleteSummary {
        deleted_count: progress.deleted,
        batches,
        elapsed: progress.elapsed(),
    }))
}
