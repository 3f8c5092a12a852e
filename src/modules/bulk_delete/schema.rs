use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Counts shown to the operator before anything is deleted.
#[derive(Debug, Clone, Serialize)]
pub struct DeletePlan {
    pub collection_name: String,
    pub total_document_count: u64,
    pub to_be_deleted_count: u64,
    pub to_be_remaining_count: u64,
    pub cutoff: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteSummary {
    pub deleted_count: u64,
    pub batches: u64,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// Operator declined at the confirmation gate; nothing was deleted.
    Aborted,
    Completed(DeleteSummary),
}
