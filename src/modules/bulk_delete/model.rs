use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::modules::bulk_delete::controller::PurgeError;

pub const DEFAULT_BATCH_SIZE: i64 = 300;
pub const DEFAULT_DELETE_INTERVAL_MS: u64 = 200;

/// Everything one deletion run needs, validated up front so no network I/O
/// happens on behalf of a bad request.
#[derive(Debug, Clone, Validate)]
pub struct DeletionRequest {
    #[validate(length(min = 1, message = "Connection URI cannot be empty"))]
    pub uri: String,
    #[validate(length(min = 1, message = "Database name cannot be empty"))]
    pub db_name: String,
    #[validate(length(min = 1, message = "Collection name cannot be empty"))]
    pub collection_name: String,
    #[validate(custom(
        function = cutoff_not_in_future,
        message = "Cannot delete documents that were created in the future"
    ))]
    pub delete_before: DateTime<Utc>,
    #[validate(range(min = 1, message = "Batch size must be greater than 0"))]
    pub batch_size: i64,
    #[validate(range(min = 1, message = "Delete interval must be greater than 0"))]
    pub delete_interval_ms: u64,
}

impl DeletionRequest {
    pub fn new(
        uri: String,
        db_name: String,
        collection_name: String,
        delete_before: DateTime<Utc>,
        batch_size: Option<i64>,
        delete_interval_ms: Option<u64>,
    ) -> Result<Self, PurgeError> {
        let request = Self {
            uri,
            db_name,
            collection_name,
            delete_before,
            batch_size: batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            delete_interval_ms: delete_interval_ms.unwrap_or(DEFAULT_DELETE_INTERVAL_MS),
        };

        request
            .validate()
            .map_err(|e| PurgeError::Configuration(e.to_string()))?;

        Ok(request)
    }

    pub fn cutoff_object_id(&self) -> ObjectId {
        object_id_for_timestamp(self.delete_before)
    }

    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.delete_interval_ms)
    }
}

fn cutoff_not_in_future(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *value > Utc::now() {
        return Err(ValidationError::new("cutoff_in_future"));
    }
    Ok(())
}

/// Parses an operator-supplied cutoff: RFC 3339, or a bare `YYYY-MM-DD`
/// taken as midnight UTC.
pub fn parse_cutoff(raw: &str) -> Result<DateTime<Utc>, PurgeError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(PurgeError::Configuration(format!(
        "invalid cutoff timestamp: '{raw}'"
    )))
}

/// Synthetic ObjectId lower bound for documents created at `timestamp` or
/// later: the leading 4 bytes carry the cutoff's seconds-since-epoch, the
/// remaining 8 are zero. Any driver-generated id from the same second or
/// later compares `>=` this value, so `_id < bound` selects exactly the
/// documents created strictly before the cutoff second, on the `_id` index.
pub fn object_id_for_timestamp(timestamp: DateTime<Utc>) -> ObjectId {
    let seconds = timestamp.timestamp().clamp(0, i64::from(u32::MAX)) as u32;
    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&seconds.to_be_bytes());
    ObjectId::from_bytes(bytes)
}
