use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

/// Raw-`Document` collection access so the tool works against any collection
/// name without a model type.
pub struct PurgeCrud {
    collection: Collection<Document>,
}

impl PurgeCrud {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }

    /// Cheap existence probe: fetches at most one document.
    pub async fn has_any_documents(&self) -> Result<bool, mongodb::error::Error> {
        let found = self.collection.find_one(doc! {}).await?;
        Ok(found.is_some())
    }

    /// Store-maintained approximate count; may be stale.
    pub async fn estimated_count(&self) -> Result<u64, mongodb::error::Error> {
        self.collection.estimated_document_count().await
    }

    /// Exact count of documents with `_id` strictly below `cutoff`.
    pub async fn count_older_than(&self, cutoff: &ObjectId) -> Result<u64, mongodb::error::Error> {
        self.collection
            .count_documents(doc! { "_id": { "$lt": cutoff } })
            .await
    }

    /// Up to `batch_size` qualifying ids, in whatever order the store returns
    /// them. No sort, no skip.
    pub async fn fetch_batch_ids(
        &self,
        cutoff: &ObjectId,
        batch_size: i64,
    ) -> Result<Vec<ObjectId>, mongodb::error::Error> {
        let cursor = self
            .collection
            .find(doc! { "_id": { "$lt": cutoff } })
            .projection(doc! { "_id": 1 })
            .limit(batch_size)
            .await?;

        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents
            .iter()
            .filter_map(|document| document.get_object_id("_id").ok())
            .collect())
    }

    /// Deletes exactly the given id set; returns how many were actually
    /// removed, which can be fewer than `ids.len()` if another process got
    /// there first.
    pub async fn delete_ids(&self, ids: &[ObjectId]) -> Result<u64, mongodb::error::Error> {
        let result = self
            .collection
            .delete_many(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }
}
