use bson::doc;
use mongodb::{Client, Database};
use tracing::info;

/// Opens a client for `uri` and verifies the deployment is reachable.
///
/// The driver connects lazily, so a bad URI or a down cluster would otherwise
/// only surface on the first real operation. The ping forces that failure to
/// happen here, where the caller can still abort before touching any data.
pub async fn connect(uri: &str, db_name: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    let db = client.database(db_name);

    db.run_command(doc! { "ping": 1 }).await?;
    info!(database = db_name, "connected to MongoDB");

    Ok(db)
}
