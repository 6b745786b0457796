use mongodb::{bson::doc, Client, Database};

use crate::config::AppConfig;
use crate::errors::Result;

pub async fn get_db_client(config: &AppConfig) -> Result<Database> {
    let client = Client::with_uri_str(&config.database_url).await?;
    let db = client.database(&config.database_name);

    match db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => tracing::info!("✅ Connected to database: {}", config.database_name),
        Err(e) => {
            // The driver reconnects lazily, so the service can still start.
            tracing::warn!(
                "⚠️ Database '{}' is not reachable yet: {}",
                config.database_name,
                e
            );
        }
    }

    Ok(db)
}
