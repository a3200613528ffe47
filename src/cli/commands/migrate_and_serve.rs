use anyhow::Result;
use tracing::info;

use super::initdb::run_migrations;
use super::serve::serve;
use crate::config::Settings;

pub async fn migrate_and_serve(settings: &Settings) -> Result<()> {
    info!("Applying database migrations and starting server");

    // The server opens its own pool; this connection only serves the migration
    let db = run_migrations(&settings.database_url).await?;
    db.close().await?;

    serve(settings).await
}
