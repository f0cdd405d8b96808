//! Idempotent provisioning of analytics database objects.
//!
//! Runs at startup after the migration system has created the base tables,
//! in dependency order: extensions and helper functions, then indexes, then
//! materialized views. Every statement uses `IF NOT EXISTS` or `CREATE OR
//! REPLACE`, so the whole sequence is safely re-runnable against an
//! already-provisioned database.

mod extensions;
mod indexes;
mod views;

pub use extensions::install_extensions;
pub use indexes::create_indexes;
pub use views::{create_views, refresh_views, MATERIALIZED_VIEWS};

use sqlx::PgPool;
use tracing::info;

/// Provision the analytics layer in dependency order.
pub async fn provision(pool: &PgPool) -> Result<(), sqlx::Error> {
    install_extensions(pool).await?;
    create_indexes(pool).await?;
    create_views(pool).await?;
    info!("Analytics database provisioning complete");
    Ok(())
}
