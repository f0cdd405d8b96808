//! Database extensions and helper functions.

use sqlx::PgPool;
use tracing::info;

/// Extensions the reporting layer depends on: UUID generation, crypto
/// primitives, accent-insensitive text search.
const EXTENSION_STATEMENTS: &[&str] = &[
    r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#,
    "CREATE EXTENSION IF NOT EXISTS pgcrypto",
    "CREATE EXTENSION IF NOT EXISTS unaccent",
];

/// Helper functions shared by the reporting queries.
///
/// `utc_now()` strips the timezone offset so every "now" comparison uses
/// the same baseline regardless of the session timezone setting.
const FUNCTION_STATEMENTS: &[&str] = &[
    r#"
    CREATE OR REPLACE FUNCTION generate_uuid() RETURNS uuid
    AS 'SELECT uuid_generate_v4()'
    LANGUAGE sql VOLATILE
    "#,
    r#"
    CREATE OR REPLACE FUNCTION utc_now() RETURNS timestamp
    AS 'SELECT (now() AT TIME ZONE ''utc'')'
    LANGUAGE sql STABLE
    "#,
];

/// Install required extensions and helper functions. Idempotent.
pub async fn install_extensions(pool: &PgPool) -> Result<(), sqlx::Error> {
    for stmt in EXTENSION_STATEMENTS {
        sqlx::query(stmt).execute(pool).await?;
    }
    for stmt in FUNCTION_STATEMENTS {
        sqlx::query(stmt).execute(pool).await?;
    }
    info!(
        extensions = EXTENSION_STATEMENTS.len(),
        functions = FUNCTION_STATEMENTS.len(),
        "Installed database extensions and helper functions"
    );
    Ok(())
}
