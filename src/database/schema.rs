use crate::config::DbConfig;
use crate::database::pool::connect;
use crate::error::Result;
use sqlx::{Connection, Executor, PgPool};
use tracing::info;

const MAINTENANCE_DATABASE: &str = "postgres";

const CREATE_EMPLOYERS: &str = r#"
CREATE TABLE IF NOT EXISTS employers (
    employer_id BIGINT PRIMARY KEY,
    name        VARCHAR(255) NOT NULL,
    url         TEXT
)
"#;

const CREATE_VACANCIES: &str = r#"
CREATE TABLE IF NOT EXISTS vacancies (
    vacancy_id  BIGINT PRIMARY KEY,
    employer_id BIGINT NOT NULL REFERENCES employers(employer_id) ON DELETE CASCADE,
    name        VARCHAR(255) NOT NULL,
    salary_from INTEGER,
    salary_to   INTEGER,
    currency    VARCHAR(10),
    url         TEXT NOT NULL
)
"#;

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Creates the configured database when missing. Returns `true` if it was created.
pub async fn create_database(db: &DbConfig) -> Result<bool> {
    let mut conn = connect(db, MAINTENANCE_DATABASE).await?;

    let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&db.dbname)
        .fetch_optional(&mut conn)
        .await?
        .is_some();

    if !exists {
        let statement = format!("CREATE DATABASE {}", quote_identifier(&db.dbname));
        conn.execute(statement.as_str()).await?;
        info!(database = %db.dbname, "Created database");
    }

    conn.close().await?;
    Ok(!exists)
}

pub async fn create_tables(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;
    (&mut *tx).execute(CREATE_EMPLOYERS).await?;
    (&mut *tx).execute(CREATE_VACANCIES).await?;
    tx.commit().await?;
    Ok(())
}
