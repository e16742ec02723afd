use crate::config::DbConfig;
use crate::error::{Error, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool};

pub fn connect_options(db: &DbConfig, database: &str) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .username(&db.user)
        .password(&db.password)
        .database(database)
}

pub async fn create_pool(db: &DbConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_with(connect_options(db, &db.dbname))
        .await
        .map_err(|e| connect_error(db, &db.dbname, e))?;
    Ok(pool)
}

/// Single connection, used for server-level statements such as `CREATE DATABASE`.
pub async fn connect(db: &DbConfig, database: &str) -> Result<PgConnection> {
    PgConnection::connect_with(&connect_options(db, database))
        .await
        .map_err(|e| connect_error(db, database, e))
}

fn connect_error(db: &DbConfig, database: &str, err: sqlx::Error) -> Error {
    tracing::error!(
        host = %db.host,
        port = db.port,
        database,
        error = ?err,
        "PostgreSQL connection failed"
    );
    Error::StorageConnect(format!(
        "could not connect to PostgreSQL database \"{}\" at {}:{} as \"{}\" ({}). \
         Check that the server is running and DB_HOST/DB_PORT/DB_USER/DB_PASSWORD are correct",
        database,
        db.host,
        db.port,
        db.user,
        summarize(&err)
    ))
}

fn summarize(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        sqlx::Error::Io(io) => io.to_string(),
        sqlx::Error::PoolTimedOut => "timed out waiting for a connection".to_string(),
        // server messages in a non-UTF8 locale surface as protocol errors
        sqlx::Error::Protocol(_) | sqlx::Error::Decode(_) => {
            "the server reply could not be decoded".to_string()
        }
        other => other.to_string(),
    }
}
