pub type Result<T> = std::result::Result<T, Error>;

/// SQLSTATE raised by Postgres on a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote API request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Remote API returned {status} for {url}")]
    RemoteStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Storage connection error: {0}")]
    StorageConnect(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Error {
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote(_) | Error::RemoteStatus { .. })
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                let detail = match db_err.constraint() {
                    Some(constraint) => format!("{} ({})", db_err.message(), constraint),
                    None => db_err.message().to_string(),
                };
                Error::ConstraintViolation(detail)
            }
            other => Error::Database(other),
        }
    }
}
