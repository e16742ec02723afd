use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Employer {
    pub employer_id: i64,
    pub name: String,
    pub url: Option<String>,
}
