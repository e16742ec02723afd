#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use hh_vacancies::config::{Config, DbConfig};
use hh_vacancies::database::pool::{connect, create_pool};
use hh_vacancies::database::schema::{create_database, create_tables, quote_identifier};
use hh_vacancies::error::Error;
use hh_vacancies::models::employer::Employer;
use hh_vacancies::models::vacancy::Vacancy;
use sqlx::{Connection, Executor, PgPool};

static NEXT_DATABASE: AtomicUsize = AtomicUsize::new(0);

/// A throwaway database with both tables created.
pub struct TestDatabase {
    pub db: DbConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    pub fn config(&self) -> Config {
        let mut config = base_config();
        config.db = self.db.clone();
        config
    }

    pub async fn teardown(self) {
        self.pool.close().await;
        if let Ok(mut conn) = connect(&self.db, "postgres").await {
            let statement = format!("DROP DATABASE IF EXISTS {}", quote_identifier(&self.db.dbname));
            let _ = conn.execute(statement.as_str()).await;
            let _ = conn.close().await;
        }
    }
}

pub fn base_config() -> Config {
    Config::from_env().expect("config from env")
}

/// Set to skip database tests when no PostgreSQL server is available.
const SKIP_ENV: &str = "HH_VACANCIES_SKIP_DB_TESTS";

fn skip_without_database() -> bool {
    matches!(
        std::env::var(SKIP_ENV).as_deref().map(str::trim),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Fails when no PostgreSQL server is reachable with the `DB_*` settings,
/// unless `HH_VACANCIES_SKIP_DB_TESTS` is set, in which case it returns `None`.
pub async fn test_database() -> Option<TestDatabase> {
    let mut db = base_config().db;
    db.dbname = format!(
        "hh_vacancies_test_{}_{}",
        std::process::id(),
        NEXT_DATABASE.fetch_add(1, Ordering::SeqCst)
    );

    match create_database(&db).await {
        Ok(_) => {}
        Err(Error::StorageConnect(msg)) if skip_without_database() => {
            eprintln!("skipping database test ({} is set): {}", SKIP_ENV, msg);
            return None;
        }
        Err(e) => panic!("failed to create test database: {}", e),
    }

    let pool = create_pool(&db).await.expect("pool");
    create_tables(&pool).await.expect("tables");
    Some(TestDatabase { db, pool })
}

pub fn employer(id: i64, name: &str) -> Employer {
    Employer {
        employer_id: id,
        name: name.to_string(),
        url: Some(format!("https://hh.ru/employer/{}", id)),
    }
}

pub fn vacancy(
    id: i64,
    employer_id: i64,
    name: &str,
    salary_from: Option<i32>,
    salary_to: Option<i32>,
) -> Vacancy {
    Vacancy {
        vacancy_id: id,
        employer_id,
        name: name.to_string(),
        salary_from,
        salary_to,
        currency: salary_from.or(salary_to).map(|_| "RUR".to_string()),
        url: format!("https://hh.ru/vacancy/{}", id),
    }
}

pub async fn stored_employers(pool: &PgPool) -> Vec<Employer> {
    sqlx::query_as::<_, Employer>("SELECT employer_id, name, url FROM employers ORDER BY employer_id")
        .fetch_all(pool)
        .await
        .expect("employers")
}

pub async fn stored_vacancies(pool: &PgPool) -> Vec<Vacancy> {
    sqlx::query_as::<_, Vacancy>(
        "SELECT vacancy_id, employer_id, name, salary_from, salary_to, currency, url
         FROM vacancies ORDER BY vacancy_id",
    )
    .fetch_all(pool)
    .await
    .expect("vacancies")
}
