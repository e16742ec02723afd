use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use crate::error::Result;
use crate::models::employer::Employer;
use crate::models::vacancy::Vacancy;

/// Postgres caps a single statement at 65535 bind parameters.
const BIND_LIMIT: usize = 65_535;
const EMPLOYER_COLUMNS: usize = 3;
const VACANCY_COLUMNS: usize = 7;

#[derive(Clone)]
pub struct UpsertService {
    pool: PgPool,
}

impl UpsertService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or overwrites employers in one transaction. Returns rows written.
    pub async fn upsert_employers(&self, rows: &[Employer]) -> Result<u64> {
        let rows = last_write_wins(rows, |employer| employer.employer_id);
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for chunk in rows.chunks(BIND_LIMIT / EMPLOYER_COLUMNS) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO employers (employer_id, name, url) ");
            builder.push_values(chunk, |mut b, employer| {
                b.push_bind(employer.employer_id)
                    .push_bind(employer.name.clone())
                    .push_bind(employer.url.clone());
            });
            builder.push(
                " ON CONFLICT (employer_id) DO UPDATE SET name = EXCLUDED.name, url = EXCLUDED.url",
            );
            written += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        info!(rows = written, "Upserted employers");
        Ok(written)
    }

    /// Inserts or overwrites vacancies in one transaction. A row pointing at an
    /// unknown employer rolls the whole batch back.
    pub async fn upsert_vacancies(&self, rows: &[Vacancy]) -> Result<u64> {
        let rows = last_write_wins(rows, |vacancy| vacancy.vacancy_id);
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for chunk in rows.chunks(BIND_LIMIT / VACANCY_COLUMNS) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO vacancies (vacancy_id, employer_id, name, salary_from, salary_to, currency, url) ",
            );
            builder.push_values(chunk, |mut b, vacancy| {
                b.push_bind(vacancy.vacancy_id)
                    .push_bind(vacancy.employer_id)
                    .push_bind(vacancy.name.clone())
                    .push_bind(vacancy.salary_from)
                    .push_bind(vacancy.salary_to)
                    .push_bind(vacancy.currency.clone())
                    .push_bind(vacancy.url.clone());
            });
            builder.push(
                r#" ON CONFLICT (vacancy_id) DO UPDATE SET
                    employer_id = EXCLUDED.employer_id,
                    name = EXCLUDED.name,
                    salary_from = EXCLUDED.salary_from,
                    salary_to = EXCLUDED.salary_to,
                    currency = EXCLUDED.currency,
                    url = EXCLUDED.url"#,
            );
            written += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        info!(rows = written, "Upserted vacancies");
        Ok(written)
    }
}

/// Collapses rows sharing a key to the last one, keeping first-seen order.
/// A single `INSERT .. ON CONFLICT DO UPDATE` cannot touch the same row twice.
fn last_write_wins<T, K, F>(rows: &[T], key: F) -> Vec<&T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut position: HashMap<K, usize> = HashMap::with_capacity(rows.len());
    let mut kept: Vec<&T> = Vec::with_capacity(rows.len());
    for row in rows {
        match position.entry(key(row)) {
            Entry::Occupied(slot) => kept[*slot.get()] = row,
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(row);
            }
        }
    }
    kept
}
