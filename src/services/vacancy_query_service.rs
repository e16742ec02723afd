use crate::error::Result;
use crate::models::vacancy::{CompanyVacancyCount, VacancyListing};
use sqlx::PgPool;

/// Midpoint when both bounds are set, otherwise the bound that is set.
/// Mirrors `utils::salary::representative_salary`.
const REPRESENTATIVE_SALARY_SQL: &str = r#"
    CASE
        WHEN v.salary_from IS NOT NULL AND v.salary_to IS NOT NULL
            THEN (v.salary_from::float8 + v.salary_to::float8) / 2
        ELSE COALESCE(v.salary_from, v.salary_to)::float8
    END"#;

const LISTING_SELECT: &str = r#"
    SELECT e.name AS company_name,
           v.name AS vacancy_name,
           v.salary_from,
           v.salary_to,
           v.currency,
           v.url
    FROM vacancies v
    INNER JOIN employers e ON e.employer_id = v.employer_id"#;

const LISTING_ORDER: &str = "ORDER BY e.name, v.name, v.vacancy_id";

#[derive(Clone)]
pub struct VacancyQueryService {
    pool: PgPool,
}

impl VacancyQueryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every employer with its number of vacancies, including employers with none.
    pub async fn companies_and_vacancies_count(&self) -> Result<Vec<CompanyVacancyCount>> {
        let rows = sqlx::query_as::<_, CompanyVacancyCount>(
            r#"
            SELECT e.name AS company_name,
                   COUNT(v.vacancy_id) AS vacancies_count
            FROM employers e
            LEFT JOIN vacancies v ON v.employer_id = e.employer_id
            GROUP BY e.employer_id, e.name
            ORDER BY vacancies_count DESC, e.name ASC, e.employer_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn all_vacancies(&self) -> Result<Vec<VacancyListing>> {
        let query = format!("{} {}", LISTING_SELECT, LISTING_ORDER);
        let rows = sqlx::query_as::<_, VacancyListing>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Mean representative salary; `0.0` when no vacancy has salary data.
    pub async fn avg_salary(&self) -> Result<f64> {
        let query = format!(
            "SELECT COALESCE(AVG({}), 0)::float8 FROM vacancies v",
            REPRESENTATIVE_SALARY_SQL
        );
        let avg = sqlx::query_scalar::<_, f64>(&query)
            .fetch_one(&self.pool)
            .await?;

        Ok(avg)
    }

    /// Vacancies whose representative salary is strictly above the current average.
    pub async fn vacancies_with_higher_salary(&self) -> Result<Vec<VacancyListing>> {
        let avg = self.avg_salary().await?;
        let query = format!(
            "{} WHERE {} > $1 {}",
            LISTING_SELECT, REPRESENTATIVE_SALARY_SQL, LISTING_ORDER
        );
        let rows = sqlx::query_as::<_, VacancyListing>(&query)
            .bind(avg)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Case-insensitive substring match on the vacancy title.
    pub async fn vacancies_with_keyword(&self, keyword: &str) -> Result<Vec<VacancyListing>> {
        let query = format!("{} WHERE v.name ILIKE $1 {}", LISTING_SELECT, LISTING_ORDER);
        let rows = sqlx::query_as::<_, VacancyListing>(&query)
            .bind(keyword_pattern(keyword))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

/// `%keyword%` with LIKE wildcards escaped, so the keyword matches literally.
pub fn keyword_pattern(keyword: &str) -> String {
    let keyword = keyword.trim();
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
