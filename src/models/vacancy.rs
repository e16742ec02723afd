use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::utils::salary::representative_salary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Vacancy {
    pub vacancy_id: i64,
    pub employer_id: i64,
    pub name: String,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub currency: Option<String>,
    pub url: String,
}

/// Vacancy joined with its employer's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VacancyListing {
    pub company_name: String,
    pub vacancy_name: String,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub currency: Option<String>,
    pub url: String,
}

impl VacancyListing {
    pub fn representative_salary(&self) -> Option<f64> {
        representative_salary(self.salary_from, self.salary_to)
    }

    fn salary_label(&self) -> String {
        let range = match (self.salary_from, self.salary_to) {
            (Some(from), Some(to)) => format!("{}-{}", from, to),
            (Some(from), None) => format!("from {}", from),
            (None, Some(to)) => format!("up to {}", to),
            (None, None) => return "salary not specified".to_string(),
        };
        match &self.currency {
            Some(currency) => format!("{} {}", range, currency),
            None => range,
        }
    }
}

impl fmt::Display for VacancyListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | {} | {}",
            self.company_name,
            self.vacancy_name,
            self.salary_label(),
            self.url
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CompanyVacancyCount {
    pub company_name: String,
    pub vacancies_count: i64,
}
