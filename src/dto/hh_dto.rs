use serde::{Deserialize, Deserializer, Serialize};

use crate::models::employer::Employer;
use crate::models::vacancy::Vacancy;
use crate::utils::salary::normalize_salary;

fn deserialize_id_flexible<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        String(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(i) => Ok(i),
        IntOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid id: {}", s))),
    }
}

fn deserialize_amount_flexible<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Int(i64),
        Float(f64),
    }

    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Amount::Int(i)) => i32::try_from(i)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("Salary amount out of range: {}", i))),
        Some(Amount::Float(f)) => {
            let rounded = f.round();
            if rounded.is_finite() && rounded >= i32::MIN as f64 && rounded <= i32::MAX as f64 {
                Ok(Some(rounded as i32))
            } else {
                Err(serde::de::Error::custom(format!(
                    "Salary amount out of range: {}",
                    f
                )))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerPayload {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: i64,
    pub name: Option<String>,
    pub alternate_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryPayload {
    #[serde(default, deserialize_with = "deserialize_amount_flexible")]
    pub from: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_amount_flexible")]
    pub to: Option<i32>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyPayload {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: i64,
    pub name: Option<String>,
    pub salary: Option<SalaryPayload>,
    pub alternate_url: Option<String>,
    pub url: Option<String>,
}

/// One page of `GET /vacancies`. An empty `items` list marks the end of data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VacancyPage {
    #[serde(default)]
    pub items: Vec<VacancyPayload>,
}

impl From<EmployerPayload> for Employer {
    fn from(value: EmployerPayload) -> Self {
        Self {
            employer_id: value.id,
            name: value.name.unwrap_or_else(|| "Unknown".to_string()),
            url: value.alternate_url,
        }
    }
}

impl VacancyPayload {
    pub fn into_vacancy(self, employer_id: i64) -> Vacancy {
        let salary = normalize_salary(self.salary.as_ref());
        let url = self
            .alternate_url
            .or(self.url)
            .unwrap_or_default();

        Vacancy {
            vacancy_id: self.id,
            employer_id,
            name: self.name.unwrap_or_else(|| "No title".to_string()),
            salary_from: salary.from,
            salary_to: salary.to,
            currency: salary.currency,
            url,
        }
    }
}
