use crate::dto::hh_dto::SalaryPayload;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSalary {
    pub from: Option<i32>,
    pub to: Option<i32>,
    pub currency: Option<String>,
}

/// Flattens an optional hh.ru salary block. No range or currency checks.
pub fn normalize_salary(salary: Option<&SalaryPayload>) -> NormalizedSalary {
    match salary {
        Some(salary) => NormalizedSalary {
            from: salary.from,
            to: salary.to,
            currency: salary.currency.clone(),
        },
        None => NormalizedSalary::default(),
    }
}

/// Single value standing for a salary range: the midpoint when both bounds
/// are known, otherwise whichever bound is present.
///
/// Must agree with `REPRESENTATIVE_SALARY_SQL` in the query service.
pub fn representative_salary(from: Option<i32>, to: Option<i32>) -> Option<f64> {
    match (from, to) {
        (Some(from), Some(to)) => Some((f64::from(from) + f64::from(to)) / 2.0),
        (Some(bound), None) | (None, Some(bound)) => Some(f64::from(bound)),
        (None, None) => None,
    }
}
