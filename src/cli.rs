use std::io::Write;

use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use tracing::error;

use crate::config::Config;
use crate::database::pool::create_pool;
use crate::error::Result;
use crate::services::seed_service::SeedService;
use crate::services::vacancy_query_service::VacancyQueryService;

#[derive(Debug, Parser)]
#[command(name = "hh-vacancies", version, about = "Seed hh.ru vacancies into PostgreSQL and query them")]
pub struct CliArgs {
    /// Runs a single action; without one the interactive menu starts.
    #[command(subcommand)]
    pub command: Option<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Action {
    /// Create the database and tables, then load employers and vacancies
    Seed,
    /// Companies with their number of vacancies
    Companies,
    /// All vacancies with company name
    Vacancies,
    /// Average salary over vacancies with salary data
    AvgSalary,
    /// Vacancies paying above the average salary
    AboveAverage,
    /// Vacancies whose title contains a keyword
    Search { keyword: String },
}

const MENU_ITEMS: [&str; 7] = [
    "Create database/tables and load data (seed)",
    "Companies and vacancy counts",
    "All vacancies",
    "Average salary",
    "Vacancies with salary above average",
    "Search vacancies by keyword",
    "Exit",
];

/// Interactive loop. A failing action is reported and the loop goes on.
pub async fn interactive<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("hh-vacancies")
            .items(&MENU_ITEMS)
            .default(0)
            .interact()?;

        let action = match selection {
            0 => Action::Seed,
            1 => Action::Companies,
            2 => Action::Vacancies,
            3 => Action::AvgSalary,
            4 => Action::AboveAverage,
            5 => {
                let keyword: String = Input::with_theme(&theme)
                    .with_prompt("Keyword")
                    .allow_empty(true)
                    .interact_text()?;
                Action::Search { keyword }
            }
            _ => break,
        };

        if let Err(e) = run_action(config, &action, out).await {
            error!(error = ?e, ?action, "Action failed");
            writeln!(out, "Error: {}", e)?;
        }
    }
    Ok(())
}

/// Read-only actions, answered from the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Query<'a> {
    Companies,
    Vacancies,
    AvgSalary,
    AboveAverage,
    Search(&'a str),
}

pub async fn run_action<W: Write>(config: &Config, action: &Action, out: &mut W) -> Result<()> {
    let query = match action {
        Action::Seed => {
            let report = SeedService::new(config.clone())?.run().await?;
            writeln!(
                out,
                "Done: {} employers and {} vacancies written.",
                report.employers, report.vacancies
            )?;
            return Ok(());
        }
        Action::Companies => Query::Companies,
        Action::Vacancies => Query::Vacancies,
        Action::AvgSalary => Query::AvgSalary,
        Action::AboveAverage => Query::AboveAverage,
        Action::Search { keyword } => Query::Search(keyword),
    };

    let pool = create_pool(&config.db).await?;
    let result = run_query(&VacancyQueryService::new(pool.clone()), query, out).await;
    pool.close().await;
    result
}

async fn run_query<W: Write>(
    queries: &VacancyQueryService,
    query: Query<'_>,
    out: &mut W,
) -> Result<()> {
    match query {
        Query::Companies => {
            for row in queries.companies_and_vacancies_count().await? {
                writeln!(out, "{}: {}", row.company_name, row.vacancies_count)?;
            }
        }
        Query::Vacancies => {
            for row in queries.all_vacancies().await? {
                writeln!(out, "{}", row)?;
            }
        }
        Query::AvgSalary => {
            let avg = queries.avg_salary().await?;
            writeln!(out, "Average salary: {:.2}", avg)?;
        }
        Query::AboveAverage => {
            for row in queries.vacancies_with_higher_salary().await? {
                match row.representative_salary() {
                    Some(value) => writeln!(out, "{} | ~{:.0}", row, value)?,
                    None => writeln!(out, "{}", row)?,
                }
            }
        }
        Query::Search(keyword) => {
            for row in queries.vacancies_with_keyword(keyword).await? {
                writeln!(out, "{}", row)?;
            }
        }
    }
    Ok(())
}
