use sqlx::PgPool;
use tracing::{info, instrument};

use crate::config::Config;
use crate::database::pool::create_pool;
use crate::database::schema::{create_database, create_tables};
use crate::error::Result;
use crate::models::employer::Employer;
use crate::models::vacancy::Vacancy;
use crate::services::hh_service::HhApiClient;
use crate::services::upsert_service::UpsertService;

/// Rows gathered from hh.ru, ready to be written.
#[derive(Debug, Clone, Default)]
pub struct SeedBatch {
    pub employers: Vec<Employer>,
    pub vacancies: Vec<Vacancy>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub employers: u64,
    pub vacancies: u64,
}

/// Creates storage, pulls the configured employers from hh.ru and upserts them.
pub struct SeedService {
    config: Config,
    api: HhApiClient,
}

impl SeedService {
    pub fn new(config: Config) -> Result<Self> {
        let api = HhApiClient::new(&config)?;
        Ok(Self { config, api })
    }

    #[instrument(skip(self), fields(employers = self.config.employer_ids.len()))]
    pub async fn run(&self) -> Result<SeedReport> {
        create_database(&self.config.db).await?;

        let pool = create_pool(&self.config.db).await?;
        let result = self.seed_into(&pool).await;
        pool.close().await;

        let report = result?;
        info!(
            employers = report.employers,
            vacancies = report.vacancies,
            "Seed finished"
        );
        Ok(report)
    }

    async fn seed_into(&self, pool: &PgPool) -> Result<SeedReport> {
        create_tables(pool).await?;

        let batch = self.collect().await?;

        let writer = UpsertService::new(pool.clone());
        let employers = writer.upsert_employers(&batch.employers).await?;
        let vacancies = writer.upsert_vacancies(&batch.vacancies).await?;

        Ok(SeedReport {
            employers,
            vacancies,
        })
    }

    /// Fetches every configured employer in order. The first failure aborts
    /// the run, before anything is written.
    pub async fn collect(&self) -> Result<SeedBatch> {
        let mut batch = SeedBatch::default();

        for &employer_id in &self.config.employer_ids {
            let employer = Employer::from(self.api.fetch_employer(employer_id).await?);
            let payloads = self
                .api
                .fetch_vacancies(
                    employer_id,
                    self.config.vacancies_per_page,
                    self.config.vacancy_pages,
                )
                .await?;

            info!(
                employer_id = employer.employer_id,
                name = %employer.name,
                vacancies = payloads.len(),
                "Collected employer"
            );

            batch.vacancies.extend(
                payloads
                    .into_iter()
                    .map(|payload| payload.into_vacancy(employer.employer_id)),
            );
            batch.employers.push(employer);
        }

        Ok(batch)
    }
}
