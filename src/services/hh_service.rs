use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::dto::hh_dto::{EmployerPayload, VacancyPage, VacancyPayload};
use crate::error::{Error, Result};

/// Read-only client for the public hh.ru API.
#[derive(Clone)]
pub struct HhApiClient {
    client: Client,
    base_url: String,
}

impl HhApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(
            &config.hh_api_base,
            &config.hh_user_agent,
            Duration::from_secs(config.hh_timeout_secs),
        )
    }

    pub fn with_base_url(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn fetch_employer(&self, employer_id: i64) -> Result<EmployerPayload> {
        let url = format!("{}/employers/{}", self.base_url, employer_id);
        let response = self.client.get(&url).send().await?;
        let employer = ensure_success(&url, response)?
            .json::<EmployerPayload>()
            .await?;
        Ok(employer)
    }

    /// Walks pages `0..max_pages`, stopping at the first empty page.
    /// A failing page fails the whole call.
    #[instrument(skip(self))]
    pub async fn fetch_vacancies(
        &self,
        employer_id: i64,
        per_page: u32,
        max_pages: u32,
    ) -> Result<Vec<VacancyPayload>> {
        let url = format!("{}/vacancies", self.base_url);
        let mut vacancies = Vec::new();

        for page in 0..max_pages {
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("employer_id", employer_id),
                    ("per_page", i64::from(per_page)),
                    ("page", i64::from(page)),
                ])
                .send()
                .await?;
            let body = ensure_success(&url, response)?.json::<VacancyPage>().await?;

            if body.items.is_empty() {
                debug!(page, "No more vacancies");
                break;
            }
            debug!(page, count = body.items.len(), "Fetched vacancy page");
            vacancies.extend(body.items);
        }

        info!(count = vacancies.len(), "Fetched vacancies");
        Ok(vacancies)
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!(%url, %status, "hh.ru API returned an error status");
        Err(Error::RemoteStatus {
            url: url.to_string(),
            status,
        })
    }
}
