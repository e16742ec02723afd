mod common;

use common::{stored_employers, stored_vacancies, test_database, TestDatabase};
use hh_vacancies::config::Config;
use hh_vacancies::services::seed_service::{SeedReport, SeedService};
use hh_vacancies::services::vacancy_query_service::VacancyQueryService;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn seed_config(test_db: &TestDatabase, server: &MockServer) -> Config {
    let mut config = test_db.config();
    config.hh_api_base = server.uri();
    config.employer_ids = vec![1, 2];
    config.vacancies_per_page = 2;
    config.vacancy_pages = 3;
    config
}

async fn mount_employer(server: &MockServer, id: i64, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/employers/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id.to_string(),
            "name": name,
            "alternate_url": format!("https://hh.ru/employer/{}", id),
        })))
        .mount(server)
        .await;
}

async fn mount_vacancies(server: &MockServer, employer_id: i64, page: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .and(query_param("employer_id", employer_id.to_string()))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_happy_api(server: &MockServer) {
    mount_employer(server, 1, "Acme").await;
    mount_employer(server, 2, "Globex").await;
    mount_vacancies(
        server,
        1,
        0,
        json!({ "items": [
            {
                "id": "101",
                "name": "Rust Engineer",
                "salary": { "from": 100, "to": 200, "currency": "RUR" },
                "alternate_url": "https://hh.ru/vacancy/101"
            },
            {
                "id": "102",
                "name": "QA Engineer",
                "salary": null,
                "url": "https://api.hh.ru/vacancies/102"
            }
        ]}),
    )
    .await;
    mount_vacancies(server, 1, 1, json!({ "items": [] })).await;
    mount_vacancies(server, 2, 0, json!({ "items": [] })).await;
}

#[tokio::test]
async fn seed_loads_employers_and_vacancies() {
    let Some(test_db) = test_database().await else {
        return;
    };
    let server = MockServer::start().await;
    mount_happy_api(&server).await;

    let seed = SeedService::new(seed_config(&test_db, &server)).unwrap();
    let report = seed.run().await.unwrap();
    assert_eq!(
        report,
        SeedReport {
            employers: 2,
            vacancies: 2
        }
    );

    let employers = stored_employers(&test_db.pool).await;
    let vacancies = stored_vacancies(&test_db.pool).await;
    assert_eq!(employers.len(), 2);
    assert_eq!(vacancies.len(), 2);
    assert_eq!(vacancies[0].employer_id, 1);
    assert_eq!(vacancies[0].salary_from, Some(100));
    assert_eq!(vacancies[1].url, "https://api.hh.ru/vacancies/102");
    assert_eq!(vacancies[1].currency, None);

    let counts: Vec<(String, i64)> = VacancyQueryService::new(test_db.pool.clone())
        .companies_and_vacancies_count()
        .await
        .unwrap()
        .into_iter()
        .map(|row| (row.company_name, row.vacancies_count))
        .collect();
    assert_eq!(
        counts,
        vec![("Acme".to_string(), 2), ("Globex".to_string(), 0)]
    );

    // a second run overwrites instead of duplicating
    seed.run().await.unwrap();
    assert_eq!(stored_employers(&test_db.pool).await, employers);
    assert_eq!(stored_vacancies(&test_db.pool).await, vacancies);

    test_db.teardown().await;
}

#[tokio::test]
async fn seed_aborts_when_any_employer_fails() {
    let Some(test_db) = test_database().await else {
        return;
    };
    let server = MockServer::start().await;
    mount_employer(&server, 1, "Acme").await;
    mount_vacancies(&server, 1, 0, json!({ "items": [] })).await;
    Mock::given(method("GET"))
        .and(path("/employers/2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = SeedService::new(seed_config(&test_db, &server))
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(err.is_remote(), "got {err:?}");
    assert!(stored_employers(&test_db.pool).await.is_empty());
    assert!(stored_vacancies(&test_db.pool).await.is_empty());

    test_db.teardown().await;
}
