pub mod hh_service;
pub mod seed_service;
pub mod upsert_service;
pub mod vacancy_query_service;
