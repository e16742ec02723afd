use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

/// hh.ru employers seeded when `HH_EMPLOYER_IDS` is not set.
pub const DEFAULT_EMPLOYER_IDS: [i64; 10] = [
    1740,  // Yandex
    3529,  // Sber
    78638, // T-Bank
    4181,  // VK
    15478, // Ozon
    2180,  // Alfa-Bank
    3776,  // MTS
    3127,  // Rostelecom
    67611, // Skyeng
    87021, // Kaspersky
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub hh_api_base: String,
    pub hh_user_agent: String,
    pub hh_timeout_secs: u64,
    pub vacancies_per_page: u32,
    pub vacancy_pages: u32,
    pub employer_ids: Vec<i64>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let employer_ids = match env::var("HH_EMPLOYER_IDS") {
            Ok(raw) if !raw.trim().is_empty() => parse_employer_ids(&raw)?,
            _ => DEFAULT_EMPLOYER_IDS.to_vec(),
        };

        Ok(Self {
            db: DbConfig {
                host: get_env_or("DB_HOST", "localhost"),
                port: get_env_parse_or("DB_PORT", 5432)?,
                dbname: get_env_or("DB_NAME", "hh_vacancies"),
                user: get_env_or("DB_USER", "postgres"),
                password: get_env_or("DB_PASSWORD", "postgres"),
            },
            hh_api_base: get_env_or("HH_API_BASE", "https://api.hh.ru")
                .trim_end_matches('/')
                .to_string(),
            hh_user_agent: get_env_or(
                "HH_USER_AGENT",
                concat!("hh-vacancies/", env!("CARGO_PKG_VERSION")),
            ),
            hh_timeout_secs: get_env_parse_or("HH_TIMEOUT_SECS", 15)?,
            vacancies_per_page: get_env_parse_or("HH_VACANCIES_PER_PAGE", 100)?,
            vacancy_pages: get_env_parse_or("HH_VACANCY_PAGES", 2)?,
            employer_ids,
        })
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn parse_employer_ids(raw: &str) -> Result<Vec<i64>> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>().map_err(|e| {
                Error::Config(format!("Invalid employer id {:?} in HH_EMPLOYER_IDS: {}", part, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(Error::Config(
            "HH_EMPLOYER_IDS does not contain any employer id".to_string(),
        ));
    }
    Ok(ids)
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
