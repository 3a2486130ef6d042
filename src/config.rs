use crate::error::AppError;
use std::env;
use std::str::FromStr;

/// How `time` values that do not normalize to `HH:MM` are treated on write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimePolicy {
    /// Keep the trimmed input as-is.
    #[default]
    Lenient,
    /// Reject the write unless the normalized value is a valid 24-hour `HH:MM`.
    Strict,
}

impl FromStr for TimePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(TimePolicy::Lenient),
            "strict" => Ok(TimePolicy::Strict),
            other => Err(AppError::Configuration(format!(
                "TIME_FORMAT_POLICY must be 'lenient' or 'strict', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: Option<u32>,
    pub time_policy: TimePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Configuration("DATABASE_URL must be set".into()))?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Configuration(format!("PORT must be a number, got '{}'", raw)))?,
            Err(_) => 3000,
        };

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => Some(raw.parse().map_err(|_| {
                AppError::Configuration(format!("DB_MAX_CONNECTIONS must be a number, got '{}'", raw))
            })?),
            Err(_) => None,
        };

        let time_policy = match env::var("TIME_FORMAT_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => TimePolicy::default(),
        };

        Ok(Self {
            database_url,
            port,
            max_connections,
            time_policy,
        })
    }

    pub fn is_postgres(&self) -> bool {
        self.database_url.starts_with("postgres://") || self.database_url.starts_with("postgresql://")
    }
}
