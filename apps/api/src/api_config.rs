use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use backoffice_core::{AppError, AppResult, Page};
use tracing_subscriber::EnvFilter;

/// Page size bounds applied to list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 200,
        }
    }
}

impl PaginationConfig {
    /// Resolves request paging, defaulting absent values and clamping the limit.
    pub fn page(&self, page: Option<u32>, limit: Option<u32>) -> AppResult<Page> {
        let limit = limit.unwrap_or(self.default_limit).min(self.max_limit);
        Page::new(page.unwrap_or(1), limit)
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub pagination: PaginationConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parsed_or(&lookup, "API_PORT", 3001_u16)?;
        let database_max_connections = parsed_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10_u32)?;

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_limit: parsed_or(&lookup, "PAGINATION_DEFAULT_LIMIT", defaults.default_limit)?,
            max_limit: parsed_or(&lookup, "PAGINATION_MAX_LIMIT", defaults.max_limit)?,
        };
        if pagination.default_limit == 0 || pagination.max_limit == 0 {
            return Err(AppError::Validation(
                "pagination limits must be greater than zero".to_owned(),
            ));
        }
        if pagination.default_limit > pagination.max_limit {
            return Err(AppError::Validation(format!(
                "PAGINATION_DEFAULT_LIMIT ({}) must not exceed PAGINATION_MAX_LIMIT ({})",
                pagination.default_limit, pagination.max_limit
            )));
        }

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
            pagination,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parsed_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use backoffice_core::AppError;

    use super::{ApiConfig, PaginationConfig};

    fn config_from(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let variables: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(false, |name| variables.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let Ok(config) = config_from(&[("DATABASE_URL", "postgres://localhost/backoffice")]) else {
            panic!("minimal configuration rejected");
        };

        assert_eq!(config.api_port, 3001);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.pagination, PaginationConfig::default());
        assert_eq!(
            config.socket_address().map(|address| address.to_string()).ok(),
            Some("127.0.0.1:3001".to_owned())
        );
    }

    #[test]
    fn missing_database_url_is_a_validation_error() {
        assert!(matches!(config_from(&[]), Err(AppError::Validation(_))));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let result = config_from(&[
            ("DATABASE_URL", "postgres://localhost/backoffice"),
            ("API_PORT", "http"),
        ]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn default_limit_may_not_exceed_max_limit() {
        let result = config_from(&[
            ("DATABASE_URL", "postgres://localhost/backoffice"),
            ("PAGINATION_DEFAULT_LIMIT", "500"),
        ]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn page_defaults_and_clamps_limit() {
        let pagination = PaginationConfig::default();

        let Ok(defaulted) = pagination.page(None, None) else {
            panic!("default page rejected");
        };
        assert_eq!((defaulted.page(), defaulted.limit()), (1, 50));

        let Ok(clamped) = pagination.page(Some(3), Some(10_000)) else {
            panic!("oversized limit rejected");
        };
        assert_eq!((clamped.page(), clamped.limit()), (3, 200));

        assert!(pagination.page(Some(0), None).is_err());
        assert!(pagination.page(None, Some(0)).is_err());
    }
}
