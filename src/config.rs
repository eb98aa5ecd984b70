use anyhow::{Context, Result};
use std::env;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Connection details for the record service.
#[derive(Debug, Clone)]
pub struct RecordServiceSettings {
    pub base_url: Url,
    pub project_id: String,
    pub public_key: String,
    pub timeout_seconds: u64,
    pub task_table: String,
    pub user_table: String,
    pub page_limit: u32,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Record service
    pub records: RecordServiceSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Record service
        let base_url = env::var("RECORD_SERVICE_URL").context("RECORD_SERVICE_URL must be set")?;
        let base_url = Url::parse(&base_url).context("RECORD_SERVICE_URL is not a valid URL")?;
        let project_id = env::var("RECORD_PROJECT_ID").context("RECORD_PROJECT_ID must be set")?;
        let public_key = env::var("RECORD_PUBLIC_KEY").context("RECORD_PUBLIC_KEY must be set")?;
        let timeout_seconds = parse_or("RECORD_TIMEOUT_SECONDS", 30);
        let task_table = env::var("TASK_TABLE").unwrap_or_else(|_| "task18".to_string());
        let user_table = env::var("USER_TABLE").unwrap_or_else(|_| "User".to_string());
        let page_limit = parse_or("TASK_PAGE_LIMIT", 100);

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            records: RecordServiceSettings {
                base_url,
                project_id,
                public_key,
                timeout_seconds,
                task_table,
                user_table,
                page_limit,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_names() {
        assert_eq!(Environment::from_str("Production"), Environment::Prod);
        assert_eq!(Environment::from_str("staging"), Environment::Staging);
        assert_eq!(Environment::from_str("anything"), Environment::Dev);
        assert!(Environment::Dev.is_dev());
    }
}
