//! Configuration module
//!
//! All settings come from environment variables (a `.env` file is honored in
//! development). `DATABASE_URL` and `S3_BUCKET` are required; everything else
//! has a sensible default.

use std::env;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const SERVER_PORT: u16 = 8080;
const OLLAMA_URL: &str = "http://localhost:11434";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    // Object storage (S3-compatible, e.g. MinIO)
    pub s3_bucket: String,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_public_url_base: Option<String>,
    // AI categorization. Disabled unless a model is configured.
    pub ollama_url: String,
    pub ollama_model: Option<String>,
    pub ollama_system_prompt: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = parse_cors_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            s3_bucket: env::var("S3_BUCKET")
                .map_err(|_| anyhow::anyhow!("S3_BUCKET must be set"))?,
            s3_region: env::var("S3_REGION").ok().filter(|s| !s.is_empty()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            s3_public_url_base: env::var("S3_PUBLIC_URL_BASE")
                .ok()
                .filter(|s| !s.is_empty()),
            ollama_url: env::var("OLLAMA_URL").unwrap_or_else(|_| OLLAMA_URL.to_string()),
            ollama_model: env::var("OLLAMA_MODEL").ok().filter(|s| !s.is_empty()),
            ollama_system_prompt: env::var("OLLAMA_SYSTEM_PROMPT")
                .ok()
                .filter(|s| !s.is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Whether AI categorization is active
    pub fn categorization_enabled(&self) -> bool {
        self.ollama_model.is_some()
    }
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            server_port: 8080,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            database_url: "postgresql://localhost/tusla".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            jwt_expiry_hours: 24,
            s3_bucket: "tusla".to_string(),
            s3_region: None,
            s3_endpoint: None,
            s3_public_url_base: None,
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: None,
            ollama_system_prompt: None,
        }
    }

    #[test]
    fn test_parse_cors_origins() {
        assert_eq!(parse_cors_origins("*"), vec!["*"]);
        assert_eq!(
            parse_cors_origins("https://a.example, https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(parse_cors_origins("").is_empty());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = sample_config();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wildcard_cors_in_production() {
        let mut config = sample_config();
        config.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.cors_origins = vec!["https://app.example".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_categorization_enabled_requires_model() {
        let mut config = sample_config();
        assert!(!config.categorization_enabled());
        config.ollama_model = Some("llama3".to_string());
        assert!(config.categorization_enabled());
    }

    #[test]
    fn test_is_production() {
        let mut config = sample_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
        config.environment = "prod".to_string();
        assert!(config.is_production());
    }
}
