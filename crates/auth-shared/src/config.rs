//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_CORS_MAX_AGE_SECS, DEFAULT_SESSION_LIFETIME_SECS, MIN_SECRET_BYTES};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub jwt: JwtSettings,
    pub session: SessionSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub seed_demo_users: bool,
}

#[derive(Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
}

// Never print the secret, not even in debug output.
impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &format_args!("<{} bytes>", self.secret.len()))
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Base session lifetime in whole seconds.
    pub lifetime_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_secs: u64,
}

impl CorsSettings {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin.trim() == "*")
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "auth-server")?
            .set_default("app.seed_demo_users", false)?
            .set_default("session.lifetime_secs", DEFAULT_SESSION_LIFETIME_SECS)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .set_default("cors.allow_credentials", true)?
            .set_default("cors.max_age_secs", DEFAULT_CORS_MAX_AGE_SECS)
    }

    /// Reject settings the token engine cannot run with, before anything starts.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.session.lifetime_secs <= 0 {
            return Err(AppError::InvalidConfig(format!(
                "session.lifetime_secs must be positive, got {}",
                self.session.lifetime_secs
            )));
        }
        if self.jwt.secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::InvalidConfig(format!(
                "jwt.secret must be at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                self.jwt.secret.len()
            )));
        }
        if self.cors.allow_credentials && self.cors.allows_any_origin() {
            return Err(AppError::InvalidConfig(
                "cors.allowed_origins cannot contain \"*\" while cors.allow_credentials is set".to_string(),
            ));
        }
        Ok(())
    }
}
