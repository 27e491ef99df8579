//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_AWS_BUCKET, DEFAULT_AWS_REGION, DEFAULT_DATABASE_URL, DEFAULT_FRONTEND_URL,
    DEFAULT_MAIL_FROM, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_STATIC_DIR,
    MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

const DEV_ACCESS_SECRET: &str = "dev-access-secret-minimum-32-chars!!";
const DEV_REFRESH_SECRET: &str = "dev-refresh-secret-minimum-32-chars!";
const DEV_RESET_SECRET: &str = "dev-reset-secret-minimum-32-chars!!!";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    access_token_secret: String,
    refresh_token_secret: String,
    reset_token_secret: String,
    pub server_host: String,
    pub server_port: u16,
    /// Browser origin of the SPA; used for CORS and reset links
    pub frontend_url: String,
    /// Directory holding the built SPA
    pub static_dir: String,
    pub aws_region: String,
    pub aws_bucket: String,
    /// Custom S3 endpoint (MinIO, localstack)
    pub aws_endpoint: Option<String>,
    /// Sender shown on logged mail
    pub mail_from: String,
    /// Adds the `Secure` attribute to the refresh cookie
    pub cookie_secure: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("access_token_secret", &"[REDACTED]")
            .field("refresh_token_secret", &"[REDACTED]")
            .field("reset_token_secret", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("frontend_url", &self.frontend_url)
            .field("static_dir", &self.static_dir)
            .field("aws_region", &self.aws_region)
            .field("aws_bucket", &self.aws_bucket)
            .field("aws_endpoint", &self.aws_endpoint)
            .field("mail_from", &self.mail_from)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl Default for Config {
    /// Development configuration; never used by `from_env` in release builds.
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            access_token_secret: DEV_ACCESS_SECRET.to_string(),
            refresh_token_secret: DEV_REFRESH_SECRET.to_string(),
            reset_token_secret: DEV_RESET_SECRET.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            aws_region: DEFAULT_AWS_REGION.to_string(),
            aws_bucket: DEFAULT_AWS_BUCKET.to_string(),
            aws_endpoint: None,
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            cookie_secure: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Token secrets fall back to development values in debug builds only.
    /// A missing or short secret in a release build is an error.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let access_token_secret = secret("ACCESS_TOKEN_SECRET", DEV_ACCESS_SECRET)?;
        let refresh_token_secret = secret("REFRESH_TOKEN_SECRET", DEV_REFRESH_SECRET)?;
        let reset_token_secret = secret("RESET_PASSWORD_TOKEN_SECRET", DEV_RESET_SECRET)?;

        if access_token_secret == refresh_token_secret
            || access_token_secret == reset_token_secret
            || refresh_token_secret == reset_token_secret
        {
            return Err(AppError::internal("token secrets must be distinct"));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            access_token_secret,
            refresh_token_secret,
            reset_token_secret,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_AWS_REGION.to_string()),
            aws_bucket: env::var("AWS_BUCKET_NAME")
                .unwrap_or_else(|_| DEFAULT_AWS_BUCKET.to_string()),
            aws_endpoint: env::var("AWS_ENDPOINT_URL").ok(),
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string()),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }

    /// Secret used to sign and verify access tokens.
    pub fn access_secret_bytes(&self) -> &[u8] {
        self.access_token_secret.as_bytes()
    }

    /// Secret used to sign and verify refresh tokens.
    pub fn refresh_secret_bytes(&self) -> &[u8] {
        self.refresh_token_secret.as_bytes()
    }

    /// Secret used to sign and verify password reset tokens.
    pub fn reset_secret_bytes(&self) -> &[u8] {
        self.reset_token_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn secret(name: &str, dev_default: &str) -> AppResult<String> {
    let value = match env::var(name) {
        Ok(value) => value,
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("{} not set, using insecure default for development", name);
            dev_default.to_string()
        }
        Err(_) => {
            return Err(AppError::internal(format!(
                "{} environment variable must be set in production",
                name
            )))
        }
    };

    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(AppError::internal(format!(
            "{} must be at least {} characters long",
            name, MIN_JWT_SECRET_LENGTH
        )));
    }

    Ok(value)
}
