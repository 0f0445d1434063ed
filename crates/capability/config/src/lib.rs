//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub jwt_access_ttl_seconds: u64,
    pub operator_username: String,
    pub operator_password_hash: String,
    /// 每台设备保留的历史定位条数上限。
    pub max_history: u64,
    pub latest_ttl_seconds: u64,
    pub history_ttl_seconds: u64,
    pub device_ttl_seconds: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("LOCUS_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("LOCUS_JWT_SECRET".to_string()))?;
        let operator_password_hash = env::var("LOCUS_OPERATOR_PASSWORD_HASH")
            .map_err(|_| ConfigError::Missing("LOCUS_OPERATOR_PASSWORD_HASH".to_string()))?;
        let http_addr =
            env::var("LOCUS_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let redis_url =
            env::var("LOCUS_REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let jwt_access_ttl_seconds =
            read_u64_with_default("LOCUS_JWT_ACCESS_TTL_SECONDS", 86_400)?;
        let operator_username =
            env::var("LOCUS_OPERATOR_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let max_history = read_u64_with_default("LOCUS_MAX_HISTORY", 1_440)?;
        let latest_ttl_seconds = read_u64_with_default("LOCUS_LATEST_TTL_SECONDS", 3_600)?;
        let history_ttl_seconds = read_u64_with_default("LOCUS_HISTORY_TTL_SECONDS", 604_800)?;
        let device_ttl_seconds = read_u64_with_default("LOCUS_DEVICE_TTL_SECONDS", 2_592_000)?;

        Ok(Self {
            http_addr,
            redis_url,
            jwt_secret,
            jwt_access_ttl_seconds,
            operator_username,
            operator_password_hash,
            max_history,
            latest_ttl_seconds,
            history_ttl_seconds,
            device_ttl_seconds,
        })
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}
