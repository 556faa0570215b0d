use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Divisor for the total-pages endpoint and the default list page size.
    pub page_size: i64,
    /// Hard ceiling for the `limit` query parameter.
    pub max_limit: i64,
    /// Upper bound for a multipart upload body.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub token_expire_minutes: i64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub media_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // API overrides
        if let Ok(v) = env::var("API_PAGE_SIZE") {
            self.api.page_size = v.parse().unwrap_or(self.api.page_size);
        }
        if let Ok(v) = env::var("API_MAX_LIMIT") {
            self.api.max_limit = v.parse().unwrap_or(self.api.max_limit);
        }
        if let Ok(v) = env::var("API_MAX_UPLOAD_BYTES") {
            self.api.max_upload_bytes = v.parse().unwrap_or(self.api.max_upload_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECRET_KEY") {
            self.security.secret_key = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.security.token_expire_minutes = v.parse().unwrap_or(self.security.token_expire_minutes);
        }
        if let Ok(v) = env::var("BACKEND_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Storage overrides
        if let Ok(v) = env::var("MEDIA_ROOT") {
            self.storage.media_root = PathBuf::from(v);
        }

        // Telegram overrides
        if let Ok(v) = env::var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(v);
        }
        if let Ok(v) = env::var("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = Some(v);
        }

        // A zero page size would make the total-pages division meaningless
        self.api.page_size = self.api.page_size.max(1);
        self.api.max_limit = self.api.max_limit.max(1);

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                acquire_timeout_secs: 30,
            },
            api: ApiConfig {
                page_size: 12,
                max_limit: 1000,
                max_upload_bytes: 20 * 1024 * 1024, // 20MB
            },
            security: SecurityConfig {
                secret_key: "dev-secret-change-me".to_string(),
                token_expire_minutes: 60 * 24, // 1 day
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            storage: StorageConfig {
                media_root: PathBuf::from("media"),
            },
            telegram: TelegramConfig { bot_token: None, chat_id: None },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                acquire_timeout_secs: 5,
            },
            api: ApiConfig {
                page_size: 12,
                max_limit: 100,
                max_upload_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                // No usable default in production; deployments must set SECRET_KEY.
                secret_key: String::new(),
                token_expire_minutes: 30,
                cors_origins: vec![],
            },
            storage: StorageConfig {
                media_root: PathBuf::from("/var/lib/gallery-api/media"),
            },
            telegram: TelegramConfig { bot_token: None, chat_id: None },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
