//! Application configuration
//!
//! Flat config loaded once at startup from environment variables (plus an
//! optional `.env` file loaded by the binary). Exposed as a process-wide
//! singleton via `get_config()`.

use std::sync::OnceLock;

use serde::Deserialize;
use tracing::warn;

use crate::errors::Result;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP 监听地址
    pub server_host: String,
    pub server_port: u16,
    /// 存储后端：memory / file
    pub store_backend: String,
    /// file 后端的数据文件路径
    pub data_file: String,
    /// Dashboard API 的 Bearer Token，为空则禁用 Dashboard API
    pub dashboard_token: String,
    /// CORS 允许的来源，为空则允许任意来源
    pub cors_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            store_backend: "memory".to_string(),
            data_file: "meetdash.json".to_string(),
            dashboard_token: String::new(),
            cors_origin: None,
        }
    }
}

impl AppConfig {
    /// 从环境变量加载（SERVER_HOST、SERVER_PORT、STORE_BACKEND 等）
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .set_default("server_host", "127.0.0.1")?
            .set_default("server_port", 8080)?
            .set_default("store_backend", "memory")?
            .set_default("data_file", "meetdash.json")?
            .set_default("dashboard_token", "")?
            .add_source(config::Environment::default())
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// 初始化全局配置（加载失败时回退到默认值）
pub fn init_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| {
        AppConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load config from environment: {}, using defaults", e);
            AppConfig::default()
        })
    })
}

/// 使用显式配置初始化（测试用）；配置已初始化时返回 false
pub fn init_config_with(config: AppConfig) -> bool {
    CONFIG.set(config).is_ok()
}

/// 获取全局配置，未初始化时先按环境变量初始化
pub fn get_config() -> &'static AppConfig {
    init_config()
}
