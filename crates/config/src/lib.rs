//! freight-config - 配置加载库
//!
//! 合并顺序: `{dir}/default.toml` -> `{dir}/{APP_ENV}.toml` -> `FREIGHT_` 前缀环境变量
//! (嵌套字段用 `__` 分隔，如 `FREIGHT_POLICY__SCOPE_MODE=strict`)

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 仓库作用域的判定模式
///
/// 两种模式下，双方仓库都已知且不相等时一律拒绝；
/// 区别只在缺少仓库上下文时的处理。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    /// 缺少上下文时放行，由资源服务层按仓库过滤 (UI 提示用途)
    #[default]
    Lenient,
    /// 缺少上下文时拒绝
    Strict,
}

/// 权限策略配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// 策略表 TOML 文件路径，缺省使用内置物流策略表
    pub table_path: Option<String>,
    #[serde(default)]
    pub scope_mode: ScopeMode,
}

/// JWT 配置
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_issuer() -> String {
    "freight-identity".to_string()
}

fn default_audience() -> String {
    "freight-portal".to_string()
}

fn default_expires_in() -> i64 {
    3600
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    pub jwt: Option<JwtConfig>,
}

fn default_app_name() -> String {
    "freight".to_string()
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("FREIGHT_").split("__"))
            .extract()?;

        Ok(config)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
