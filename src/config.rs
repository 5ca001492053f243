//! 配置模块
//!
//! 服务提供者的全局默认值与日志配置，支持从 TOML 文件加载，并允许通过环境变量覆盖：
//!
//! ```toml
//! [provider]
//! delay = -1
//! weight = 100
//! timeout = 3000
//! bootstrap = "flare"
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::InfraResult;

/// 未指定 bootstrap 时使用的默认引导器类型
pub const DEFAULT_BOOTSTRAP_KIND: &str = "flare";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderDefaults,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load_from_file(path: &str) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("failed to parse config file {}", path))
    }

    pub fn from_toml_str(content: &str) -> InfraResult<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

/// 服务提供者默认值
///
/// 新建的 `ProviderConfig` 从这里取初值，单个 provider 可以再覆盖。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderDefaults {
    /// 延迟发布（毫秒），0 立即发布，负数表示等待手动发布
    pub delay: i32,
    /// 权重
    pub weight: i32,
    /// 发布的方法列表，逗号分隔，`*` 表示全部
    pub include: String,
    /// 不发布的方法列表，逗号分隔
    pub exclude: String,
    /// 是否动态注册
    pub dynamic: bool,
    /// 服务优先级
    pub priority: i32,
    /// 服务端调用超时（毫秒），<=0 表示不限制
    pub timeout: i32,
    /// 服务端最大并发调用数，<=0 表示不限制
    pub concurrents: i32,
    /// 同一 interfaceId + uniqueId 的最大发布次数，-1 表示不检查
    pub repeated_export_limit: i32,
    /// 默认引导器类型
    pub bootstrap: String,
}

impl Default for ProviderDefaults {
    fn default() -> Self {
        Self {
            delay: -1,
            weight: 100,
            include: "*".to_string(),
            exclude: String::new(),
            dynamic: true,
            priority: 0,
            timeout: 0,
            concurrents: 0,
            repeated_export_limit: 1,
            bootstrap: DEFAULT_BOOTSTRAP_KIND.to_string(),
        }
    }
}

impl ProviderDefaults {
    /// 使用环境变量覆盖默认值
    ///
    /// - `FLARE_PROVIDER_DELAY`
    /// - `FLARE_PROVIDER_TIMEOUT`
    /// - `FLARE_PROVIDER_CONCURRENTS`
    /// - `FLARE_PROVIDER_BOOTSTRAP`
    ///
    /// 无法解析的数值会被忽略并保留原值。
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(delay) = env_i32("FLARE_PROVIDER_DELAY") {
            self.delay = delay;
        }
        if let Some(timeout) = env_i32("FLARE_PROVIDER_TIMEOUT") {
            self.timeout = timeout;
        }
        if let Some(concurrents) = env_i32("FLARE_PROVIDER_CONCURRENTS") {
            self.concurrents = concurrents;
        }
        if let Ok(bootstrap) = std::env::var("FLARE_PROVIDER_BOOTSTRAP") {
            if !bootstrap.trim().is_empty() {
                self.bootstrap = bootstrap.trim().to_string();
            }
        }
        self
    }
}

fn env_i32(key: &str) -> Option<i32> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key = %key, value = %raw, "Ignoring unparsable provider override");
            None
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别（RUST_LOG 优先）
    pub level: String,
    /// 是否输出 JSON 格式
    pub json: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_file: bool,
    pub with_line_number: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            with_target: true,
            with_thread_ids: false,
            with_file: false,
            with_line_number: false,
        }
    }
}
