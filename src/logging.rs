//! 日志初始化

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;
use crate::error::{FlareError, Result};

/// 从配置初始化日志系统
///
/// 优先使用环境变量 `RUST_LOG`，否则使用配置中的日志级别。
/// 重复初始化会返回错误而不是 panic，方便在测试中多次调用。
///
/// # 示例
/// ```rust,no_run
/// use flare_rpc_provider::config::LoggingConfig;
/// use flare_rpc_provider::logging::init_tracing;
///
/// init_tracing(None).ok();
///
/// let config = LoggingConfig {
///     json: true,
///     ..Default::default()
/// };
/// init_tracing(Some(&config)).ok();
/// ```
pub fn init_tracing(logging_config: Option<&LoggingConfig>) -> Result<()> {
    let default_config = LoggingConfig::default();
    let config = logging_config.unwrap_or(&default_config);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(config.level.as_str()),
    };

    let builder = fmt::Subscriber::builder()
        .with_target(config.with_target)
        .with_thread_ids(config.with_thread_ids)
        .with_file(config.with_file)
        .with_line_number(config.with_line_number)
        .with_env_filter(env_filter);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| FlareError::system(format!("failed to install tracing subscriber: {}", e)))
}
