//! Flare RPC 统一错误类型

use super::code::{ErrorCategory, ErrorCode};
use thiserror::Error;

/// Flare RPC 统一错误类型
#[derive(Error, Debug, Clone)]
pub enum FlareError {
    /// 配置错误（必填项缺失、取值非法、接口/实现类校验失败）
    #[error("配置项 {field} 的值 [{value}] 不合法: {reason}{}", format_details(.details))]
    Configuration {
        code: ErrorCode,
        field: String,
        value: String,
        reason: String,
        details: Option<String>,
        #[source]
        cause: Option<Box<FlareError>>,
    },

    /// 解析错误（服务类型或引导器无法解析）
    #[error("无法解析 {target} [{name}]: {reason}")]
    Resolution {
        code: ErrorCode,
        target: String,
        name: String,
        reason: String,
    },

    /// 传输错误（由引导器在发布/取消发布时抛出，原样透传）
    #[error("传输错误: {0}")]
    Transport(String),

    /// 系统错误（用于内部错误）
    #[error("系统错误: {0}")]
    System(String),
}

impl FlareError {
    /// 创建配置错误
    pub fn configuration(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FlareError::Configuration {
            code: ErrorCode::ConfigurationError,
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            details: None,
            cause: None,
        }
    }

    /// 创建解析错误
    pub fn resolution(
        code: ErrorCode,
        target: impl Into<String>,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FlareError::Resolution {
            code,
            target: target.into(),
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// 创建传输错误
    pub fn transport(msg: impl Into<String>) -> Self {
        FlareError::Transport(msg.into())
    }

    /// 创建系统错误
    pub fn system(msg: impl Into<String>) -> Self {
        FlareError::System(msg.into())
    }

    // ============================================================
    // 便捷方法：解析相关错误
    // ============================================================

    /// 服务类型不存在
    pub fn service_type_not_found(name: impl Into<String>) -> Self {
        Self::resolution(
            ErrorCode::ServiceTypeNotFound,
            "service type",
            name,
            "type not found",
        )
    }

    /// 引导器类型未注册
    pub fn bootstrap_not_found(kind: impl Into<String>) -> Self {
        Self::resolution(
            ErrorCode::BootstrapNotFound,
            "bootstrap",
            kind,
            "no bootstrap registered for this kind",
        )
    }

    // ============================================================
    // 链式修饰
    // ============================================================

    /// 替换错误代码（仅对配置错误与解析错误生效）
    #[must_use]
    pub fn with_code(mut self, new_code: ErrorCode) -> Self {
        match &mut self {
            FlareError::Configuration { code, .. } | FlareError::Resolution { code, .. } => {
                *code = new_code;
            }
            _ => {}
        }
        self
    }

    /// 添加错误详情（仅对配置错误生效）
    #[must_use]
    pub fn with_details(mut self, detail: impl Into<String>) -> Self {
        if let FlareError::Configuration { details, .. } = &mut self {
            *details = Some(detail.into());
        }
        self
    }

    /// 附加底层原因（仅对配置错误生效）
    #[must_use]
    pub fn with_cause(mut self, source: FlareError) -> Self {
        if let FlareError::Configuration { cause, .. } = &mut self {
            *cause = Some(Box::new(source));
        }
        self
    }

    // ============================================================
    // 信息获取方法
    // ============================================================

    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            FlareError::Configuration { code, .. } | FlareError::Resolution { code, .. } => *code,
            FlareError::Transport(_) => ErrorCode::TransportError,
            FlareError::System(_) => ErrorCode::InternalError,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// 是否为配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(self, FlareError::Configuration { .. })
    }

    /// 是否为解析错误
    pub fn is_resolution(&self) -> bool {
        matches!(self, FlareError::Resolution { .. })
    }

    /// 获取错误原因
    pub fn reason(&self) -> &str {
        match self {
            FlareError::Configuration { reason, .. } | FlareError::Resolution { reason, .. } => {
                reason
            }
            FlareError::Transport(msg) | FlareError::System(msg) => msg,
        }
    }

    /// 获取出错的配置项名称
    pub fn field(&self) -> Option<&str> {
        match self {
            FlareError::Configuration { field, .. } => Some(field),
            _ => None,
        }
    }

    /// 获取错误详情
    pub fn details(&self) -> Option<&str> {
        match self {
            FlareError::Configuration { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    /// 获取被包装的底层错误
    pub fn cause(&self) -> Option<&FlareError> {
        match self {
            FlareError::Configuration { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }
}

fn format_details(details: &Option<String>) -> String {
    details
        .as_deref()
        .map(|details| format!(" ({})", details))
        .unwrap_or_default()
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, FlareError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn configuration_message_names_field_and_value() {
        let err = FlareError::configuration("service.interfaceId", "null", "interfaceId must be not null");
        assert_eq!(
            err.to_string(),
            "配置项 service.interfaceId 的值 [null] 不合法: interfaceId must be not null"
        );
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
        assert!(err.source().is_none());
    }

    #[test]
    fn configuration_message_includes_details() {
        let err = FlareError::configuration(
            "service.interfaceId",
            "com.x.FooImpl",
            "interfaceId must set interface class, not implement class",
        )
        .with_details("protocol=bolt");
        assert_eq!(
            err.to_string(),
            "配置项 service.interfaceId 的值 [com.x.FooImpl] 不合法: \
             interfaceId must set interface class, not implement class (protocol=bolt)"
        );
    }

    #[test]
    fn cause_is_exposed_as_source() {
        let err = FlareError::configuration("service.interfaceId", "com.x.Missing", "lookup failed")
            .with_cause(FlareError::service_type_not_found("com.x.Missing"));

        let source = err.source().expect("source");
        assert!(source.to_string().contains("com.x.Missing"));
        assert_eq!(err.cause().map(FlareError::code), Some(ErrorCode::ServiceTypeNotFound));
    }

    #[test]
    fn modifiers_ignore_passthrough_variants() {
        let err = FlareError::transport("bind failed")
            .with_details("port 12200")
            .with_code(ErrorCode::InvalidParameter);
        assert_eq!(err.code(), ErrorCode::TransportError);
        assert!(err.details().is_none());
        assert_eq!(err.reason(), "bind failed");
    }
}
