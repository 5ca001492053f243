//! 错误代码和错误类别定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误代码枚举
///
/// 错误代码按类别分组，每个类别占用1000个代码范围：
/// - 1000-1999: 配置相关错误
/// - 2000-2999: 解析相关错误（类型解析、引导器解析）
/// - 3000-3999: 发布相关错误（由引导器抛出）
/// - 6000-6999: 系统相关错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 配置相关错误 (1000-1999)
    // ============================================================
    ConfigurationError = 1000,
    InvalidParameter = 1001,
    RepeatedExportLimitExceeded = 1002,

    // ============================================================
    // 解析相关错误 (2000-2999)
    // ============================================================
    ResolutionFailed = 2000,
    ServiceTypeNotFound = 2001,
    BootstrapNotFound = 2002,

    // ============================================================
    // 发布相关错误 (3000-3999)
    // ============================================================
    TransportError = 3000,

    // ============================================================
    // 系统相关错误 (6000-6999)
    // ============================================================
    InternalError = 6000,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    /// 获取错误代码的数字值
    #[inline]
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// 从数字值创建错误代码
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            1000 => Some(ErrorCode::ConfigurationError),
            1001 => Some(ErrorCode::InvalidParameter),
            1002 => Some(ErrorCode::RepeatedExportLimitExceeded),
            2000 => Some(ErrorCode::ResolutionFailed),
            2001 => Some(ErrorCode::ServiceTypeNotFound),
            2002 => Some(ErrorCode::BootstrapNotFound),
            3000 => Some(ErrorCode::TransportError),
            6000 => Some(ErrorCode::InternalError),
            _ => None,
        }
    }

    /// 获取错误代码的英文标识符
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::RepeatedExportLimitExceeded => "REPEATED_EXPORT_LIMIT_EXCEEDED",
            ErrorCode::ResolutionFailed => "RESOLUTION_FAILED",
            ErrorCode::ServiceTypeNotFound => "SERVICE_TYPE_NOT_FOUND",
            ErrorCode::BootstrapNotFound => "BOOTSTRAP_NOT_FOUND",
            ErrorCode::TransportError => "TRANSPORT_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// 获取错误代码的类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_u32() {
            1000..=1999 => ErrorCategory::Configuration,
            2000..=2999 => ErrorCategory::Resolution,
            3000..=3999 => ErrorCategory::Transport,
            _ => ErrorCategory::System,
        }
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Configuration,
    Resolution,
    Transport,
    System,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "CONFIGURATION"),
            ErrorCategory::Resolution => write!(f, "RESOLUTION"),
            ErrorCategory::Transport => write!(f, "TRANSPORT"),
            ErrorCategory::System => write!(f, "SYSTEM"),
        }
    }
}
