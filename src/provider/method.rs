//! 方法级配置

use serde::{Deserialize, Serialize};

/// 方法级覆盖配置
///
/// 未设置或 <=0 的值表示沿用 provider 级别的配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodOverride {
    /// 方法名
    pub name: String,

    /// 调用超时（毫秒）
    pub timeout: Option<i32>,

    /// 最大并发调用数
    pub concurrents: Option<i32>,
}

impl MethodOverride {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timeout: None,
            concurrents: None,
        }
    }

    pub fn with_timeout(mut self, timeout: i32) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_concurrents(mut self, concurrents: i32) -> Self {
        self.concurrents = Some(concurrents);
        self
    }

    /// 是否设置了生效的超时
    pub fn has_timeout(&self) -> bool {
        self.timeout.is_some_and(|timeout| timeout > 0)
    }

    /// 是否设置了生效的并发限制
    pub fn has_concurrents(&self) -> bool {
        self.concurrents.is_some_and(|concurrents| concurrents > 0)
    }
}
