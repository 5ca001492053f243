//! Flare RPC Provider 错误处理模块
//!
//! 提供统一的错误类型与错误代码分类：
//! - 配置错误：必填项缺失、接口/实现类校验失败、重复发布超限
//! - 解析错误：服务类型或引导器无法解析
//! - 传输错误：引导器发布/取消发布时抛出，原样透传

pub mod code;
pub mod flare_error;

pub use code::{ErrorCategory, ErrorCode};
pub use flare_error::{FlareError, Result};

/// 配置文件加载等基础设施层默认使用的结果类型
pub type InfraResult<T> = anyhow::Result<T>;

/// 将基础设施错误转换为 `FlareError`
pub fn map_infra_error<E, S>(error: E, message: S) -> FlareError
where
    E: std::fmt::Display,
    S: Into<String>,
{
    FlareError::system(format!("{}: {}", message.into(), error))
}

/// `InfraResult` 的辅助扩展，用于快速转换为统一的错误类型
pub trait InfraResultExt<T> {
    fn into_flare<S>(self, message: S) -> Result<T>
    where
        S: Into<String>;
}

impl<T> InfraResultExt<T> for InfraResult<T> {
    fn into_flare<S>(self, message: S) -> Result<T>
    where
        S: Into<String>,
    {
        self.map_err(|err| map_infra_error(err, message))
    }
}
