//! 发布引导器
//!
//! `ProviderConfig` 自己不做网络监听和注册中心交互，而是交给引导器：
//! - `BootstrapResolver`：根据 provider 配置（通常是 `bootstrap_kind`）创建引导器
//! - `ProviderBootstrap`：执行实际的发布/取消发布
//!
//! 注意：由于需要动态分发（dyn），`ProviderBootstrap` 使用 async-trait

pub mod ledger;
pub mod registry;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::provider::ProviderConfig;

pub use ledger::ExportLedger;
pub use registry::{BootstrapFactory, BootstrapRegistry};

/// 发布引导器 trait
///
/// 引导器可能进行任意网络/注册中心 I/O，错误原样返回给 `export()` 的调用方。
#[async_trait]
pub trait ProviderBootstrap: Send + Sync {
    /// 发布服务（绑定端口、注册服务等）
    async fn export(&self) -> Result<()>;

    /// 取消发布（注销服务、释放端口等）
    async fn unexport(&self) -> Result<()>;
}

/// 引导器解析 trait
///
/// 每个 `ProviderConfig` 实例最多调用一次。
pub trait BootstrapResolver<T: ?Sized>: Send + Sync {
    fn resolve(&self, config: &ProviderConfig<T>) -> Result<Arc<dyn ProviderBootstrap>>;
}

impl<T, F> BootstrapResolver<T> for F
where
    T: ?Sized,
    F: Fn(&ProviderConfig<T>) -> Result<Arc<dyn ProviderBootstrap>> + Send + Sync,
{
    fn resolve(&self, config: &ProviderConfig<T>) -> Result<Arc<dyn ProviderBootstrap>> {
        self(config)
    }
}
