//! 引导器注册表
//!
//! 按引导器类型（如 "flare"、"dubbo"）注册工厂，根据 provider 的 `bootstrap_kind`
//! 选择工厂创建引导器；provider 未指定时使用注册表的默认类型。

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{DEFAULT_BOOTSTRAP_KIND, ProviderDefaults};
use crate::error::{FlareError, Result};
use crate::provider::ProviderConfig;

use super::{BootstrapResolver, ProviderBootstrap};

/// 引导器工厂
pub type BootstrapFactory<T> =
    Arc<dyn Fn(&ProviderConfig<T>) -> Result<Arc<dyn ProviderBootstrap>> + Send + Sync>;

/// 引导器注册表
pub struct BootstrapRegistry<T: ?Sized> {
    default_kind: String,
    factories: DashMap<String, BootstrapFactory<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> BootstrapRegistry<T> {
    /// 创建注册表，默认类型为 `DEFAULT_BOOTSTRAP_KIND`
    pub fn new() -> Self {
        Self {
            default_kind: DEFAULT_BOOTSTRAP_KIND.to_string(),
            factories: DashMap::new(),
        }
    }

    /// 使用配置中的默认引导器类型
    pub fn from_defaults(defaults: &ProviderDefaults) -> Self {
        Self::new().with_default_kind(defaults.bootstrap.clone())
    }

    pub fn with_default_kind(mut self, kind: impl Into<String>) -> Self {
        self.default_kind = kind.into();
        self
    }

    pub fn default_kind(&self) -> &str {
        &self.default_kind
    }

    /// 注册工厂（同名覆盖）
    pub fn register<F>(&self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&ProviderConfig<T>) -> Result<Arc<dyn ProviderBootstrap>> + Send + Sync + 'static,
    {
        let kind = kind.into();
        info!(kind = %kind, "Registering provider bootstrap");
        self.factories.insert(kind, Arc::new(factory));
    }

    pub fn unregister(&self, kind: &str) -> bool {
        self.factories.remove(kind).is_some()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// 已注册的类型（无序）
    pub fn kinds(&self) -> Vec<String> {
        self.factories.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl<T: ?Sized + Send + Sync + 'static> Default for BootstrapRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + Send + Sync + 'static> BootstrapResolver<T> for BootstrapRegistry<T> {
    fn resolve(&self, config: &ProviderConfig<T>) -> Result<Arc<dyn ProviderBootstrap>> {
        let kind = config
            .bootstrap_kind()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .unwrap_or(self.default_kind.as_str());

        // 工厂在分段锁之外调用
        let factory = self
            .factories
            .get(kind)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| FlareError::bootstrap_not_found(kind))?;

        debug!(kind = %kind, key = %config.build_key(), "Creating provider bootstrap");
        (*factory)(config)
    }
}
