//! 服务提供者配置
//!
//! `ProviderConfig` 把一个服务实现绑定到若干服务端协议上，负责：
//! - 接口/实现类校验（`resolve_service_type`）
//! - 发布标识（`build_key`）
//! - provider 级与方法级的超时/并发阈值判断
//! - 发布与取消发布（委托给引导器，引导器只解析一次）
//!
//! 所有 `with_*` 方法都消费 `self`，生命周期方法只需要 `&self`。
//! 一旦放进 `Arc` 共享出去，配置就不能再修改。

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::bootstrap::{BootstrapResolver, ProviderBootstrap};
use crate::config::ProviderDefaults;
use crate::error::{ErrorCode, FlareError, Result};
use crate::types::{ServiceType, TypeResolver};

use super::binding::EndpointBinding;
use super::filter::MethodFilter;
use super::limits::MethodLimitTable;
use super::method::MethodOverride;
use super::schedule::ExportDelay;

const FIELD_INTERFACE_ID: &str = "service.interfaceId";

/// 服务提供者配置
///
/// # 使用示例
/// ```rust,no_run
/// use std::sync::Arc;
/// use flare_rpc_provider::provider::{EndpointBinding, MethodOverride, ProviderConfig, PROTOCOL_BOLT};
///
/// trait EchoService: Send + Sync {
///     fn echo(&self, msg: &str) -> String;
/// }
///
/// struct EchoServiceImpl;
/// impl EchoService for EchoServiceImpl {
///     fn echo(&self, msg: &str) -> String {
///         msg.to_string()
///     }
/// }
///
/// let provider = ProviderConfig::<dyn EchoService>::new()
///     .with_interface_id("com.flare.EchoService")
///     .with_unique_id("v1")
///     .with_ref(Arc::new(EchoServiceImpl))
///     .with_binding(EndpointBinding::new(PROTOCOL_BOLT).with_port(12200))
///     .with_method(MethodOverride::new("echo").with_timeout(500));
///
/// assert_eq!(provider.build_key(), "com.flare.EchoService:v1");
/// assert!(provider.has_timeout());
/// ```
pub struct ProviderConfig<T: ?Sized> {
    service_ref: Option<Arc<T>>,
    interface_id: String,
    unique_id: String,
    bindings: Vec<EndpointBinding>,
    delay: i32,
    weight: i32,
    include: String,
    exclude: String,
    dynamic: bool,
    priority: i32,
    bootstrap_kind: Option<String>,
    timeout: i32,
    concurrents: i32,
    repeated_export_limit: i32,
    methods: HashMap<String, MethodOverride>,
    parameters: HashMap<String, String>,

    type_resolver: Option<Arc<dyn TypeResolver>>,
    bootstrap_resolver: Option<Arc<dyn BootstrapResolver<T>>>,

    service_type: OnceCell<ServiceType>,
    method_filter: OnceCell<MethodFilter>,
    method_limits: OnceCell<Arc<MethodLimitTable>>,
    bootstrap: OnceCell<Arc<dyn ProviderBootstrap>>,
    lifecycle: Mutex<()>,
}

impl<T: ?Sized + Send + Sync + 'static> ProviderConfig<T> {
    /// 使用内置默认值创建
    pub fn new() -> Self {
        Self::from_defaults(&ProviderDefaults::default())
    }

    /// 使用给定的默认值创建
    pub fn from_defaults(defaults: &ProviderDefaults) -> Self {
        Self {
            service_ref: None,
            interface_id: String::new(),
            unique_id: String::new(),
            bindings: Vec::new(),
            delay: defaults.delay,
            weight: defaults.weight,
            include: defaults.include.clone(),
            exclude: defaults.exclude.clone(),
            dynamic: defaults.dynamic,
            priority: defaults.priority,
            bootstrap_kind: None,
            timeout: defaults.timeout,
            concurrents: defaults.concurrents,
            repeated_export_limit: defaults.repeated_export_limit,
            methods: HashMap::new(),
            parameters: HashMap::new(),
            type_resolver: None,
            bootstrap_resolver: None,
            service_type: OnceCell::new(),
            method_filter: OnceCell::new(),
            method_limits: OnceCell::new(),
            bootstrap: OnceCell::new(),
            lifecycle: Mutex::new(()),
        }
    }

    // ============================================================
    // 构建方法
    // ============================================================

    /// 设置服务实现
    pub fn with_ref(mut self, service_ref: Arc<T>) -> Self {
        self.service_ref = Some(service_ref);
        self
    }

    /// 设置服务接口名
    pub fn with_interface_id(mut self, interface_id: impl Into<String>) -> Self {
        self.interface_id = interface_id.into();
        self.service_type = OnceCell::new();
        self
    }

    /// 设置服务唯一标识
    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = unique_id.into();
        self
    }

    /// 追加一个服务端绑定
    pub fn with_binding(mut self, binding: EndpointBinding) -> Self {
        self.bindings.push(binding);
        self.service_type = OnceCell::new();
        self
    }

    /// 替换全部服务端绑定
    pub fn with_bindings(mut self, bindings: Vec<EndpointBinding>) -> Self {
        self.bindings = bindings;
        self.service_type = OnceCell::new();
        self
    }

    pub fn with_delay(mut self, delay: i32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = include.into();
        self.method_filter = OnceCell::new();
        self
    }

    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = exclude.into();
        self.method_filter = OnceCell::new();
        self
    }

    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 设置引导器类型
    pub fn with_bootstrap_kind(mut self, kind: impl Into<String>) -> Self {
        self.bootstrap_kind = Some(kind.into());
        self
    }

    pub fn with_timeout(mut self, timeout: i32) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrents(mut self, concurrents: i32) -> Self {
        self.concurrents = concurrents;
        self
    }

    /// 设置重复发布上限，-1 表示不检查
    pub fn with_repeated_export_limit(mut self, limit: i32) -> Self {
        self.repeated_export_limit = limit;
        self
    }

    /// 添加方法级配置（同名覆盖）
    pub fn with_method(mut self, method: MethodOverride) -> Self {
        self.methods.insert(method.name.clone(), method);
        self
    }

    /// 替换全部方法级配置
    pub fn with_methods(mut self, methods: HashMap<String, MethodOverride>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// 使用外部提供的方法限流标记表
    pub fn with_method_limits(mut self, table: Arc<MethodLimitTable>) -> Self {
        self.method_limits = OnceCell::with_value(table);
        self
    }

    /// 设置类型解析器
    pub fn with_type_resolver(mut self, resolver: Arc<dyn TypeResolver>) -> Self {
        self.type_resolver = Some(resolver);
        self.service_type = OnceCell::new();
        self
    }

    /// 设置引导器解析器
    pub fn with_bootstrap_resolver(mut self, resolver: Arc<dyn BootstrapResolver<T>>) -> Self {
        self.bootstrap_resolver = Some(resolver);
        self
    }

    /// 预先指定引导器，发布时不再调用解析器
    pub fn with_bootstrap(mut self, bootstrap: Arc<dyn ProviderBootstrap>) -> Self {
        self.bootstrap = OnceCell::with_value(bootstrap);
        self
    }

    // ============================================================
    // 属性读取
    // ============================================================

    pub fn service_ref(&self) -> Option<&Arc<T>> {
        self.service_ref.as_ref()
    }

    pub fn interface_id(&self) -> &str {
        &self.interface_id
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn bindings(&self) -> &[EndpointBinding] {
        &self.bindings
    }

    pub fn delay(&self) -> i32 {
        self.delay
    }

    /// 延迟发布策略
    pub fn export_delay(&self) -> ExportDelay {
        ExportDelay::from_millis(self.delay)
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn include(&self) -> &str {
        &self.include
    }

    pub fn exclude(&self) -> &str {
        &self.exclude
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn bootstrap_kind(&self) -> Option<&str> {
        self.bootstrap_kind.as_deref()
    }

    pub fn timeout(&self) -> i32 {
        self.timeout
    }

    pub fn concurrents(&self) -> i32 {
        self.concurrents
    }

    /// 原样返回，不解释 -1 等哨兵值
    pub fn repeated_export_limit(&self) -> i32 {
        self.repeated_export_limit
    }

    pub fn methods(&self) -> &HashMap<String, MethodOverride> {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodOverride> {
        self.methods.get(name)
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    // ============================================================
    // 校验与标识
    // ============================================================

    /// 解析并校验服务接口类型
    ///
    /// 成功结果会被缓存，后续调用直接返回缓存值。
    /// 查找失败会被包装成一次配置错误；已经是配置错误的直接返回，不重复包装。
    pub fn resolve_service_type(&self) -> Result<&ServiceType> {
        self.service_type.get_or_try_init(|| self.load_service_type())
    }

    fn ensure_interface_id(&self) -> Result<()> {
        if self.interface_id.trim().is_empty() {
            return Err(FlareError::configuration(
                FIELD_INTERFACE_ID,
                "null",
                "interfaceId must be not null",
            ));
        }
        Ok(())
    }

    fn load_service_type(&self) -> Result<ServiceType> {
        self.ensure_interface_id()?;

        let service_type = self.lookup_service_type().map_err(|err| {
            if err.is_configuration() {
                err
            } else {
                FlareError::configuration(
                    FIELD_INTERFACE_ID,
                    self.interface_id.as_str(),
                    "failed to resolve service type",
                )
                .with_cause(err)
            }
        })?;

        if !service_type.is_interface() {
            if let Some(binding) = self
                .bindings
                .iter()
                .find(|binding| !binding.permits_implementation_type())
            {
                warn!(
                    interface_id = %self.interface_id,
                    protocol = %binding.protocol,
                    "Implementation type exported over a protocol that requires an interface"
                );
                return Err(FlareError::configuration(
                    FIELD_INTERFACE_ID,
                    self.interface_id.as_str(),
                    "interfaceId must set interface class, not implement class",
                )
                .with_details(format!("protocol={}", binding.protocol)));
            }
        }

        debug!(
            interface_id = %self.interface_id,
            kind = ?service_type.kind,
            "Service type resolved"
        );
        Ok(service_type)
    }

    fn lookup_service_type(&self) -> Result<ServiceType> {
        let resolver = self.type_resolver.as_ref().ok_or_else(|| {
            FlareError::resolution(
                ErrorCode::ResolutionFailed,
                "service type",
                self.interface_id.as_str(),
                "no type resolver configured",
            )
        })?;
        resolver.resolve(&self.interface_id)
    }

    /// 发布标识：`interfaceId:uniqueId`
    pub fn build_key(&self) -> String {
        format!("{}:{}", self.interface_id, self.unique_id)
    }

    // ============================================================
    // 阈值判断
    // ============================================================

    /// provider 级或任一方法级超时是否生效
    pub fn has_timeout(&self) -> bool {
        if self.timeout > 0 {
            return true;
        }
        self.methods.values().any(MethodOverride::has_timeout)
    }

    /// provider 级或任一方法级并发限制是否生效
    pub fn has_concurrents(&self) -> bool {
        if self.concurrents > 0 {
            return true;
        }
        self.methods.values().any(MethodOverride::has_concurrents)
    }

    /// 某个方法实际生效的超时：方法级优先，其次 provider 级
    pub fn timeout_for(&self, method: &str) -> Option<i32> {
        self.methods
            .get(method)
            .and_then(|m| m.timeout)
            .filter(|timeout| *timeout > 0)
            .or(Some(self.timeout).filter(|timeout| *timeout > 0))
    }

    /// 某个方法实际生效的并发限制：方法级优先，其次 provider 级
    pub fn concurrents_for(&self, method: &str) -> Option<i32> {
        self.methods
            .get(method)
            .and_then(|m| m.concurrents)
            .filter(|concurrents| *concurrents > 0)
            .or(Some(self.concurrents).filter(|concurrents| *concurrents > 0))
    }

    /// 方法是否在 include/exclude 规则下对外发布
    pub fn is_method_published(&self, method: &str) -> bool {
        self.method_filter
            .get_or_init(|| MethodFilter::parse(&self.include, &self.exclude))
            .is_published(method)
    }

    // ============================================================
    // 方法限流标记
    // ============================================================

    /// 方法限流标记表，首次访问时创建
    pub fn method_limits(&self) -> Arc<MethodLimitTable> {
        Arc::clone(self.method_limits.get_or_init(|| Arc::new(MethodLimitTable::new())))
    }

    /// 已创建的方法限流标记表（未访问过时为 None）
    pub fn allocated_method_limits(&self) -> Option<Arc<MethodLimitTable>> {
        self.method_limits.get().cloned()
    }

    // ============================================================
    // 生命周期
    // ============================================================

    /// 发布服务
    ///
    /// interfaceId 为空时直接返回配置错误，不会调用解析器或引导器。
    /// 首次调用时通过引导器解析器创建引导器（同一实例只解析一次），
    /// 之后每次调用都会委托引导器执行发布。
    /// 解析器在锁内被调用，不能再调用本实例的生命周期方法。
    pub async fn export(&self) -> Result<()> {
        let _guard = self.lifecycle.lock().await;
        self.ensure_interface_id()?;
        let key = self.build_key();

        let bootstrap = match self.bootstrap.get() {
            Some(existing) => Arc::clone(existing),
            None => {
                let resolver = self.bootstrap_resolver.as_ref().ok_or_else(|| {
                    FlareError::resolution(
                        ErrorCode::BootstrapNotFound,
                        "bootstrap",
                        self.bootstrap_kind().unwrap_or("<default>"),
                        "no bootstrap resolver configured",
                    )
                })?;
                debug!(key = %key, kind = ?self.bootstrap_kind, "Resolving provider bootstrap");
                let created = resolver.resolve(self)?;
                Arc::clone(self.bootstrap.get_or_init(|| created))
            }
        };

        info!(key = %key, bindings = self.bindings.len(), "Exporting provider");
        if let Err(e) = bootstrap.export().await {
            error!(key = %key, error = %e, "❌ Provider export failed");
            return Err(e);
        }
        info!(key = %key, "✅ Provider exported");
        Ok(())
    }

    /// 取消发布
    ///
    /// 尚未创建引导器时什么也不做。
    pub async fn unexport(&self) -> Result<()> {
        let _guard = self.lifecycle.lock().await;
        let key = self.build_key();

        match self.bootstrap.get() {
            Some(bootstrap) => {
                info!(key = %key, "Unexporting provider");
                if let Err(e) = bootstrap.unexport().await {
                    warn!(key = %key, error = %e, "⚠️ Provider unexport failed");
                    return Err(e);
                }
                info!(key = %key, "Provider unexported");
                Ok(())
            }
            None => {
                debug!(key = %key, "Provider was never exported, nothing to unexport");
                Ok(())
            }
        }
    }

    /// 当前的引导器
    ///
    /// 引导器创建后不会被清除，读取时不等待正在进行的发布。
    pub fn bootstrap(&self) -> Option<Arc<dyn ProviderBootstrap>> {
        self.bootstrap.get().cloned()
    }
}

impl<T: ?Sized + Send + Sync + 'static> Default for ProviderConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ProviderConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("interface_id", &self.interface_id)
            .field("unique_id", &self.unique_id)
            .field("has_ref", &self.service_ref.is_some())
            .field("bindings", &self.bindings)
            .field("delay", &self.delay)
            .field("weight", &self.weight)
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("dynamic", &self.dynamic)
            .field("priority", &self.priority)
            .field("bootstrap_kind", &self.bootstrap_kind)
            .field("timeout", &self.timeout)
            .field("concurrents", &self.concurrents)
            .field("repeated_export_limit", &self.repeated_export_limit)
            .field("methods", &self.methods)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
