//! Flare RPC Provider
//!
//! 服务提供者的配置、校验与发布生命周期：把服务实现绑定到一个或多个协议端点，
//! 校验绑定是否合法，并通过可插拔的引导器完成幂等的发布/取消发布。

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod types;

// Re-exports
pub use bootstrap::{BootstrapRegistry, BootstrapResolver, ExportLedger, ProviderBootstrap};
pub use config::{Config, LoggingConfig, ProviderDefaults};
pub use error::{ErrorCategory, ErrorCode, FlareError, Result};
pub use provider::{
    EndpointBinding, ExportDelay, MethodFilter, MethodLimitTable, MethodOverride, ProviderConfig,
    ScheduledExport, schedule_export,
};
pub use types::{ServiceType, TypeKind, TypeRegistry, TypeResolver};
