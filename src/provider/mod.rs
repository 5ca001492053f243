//! 服务提供者模块
//!
//! 提供服务提供者的配置、校验、阈值判断与发布生命周期。

pub mod binding;
pub mod filter;
pub mod limits;
pub mod method;
pub mod provider_config;
pub mod schedule;

pub use binding::{EndpointBinding, PROTOCOL_BOLT, PROTOCOL_H2C, PROTOCOL_REST, PROTOCOL_TRIPLE};
pub use filter::MethodFilter;
pub use limits::MethodLimitTable;
pub use method::MethodOverride;
pub use provider_config::ProviderConfig;
pub use schedule::{ExportDelay, ScheduledExport, schedule_export};
