//! 延迟发布
//!
//! 根据 provider 的 `delay` 决定发布时机：
//! - `delay < 0`：不自动发布，等待调用方手动 `export()`
//! - `delay == 0`：立即在后台任务中发布
//! - `delay > 0`：等待 `delay` 毫秒后在后台任务中发布

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::{FlareError, Result};

use super::provider_config::ProviderConfig;

/// 发布时机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDelay {
    /// 手动发布
    Manual,
    /// 立即发布
    Immediate,
    /// 延迟发布
    After(Duration),
}

impl ExportDelay {
    pub fn from_millis(delay: i32) -> Self {
        match delay {
            d if d < 0 => ExportDelay::Manual,
            0 => ExportDelay::Immediate,
            d => ExportDelay::After(Duration::from_millis(d as u64)),
        }
    }
}

/// 调度结果
#[derive(Debug)]
pub enum ScheduledExport {
    /// 未调度，需要手动发布
    Manual,
    /// 已在后台任务中调度
    Spawned(JoinHandle<Result<()>>),
}

impl ScheduledExport {
    pub fn is_manual(&self) -> bool {
        matches!(self, ScheduledExport::Manual)
    }

    /// 等待后台发布完成；手动模式直接返回
    pub async fn wait(self) -> Result<()> {
        match self {
            ScheduledExport::Manual => Ok(()),
            ScheduledExport::Spawned(handle) => handle
                .await
                .map_err(|e| FlareError::system(format!("export task failed: {}", e)))?,
        }
    }
}

/// 按 provider 的 `delay` 调度发布
///
/// 必须在 tokio 运行时内调用。
pub fn schedule_export<T>(provider: Arc<ProviderConfig<T>>) -> ScheduledExport
where
    T: ?Sized + Send + Sync + 'static,
{
    let delay = provider.export_delay();
    let key = provider.build_key();

    let wait = match delay {
        ExportDelay::Manual => {
            info!(key = %key, "Provider delay is negative, waiting for manual export");
            return ScheduledExport::Manual;
        }
        ExportDelay::Immediate => None,
        ExportDelay::After(duration) => Some(duration),
    };

    info!(key = %key, delay = ?wait, "Scheduling provider export");
    let handle = tokio::spawn(async move {
        if let Some(duration) = wait {
            tokio::time::sleep(duration).await;
        }
        let result = provider.export().await;
        if let Err(e) = &result {
            error!(key = %key, error = %e, "❌ Scheduled provider export failed");
        }
        result
    });

    ScheduledExport::Spawned(handle)
}
