//! 重复发布计数
//!
//! 按发布标识（`interfaceId:uniqueId`）统计当前发布次数，供引导器在发布时检查
//! `repeated_export_limit`。上限 <=0（约定用 -1）表示不检查。

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::warn;

use crate::error::{ErrorCode, FlareError, Result};

const FIELD_REPEATED_EXPORT_LIMIT: &str = "service.repeatedExportLimit";

#[derive(Debug, Default)]
pub struct ExportLedger {
    exported: DashMap<String, usize>,
}

impl ExportLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次发布，返回记录后的次数
    ///
    /// 已达到上限时返回配置错误，计数不变。
    pub fn acquire(&self, key: &str, limit: i32) -> Result<usize> {
        let exceeded = |count: usize| limit > 0 && count >= limit as usize;

        match self.exported.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let count = *entry.get();
                if exceeded(count) {
                    warn!(key = %key, count, limit, "Repeated export limit reached");
                    return Err(FlareError::configuration(
                        FIELD_REPEATED_EXPORT_LIMIT,
                        limit.to_string(),
                        format!(
                            "provider with key {} has been exported {} times, limit is {}",
                            key, count, limit
                        ),
                    )
                    .with_code(ErrorCode::RepeatedExportLimitExceeded));
                }
                *entry.get_mut() += 1;
                Ok(count + 1)
            }
            Entry::Vacant(entry) => {
                entry.insert(1);
                Ok(1)
            }
        }
    }

    /// 释放一次发布，返回剩余次数；计数归零时移除记录
    pub fn release(&self, key: &str) -> usize {
        match self.exported.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let remaining = entry.get().saturating_sub(1);
                if remaining == 0 {
                    entry.remove();
                } else {
                    *entry.get_mut() = remaining;
                }
                remaining
            }
            Entry::Vacant(_) => 0,
        }
    }

    pub fn count(&self, key: &str) -> usize {
        self.exported.get(key).map(|count| *count).unwrap_or(0)
    }

    pub fn keys(&self) -> Vec<String> {
        self.exported.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_blocks_further_exports_until_release() {
        let ledger = ExportLedger::new();
        assert_eq!(ledger.acquire("com.flare.Echo:", 2).unwrap(), 1);
        assert_eq!(ledger.acquire("com.flare.Echo:", 2).unwrap(), 2);

        let err = ledger.acquire("com.flare.Echo:", 2).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RepeatedExportLimitExceeded);
        assert_eq!(err.field(), Some("service.repeatedExportLimit"));
        assert_eq!(ledger.count("com.flare.Echo:"), 2);

        assert_eq!(ledger.release("com.flare.Echo:"), 1);
        assert_eq!(ledger.acquire("com.flare.Echo:", 2).unwrap(), 2);
    }

    #[test]
    fn negative_limit_is_unlimited() {
        let ledger = ExportLedger::new();
        for expected in 1..=5 {
            assert_eq!(ledger.acquire("k:v", -1).unwrap(), expected);
        }
    }

    #[test]
    fn release_drops_entry_at_zero() {
        let ledger = ExportLedger::new();
        ledger.acquire("k:", 1).unwrap();
        assert_eq!(ledger.release("k:"), 0);
        assert!(ledger.keys().is_empty());
        assert_eq!(ledger.release("k:"), 0);
    }
}
