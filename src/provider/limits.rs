//! 方法级限流标记表

use dashmap::DashMap;
use std::collections::HashMap;

/// 方法名 -> 标记
///
/// 由调用分发链路在每次请求时读写（例如"该方法已超过并发上限，抑制重复日志"），
/// 标记的含义由分发链路决定。内部是分段并发哈希表，不与发布/取消发布共用锁。
#[derive(Debug, Default)]
pub struct MethodLimitTable {
    flags: DashMap<String, bool>,
}

impl MethodLimitTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, method: &str) -> Option<bool> {
        self.flags.get(method).map(|flag| *flag)
    }

    /// 未记录的方法视为 false
    pub fn is_limited(&self, method: &str) -> bool {
        self.get(method).unwrap_or(false)
    }

    /// 设置标记，返回旧值
    pub fn set(&self, method: impl Into<String>, limited: bool) -> Option<bool> {
        self.flags.insert(method.into(), limited)
    }

    pub fn remove(&self, method: &str) -> Option<bool> {
        self.flags.remove(method).map(|(_, flag)| flag)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn clear(&self) {
        self.flags.clear();
    }

    /// 当前内容的快照
    pub fn snapshot(&self) -> HashMap<String, bool> {
        self.flags
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
