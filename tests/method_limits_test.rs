//! 方法限流标记表测试

use flare_rpc_provider::provider::{MethodLimitTable, ProviderConfig};
use std::sync::Arc;
use tokio::task::JoinSet;

trait OrderService: Send + Sync {}

/// 测试：首次访问时才创建标记表，之后一直是同一张表
#[test]
fn test_table_is_allocated_lazily() {
    let provider = ProviderConfig::<dyn OrderService>::new();
    assert!(provider.allocated_method_limits().is_none());

    let first = provider.method_limits();
    let second = provider.method_limits();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(provider.allocated_method_limits().is_some());
}

/// 测试：外部提供的标记表可以在多个 provider 之间共享
#[test]
fn test_shared_table() {
    let table = Arc::new(MethodLimitTable::new());
    let a = ProviderConfig::<dyn OrderService>::new().with_method_limits(table.clone());
    let b = ProviderConfig::<dyn OrderService>::new().with_method_limits(table.clone());

    a.method_limits().set("createOrder", true);
    assert!(b.method_limits().is_limited("createOrder"));
    assert_eq!(table.len(), 1);
}

/// 测试：读写与快照
#[test]
fn test_set_get_remove() {
    let table = MethodLimitTable::new();
    assert!(table.is_empty());
    assert_eq!(table.get("query"), None);
    assert!(!table.is_limited("query"));

    assert_eq!(table.set("query", true), None);
    assert_eq!(table.set("query", false), Some(true));
    table.set("create", true);

    let snapshot = table.snapshot();
    assert_eq!(snapshot.get("query"), Some(&false));
    assert_eq!(snapshot.get("create"), Some(&true));

    assert_eq!(table.remove("create"), Some(true));
    assert_eq!(table.len(), 1);
    table.clear();
    assert!(table.is_empty());
}

/// 测试：多任务并发读写不会丢失更新
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates() {
    let provider = Arc::new(ProviderConfig::<dyn OrderService>::new());

    let mut tasks = JoinSet::new();
    for worker in 0..8 {
        let provider = Arc::clone(&provider);
        tasks.spawn(async move {
            let table = provider.method_limits();
            for i in 0..50 {
                let method = format!("method-{}-{}", worker, i);
                table.set(method.as_str(), i % 2 == 0);
                assert_eq!(table.get(&method), Some(i % 2 == 0));
            }
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.expect("worker panicked");
    }

    let table = provider.method_limits();
    assert_eq!(table.len(), 8 * 50);
    assert!(table.is_limited("method-3-0"));
    assert!(!table.is_limited("method-3-1"));
}
