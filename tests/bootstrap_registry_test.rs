//! 引导器注册表与重复发布计数测试

use async_trait::async_trait;
use flare_rpc_provider::bootstrap::{BootstrapRegistry, BootstrapResolver, ExportLedger, ProviderBootstrap};
use flare_rpc_provider::config::ProviderDefaults;
use flare_rpc_provider::error::{ErrorCode, Result};
use flare_rpc_provider::provider::ProviderConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

trait GreeterService: Send + Sync {}

/// 只记录自身类型的引导器
struct NamedBootstrap {
    kind: &'static str,
    exports: Arc<AtomicUsize>,
}

#[async_trait]
impl ProviderBootstrap for NamedBootstrap {
    async fn export(&self) -> Result<()> {
        tracing::debug!(kind = self.kind, "exporting");
        self.exports.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn unexport(&self) -> Result<()> {
        Ok(())
    }
}

/// 按发布标识检查重复发布次数的引导器
struct LedgerBootstrap {
    key: String,
    limit: i32,
    ledger: Arc<ExportLedger>,
}

#[async_trait]
impl ProviderBootstrap for LedgerBootstrap {
    async fn export(&self) -> Result<()> {
        self.ledger.acquire(&self.key, self.limit)?;
        Ok(())
    }

    async fn unexport(&self) -> Result<()> {
        self.ledger.release(&self.key);
        Ok(())
    }
}

/// 创建注册了 "flare" 和 "grpc" 两种引导器的注册表
fn create_registry(
    flare_exports: Arc<AtomicUsize>,
    grpc_exports: Arc<AtomicUsize>,
) -> Arc<BootstrapRegistry<dyn GreeterService>> {
    let registry = BootstrapRegistry::<dyn GreeterService>::new();
    registry.register("flare", move |_config: &ProviderConfig<dyn GreeterService>| {
        let bootstrap: Arc<dyn ProviderBootstrap> = Arc::new(NamedBootstrap {
            kind: "flare",
            exports: flare_exports.clone(),
        });
        Ok(bootstrap)
    });
    registry.register("grpc", move |_config: &ProviderConfig<dyn GreeterService>| {
        let bootstrap: Arc<dyn ProviderBootstrap> = Arc::new(NamedBootstrap {
            kind: "grpc",
            exports: grpc_exports.clone(),
        });
        Ok(bootstrap)
    });
    Arc::new(registry)
}

/// 测试：未指定类型时使用默认引导器
#[tokio::test]
async fn test_default_kind_is_used() {
    let flare = Arc::new(AtomicUsize::new(0));
    let grpc = Arc::new(AtomicUsize::new(0));
    let registry = create_registry(flare.clone(), grpc.clone());
    assert_eq!(registry.default_kind(), "flare");

    let provider = ProviderConfig::<dyn GreeterService>::new()
        .with_interface_id("com.flare.Greeter")
        .with_bootstrap_resolver(registry);
    provider.export().await.unwrap();

    assert_eq!(flare.load(Ordering::SeqCst), 1);
    assert_eq!(grpc.load(Ordering::SeqCst), 0);
}

/// 测试：按 provider 指定的类型选择引导器
#[tokio::test]
async fn test_explicit_kind_is_used() {
    let flare = Arc::new(AtomicUsize::new(0));
    let grpc = Arc::new(AtomicUsize::new(0));
    let registry = create_registry(flare.clone(), grpc.clone());

    let provider = ProviderConfig::<dyn GreeterService>::new()
        .with_interface_id("com.flare.Greeter")
        .with_bootstrap_kind(" grpc ")
        .with_bootstrap_resolver(registry);
    provider.export().await.unwrap();

    assert_eq!(flare.load(Ordering::SeqCst), 0);
    assert_eq!(grpc.load(Ordering::SeqCst), 1);
}

/// 测试：未注册的类型返回解析错误
#[tokio::test]
async fn test_unknown_kind_fails() {
    let registry = create_registry(Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));

    let provider = ProviderConfig::<dyn GreeterService>::new()
        .with_interface_id("com.flare.Greeter")
        .with_bootstrap_kind("dubbo")
        .with_bootstrap_resolver(registry.clone());
    let err = provider.export().await.unwrap_err();

    assert!(err.is_resolution());
    assert_eq!(err.code(), ErrorCode::BootstrapNotFound);
    assert!(err.to_string().contains("dubbo"));
    assert!(provider.bootstrap().is_none());

    // 直接调用解析器也得到同样的错误
    assert!(registry.resolve(&provider).is_err());
}

/// 测试：默认类型取自配置
#[test]
fn test_registry_from_defaults() {
    let defaults = ProviderDefaults {
        bootstrap: "grpc".to_string(),
        ..Default::default()
    };
    let registry = BootstrapRegistry::<dyn GreeterService>::from_defaults(&defaults);
    assert_eq!(registry.default_kind(), "grpc");
    assert!(registry.kinds().is_empty());
}

/// 测试：注册与注销
#[test]
fn test_register_and_unregister() {
    let registry = create_registry(Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)));

    let mut kinds = registry.kinds();
    kinds.sort();
    assert_eq!(kinds, vec!["flare".to_string(), "grpc".to_string()]);

    assert!(registry.unregister("grpc"));
    assert!(!registry.unregister("grpc"));
    assert!(!registry.contains("grpc"));
    assert!(registry.contains("flare"));
}

/// 测试：同一发布标识超过重复发布上限时失败
#[tokio::test]
async fn test_repeated_export_limit_is_enforced_by_ledger() {
    let ledger = Arc::new(ExportLedger::new());
    let registry = BootstrapRegistry::<dyn GreeterService>::new();
    let shared = Arc::clone(&ledger);
    registry.register("flare", move |config: &ProviderConfig<dyn GreeterService>| {
        let bootstrap: Arc<dyn ProviderBootstrap> = Arc::new(LedgerBootstrap {
            key: config.build_key(),
            limit: config.repeated_export_limit(),
            ledger: Arc::clone(&shared),
        });
        Ok(bootstrap)
    });
    let registry = Arc::new(registry);

    let create = || {
        ProviderConfig::<dyn GreeterService>::new()
            .with_interface_id("com.flare.Greeter")
            .with_unique_id("v1")
            .with_bootstrap_resolver(registry.clone())
    };
    let first = create();
    let second = create();

    first.export().await.unwrap();
    let err = second.export().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::RepeatedExportLimitExceeded);
    assert!(err.is_configuration());
    assert_eq!(ledger.count("com.flare.Greeter:v1"), 1);

    first.unexport().await.unwrap();
    second.export().await.unwrap();
    assert_eq!(ledger.count("com.flare.Greeter:v1"), 1);

    // -1 表示不限制
    let unlimited = create().with_repeated_export_limit(-1);
    unlimited.export().await.unwrap();
    assert_eq!(ledger.count("com.flare.Greeter:v1"), 2);
}
