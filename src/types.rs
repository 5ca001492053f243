//! 服务类型描述与类型解析
//!
//! `interfaceId` 只是一个名字，真正的类型信息由外部的 `TypeResolver` 提供。
//! `TypeRegistry` 是进程内的默认实现。

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, FlareError, Result};

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// 服务接口
    Interface,
    /// 具体实现类
    Implementation,
}

/// 已解析的服务类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceType {
    pub name: String,
    pub kind: TypeKind,
}

impl ServiceType {
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
        }
    }

    pub fn implementation(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Implementation,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// 类型解析 trait
///
/// 根据全限定名查找服务类型。找不到或名字非法时返回错误。
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<ServiceType>;
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> Result<ServiceType> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Result<ServiceType> {
        self(name)
    }
}

/// 进程内类型注册表
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<String, TypeKind>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册服务接口
    pub fn register_interface(&self, name: impl Into<String>) -> &Self {
        self.types.insert(name.into(), TypeKind::Interface);
        self
    }

    /// 注册实现类
    pub fn register_implementation(&self, name: impl Into<String>) -> &Self {
        self.types.insert(name.into(), TypeKind::Implementation);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, name: &str) -> Result<ServiceType> {
        if !is_well_formed(name) {
            return Err(FlareError::resolution(
                ErrorCode::ResolutionFailed,
                "service type",
                name,
                "malformed type name",
            ));
        }
        match self.types.get(name) {
            Some(kind) => Ok(ServiceType {
                name: name.to_string(),
                kind: *kind,
            }),
            None => Err(FlareError::service_type_not_found(name)),
        }
    }
}

/// 全限定名：以 `.` 或 `::` 分隔的非空标识符段
fn is_well_formed(name: &str) -> bool {
    let normalized = name.replace("::", ".");
    !normalized.is_empty()
        && normalized.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
                    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
                }
                _ => false,
            }
        })
}
