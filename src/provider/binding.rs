//! 服务端绑定定义

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// bolt 协议
pub const PROTOCOL_BOLT: &str = "bolt";
/// triple 协议，唯一允许直接发布实现类的协议
pub const PROTOCOL_TRIPLE: &str = "tri";
/// rest 协议
pub const PROTOCOL_REST: &str = "rest";
/// h2c 协议
pub const PROTOCOL_H2C: &str = "h2c";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 12200;

/// 服务端绑定
///
/// 描述 provider 通过哪个协议、在哪个地址上对外暴露。
/// 除协议名外，其余参数由外部引导器解释。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointBinding {
    /// 协议名（如 "bolt", "tri"）
    pub protocol: String,

    /// 绑定地址
    pub host: String,

    /// 绑定端口
    pub port: u16,

    /// 协议相关参数
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl EndpointBinding {
    /// 创建新的绑定（默认地址 0.0.0.0:12200）
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            parameters: HashMap::new(),
        }
    }

    /// 设置绑定地址
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// 设置绑定端口
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// 添加协议参数
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// 该协议是否允许 interfaceId 直接指向实现类
    pub fn permits_implementation_type(&self) -> bool {
        self.protocol == PROTOCOL_TRIPLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_triple_permits_implementation_type() {
        assert!(EndpointBinding::new(PROTOCOL_TRIPLE).permits_implementation_type());
        for protocol in [PROTOCOL_BOLT, PROTOCOL_REST, PROTOCOL_H2C, "TRI"] {
            assert!(!EndpointBinding::new(protocol).permits_implementation_type());
        }
    }

    #[test]
    fn builder_sets_address_and_parameters() {
        let binding = EndpointBinding::new(PROTOCOL_BOLT)
            .with_host("127.0.0.1")
            .with_port(22000)
            .with_parameter("threads", "200");

        assert_eq!(binding.address(), "127.0.0.1:22000");
        assert_eq!(binding.parameter("threads"), Some("200"));
        assert_eq!(binding.parameter("missing"), None);
    }
}
