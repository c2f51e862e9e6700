//! Node networking configuration.
//!
//! Grounded on `internal/config/node.go`'s `NodeConfig` (port, connection
//! type/address, protocol version, identity hash), rebuilt as the fluent
//! builder already established by [`obscura_core::config::ConfigBuilder`]
//! rather than the original's struct-with-setters.

use rand::rngs::OsRng;

use crate::identity;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: String,
    pub port: u16,
    pub protocol_version: u32,
    pub node_id: [u8; 32],
    pub seed_peers: Vec<String>,
}

impl NodeConfig {
    pub fn builder() -> NodeConfigBuilder {
        NodeConfigBuilder::default()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

pub struct NodeConfigBuilder {
    bind_addr: String,
    port: u16,
    seed_peers: Vec<String>,
}

impl Default for NodeConfigBuilder {
    fn default() -> Self {
        NodeConfigBuilder {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            seed_peers: Vec::new(),
        }
    }
}

impl NodeConfigBuilder {
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn seed_peers(mut self, peers: Vec<String>) -> Self {
        self.seed_peers = peers;
        self
    }

    pub fn finish(self) -> NodeConfig {
        NodeConfig {
            bind_addr: self.bind_addr,
            port: self.port,
            protocol_version: PROTOCOL_VERSION,
            node_id: identity::generate(&mut OsRng),
            seed_peers: self.seed_peers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_listens_on_the_default_port() {
        let config = NodeConfig::builder().finish();
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn builder_overrides_take_effect() {
        let config = NodeConfig::builder()
            .bind_addr("127.0.0.1")
            .port(9000)
            .seed_peers(vec!["127.0.0.1:8080".to_string()])
            .finish();
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
        assert_eq!(config.seed_peers, vec!["127.0.0.1:8080".to_string()]);
    }
}
