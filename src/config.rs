// src/config.rs

pub mod credentials;

use crate::constants;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub api_base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<HashMap<String, String>>,
    #[serde(default)]
    pub network: NetworkConfig,
}

// 凭据内容不得出现在日志中
impl std::fmt::Debug for ExternalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalConfig")
            .field("credentials", &self.credentials.as_ref().map(|_| "***"))
            .field("network", &self.network)
            .finish()
    }
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为 NetworkConfig 提供一组稳健的默认值
        let network_config = NetworkConfig {
            api_base_url: Some(constants::DEFAULT_API_BASE_URL.into()),
            connect_timeout_secs: Some(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            timeout_secs: Some(constants::DEFAULT_TIMEOUT_SECS),
        };

        Self {
            credentials: None,
            network: network_config,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_external(external_config: &ExternalConfig) -> Self {
        let network = &external_config.network;
        Self {
            api_base_url: network
                .api_base_url
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| constants::DEFAULT_API_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                network
                    .connect_timeout_secs
                    .unwrap_or(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            timeout: Duration::from_secs(
                network.timeout_secs.unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    /// 用指定的服务地址覆盖配置 (主要用于测试或私有代理)
    pub fn with_api_base_url(mut self, api_base_url: &str) -> Self {
        self.api_base_url = api_base_url.trim_end_matches('/').to_string();
        self
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_external_applies_defaults() {
        let external: ExternalConfig = serde_json::from_str("{}").unwrap();
        let config = AppConfig::from_external(&external);
        assert_eq!(config.api_base_url, constants::DEFAULT_API_BASE_URL);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_from_external_reads_network_section() {
        let external: ExternalConfig = serde_json::from_str(
            r#"{"network":{"api_base_url":"http://127.0.0.1:8080/","timeout_secs":5},"credentials":{"token":"t"}}"#,
        )
        .unwrap();
        let config = AppConfig::from_external(&external);
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!format!("{:?}", external).contains("\"t\""));
    }
}
