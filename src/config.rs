//! Configuration surface of §6: the enumerated ioredis options, translated
//! into `fred`'s `Config`/`ConnectionConfig`/`PerformanceConfig`/`ReconnectPolicy`
//! quartet (the same shape `Client::new` takes).
//!
//! Unknown keys are ignored (captured by `extra` and dropped), matching the
//! legacy client's tolerance for options it doesn't recognize.

use std::collections::HashMap;
use std::time::Duration;

use fred::types::config::{
    Config as DriverConfig, ConnectionConfig, PerformanceConfig, ReconnectPolicy, Server,
    ServerConfig, UnresponsiveConfig,
};
use serde::Deserialize;

/// `readFrom`/`enableReadFromReplicas` of §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ReadFrom {
    #[default]
    Primary,
    PreferReplica,
    AzAffinity,
}

/// A single cluster node, `host:port`.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub host: String,
    pub port: u16,
}

/// The enumerated configuration options of §6. Every field is optional so
/// defaults can come from `fred` itself; `extra` swallows unrecognized keys.
///
/// Not every knob here has a 1:1 counterpart in `fred`'s own config types
/// (e.g. `clientAz`, `scanAllowNonCoveredSlots` are accepted for source
/// compatibility with the legacy client's options object but currently have
/// no effect on the underlying connection — see DESIGN.md).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub nodes: Option<Vec<Node>>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "useTLS")]
    pub tls: bool,
    pub db: Option<u8>,
    pub client_name: Option<String>,
    pub lazy_connect: bool,
    pub enable_offline_queue: bool,
    pub enable_read_from_replicas: bool,
    pub read_from: Option<ReadFrom>,
    pub client_az: Option<String>,
    #[serde(with = "humantime_serde::option")]
    pub request_timeout: Option<Duration>,
    #[serde(with = "humantime_serde::option")]
    pub connect_timeout: Option<Duration>,
    pub max_retries_per_request: Option<u32>,
    #[serde(with = "humantime_serde::option")]
    pub retry_delay_on_failover: Option<Duration>,
    pub scan_allow_non_covered_slots: bool,
    pub enable_event_based_pub_sub: bool,
    /// When set, a failed background connection attempt is swallowed
    /// rather than broadcast on the `error` event stream if nothing is
    /// currently listening for it — §4.8. A listener always gets the
    /// error regardless of this flag; it only controls whether a
    /// nobody's-listening error is dropped or still broadcast (and thus
    /// buffered for a listener that subscribes later).
    pub suppress_background_errors: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ClientOptions {
    pub fn is_cluster(&self) -> bool {
        self.nodes.as_ref().is_some_and(|n| !n.is_empty())
    }

    fn server_config(&self) -> ServerConfig {
        if let Some(nodes) = &self.nodes {
            if !nodes.is_empty() {
                return ServerConfig::Clustered {
                    hosts: nodes.iter().map(|n| Server::new(n.host.clone(), n.port)).collect(),
                    policy: Default::default(),
                };
            }
        }
        ServerConfig::Centralized {
            server: Server::new(
                self.host.clone().unwrap_or_else(|| "127.0.0.1".to_string()),
                self.port.unwrap_or(6379),
            ),
        }
    }

    /// Builds the `(Config, ConnectionConfig, PerformanceConfig,
    /// Option<ReconnectPolicy>)` quartet `Client::new`/`Builder` accept.
    pub fn to_fred(&self) -> (DriverConfig, ConnectionConfig, PerformanceConfig, Option<ReconnectPolicy>) {
        let config = DriverConfig {
            server: self.server_config(),
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.db,
            fail_fast: !self.enable_offline_queue,
            ..Default::default()
        };

        let connection = ConnectionConfig {
            max_command_attempts: self.max_retries_per_request.unwrap_or(3),
            unresponsive: UnresponsiveConfig {
                max_timeout: self.connect_timeout,
                interval: Duration::from_millis(100),
            },
            ..Default::default()
        };

        let performance = PerformanceConfig {
            default_command_timeout: self.request_timeout.unwrap_or_default(),
            ..Default::default()
        };

        let policy = self.max_retries_per_request.map(|attempts| {
            ReconnectPolicy::new_constant(
                attempts,
                self.retry_delay_on_failover.map(|d| d.as_millis() as u32).unwrap_or(500),
            )
        });

        (config, connection, performance, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_are_ignored_not_rejected() {
        let json = serde_json::json!({
            "host": "localhost",
            "port": 6380,
            "someFutureOption": true,
        });
        let opts: ClientOptions = serde_json::from_value(json).unwrap();
        assert_eq!(opts.host.as_deref(), Some("localhost"));
        assert_eq!(opts.port, Some(6380));
        assert!(opts.extra.contains_key("someFutureOption"));
    }

    #[test]
    fn nodes_list_marks_cluster_mode() {
        let mut opts = ClientOptions::default();
        opts.nodes = Some(vec![Node { host: "a".into(), port: 1 }]);
        assert!(opts.is_cluster());
    }

    #[test]
    fn defaults_to_standalone() {
        assert!(!ClientOptions::default().is_cluster());
    }
}
