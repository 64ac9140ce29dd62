//! Cluster Adapter (§4.9): the same command surface as [`Client`], layered
//! over a cluster-typed driver connection (`ClientOptions::nodes`), plus the
//! per-node aggregation and sharded pub/sub the legacy client's cluster mode
//! needs that a single-node client doesn't.
//!
//! Per-node fan-out is grounded in `fred`'s own
//! `client.active_connections()` / `client.with_cluster_node(server)` pair,
//! exercised in `examples/apollographql-router/fred/tests/integration/cluster/mod.rs`'s
//! `should_use_each_cluster_node` and `examples/apollographql-router/fred/tests/integration/scanning/mod.rs`'s
//! `should_scan_by_page_clustered` — `with_cluster_node` scopes any command
//! interface call (here, the same `commands::server::*` functions the
//! standalone client uses) to one node's connection.

use fred::interfaces::*;

use crate::client::Client;
use crate::commands::{keys, server};
use crate::error::Result;
use crate::pubsub::Payload;
use crate::value::Reply;

/// A cluster-aware handle. Reuses [`Client`] for connection lifecycle,
/// pipelining, transactions, pub/sub, and every per-key command (`fred`
/// itself handles slot routing for those transparently once `Config::server`
/// is `ServerConfig::Clustered`, built by [`crate::config::ClientOptions::to_fred`]
/// when `nodes` is set) — this type only adds the handful of operations
/// §4.9 calls out as needing cluster-wide reduction.
#[derive(Clone)]
pub struct ClusterClient {
    client: Client,
}

impl ClusterClient {
    pub fn new(client: Client) -> Self {
        ClusterClient { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// `DBSIZE`: summed across every node, matching the legacy cluster
    /// client's "total key count" contract rather than one node's count.
    pub async fn dbsize(&self) -> Result<i64> {
        let mut total = 0;
        for node in self.client.driver().active_connections() {
            total += server::dbsize(&self.client.driver().with_cluster_node(&node)).await?;
        }
        Ok(total)
    }

    /// `LASTSAVE`: the most recent save across all nodes.
    pub async fn lastsave(&self) -> Result<i64> {
        let mut max = 0;
        for node in self.client.driver().active_connections() {
            let value = server::lastsave(&self.client.driver().with_cluster_node(&node)).await?;
            max = max.max(value);
        }
        Ok(max)
    }

    /// `TIME`: the first reachable node's clock, matching the legacy
    /// client's "any one node's answer is good enough" cluster contract for
    /// commands that aren't meaningfully node-specific.
    pub async fn time(&self) -> Result<Reply> {
        let nodes = self.client.driver().active_connections();
        let node = nodes.first().ok_or(crate::error::Error::Closed)?;
        server::time(&self.client.driver().with_cluster_node(node)).await
    }

    /// `CLIENT ID`: first reachable node, same rationale as [`Self::time`].
    pub async fn client_id(&self) -> Result<i64> {
        let nodes = self.client.driver().active_connections();
        let node = nodes.first().ok_or(crate::error::Error::Closed)?;
        server::client_id(&self.client.driver().with_cluster_node(node)).await
    }

    /// `ECHO`: first reachable node, same rationale as [`Self::time`].
    pub async fn echo(&self, message: String) -> Result<Reply> {
        let nodes = self.client.driver().active_connections();
        let node = nodes.first().ok_or(crate::error::Error::Closed)?;
        server::echo(&self.client.driver().with_cluster_node(node), message).await
    }

    /// `INFO`: every node's section text concatenated with newlines, so
    /// nothing a caller scraping `INFO` output needs is silently dropped.
    pub async fn info(&self, section: Option<String>) -> Result<Reply> {
        let mut sections = Vec::new();
        for node in self.client.driver().active_connections() {
            if let Reply::Simple(text) = server::info(&self.client.driver().with_cluster_node(&node), section.clone()).await? {
                sections.push(text);
            }
        }
        Ok(Reply::Simple(sections.join("\n")))
    }

    /// `KEYS pattern` on a cluster: unlike standalone `KEYS`, there is no
    /// single node to ask, and `fred` doesn't scatter-gather the raw `KEYS`
    /// command itself — so per §4.4's "implemented as a driver-level
    /// cluster scan loop with `MATCH` and `COUNT 1000` until cursor is
    /// finished" rule, this drives [`commands::keys::scan`] to exhaustion
    /// across the whole cluster and collects every matching key.
    pub async fn keys(&self, pattern: &str) -> Result<Reply> {
        let mut cursor = "0".to_string();
        let mut found = Vec::new();
        loop {
            let (next_cursor, page) = keys::scan(self.client.driver(), &cursor, Some(pattern), Some(1000), None).await?;
            found.extend(page);
            if next_cursor == "0" {
                break;
            }
            cursor = next_cursor;
        }
        Ok(Reply::Array(found))
    }

    /// `PUBLISH channel message [sharded]`: cluster mode's extra knob over
    /// the standalone client's plain `publish`, routing to the driver's
    /// sharded publish (`SPUBLISH`) when set, matching §4.7's "accepts an
    /// optional `sharded` flag" note.
    pub async fn publish(&self, channel: impl Into<String>, payload: Payload, sharded: bool) -> Result<i64> {
        let bridge = self.client.pubsub();
        if sharded { bridge.spublish(channel, payload).await } else { bridge.publish(channel, payload).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientOptions;

    #[test]
    fn wraps_a_cluster_configured_client() {
        let mut options = ClientOptions::default();
        options.lazy_connect = true;
        options.nodes = Some(vec![crate::config::Node { host: "a".into(), port: 1 }]);
        let client = Client::new(options).unwrap();
        let cluster = ClusterClient::new(client);
        assert!(cluster.client().kind() == crate::client::ClientKind::Normal);
    }
}
