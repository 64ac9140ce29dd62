//! The main entry point: connection lifecycle (§4.8), `duplicate`, and the
//! `createClient` factory for subscriber/blocking child clients (§4.7).
//!
//! Mirrors the driver's own `Client::new(config, perf, connection, policy)`
//! plus `.connect()`/`.wait_for_connect()`/`.quit()` lifecycle, grounded in
//! the vendored driver's own integration test harness (`run_centralized`/
//! `run_cluster` in its `tests/integration/utils.rs`), wrapped so that the
//! legacy constructor-returns-immediately / commands-queue-until-ready
//! behavior of §4.8 is preserved.

use std::sync::Arc;

use fred::clients::Client as DriverClient;
use fred::interfaces::*;
use tracing::instrument;

use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::pipeline::{Pipeline, Transaction};
use crate::pubsub::PubSubBridge;
use crate::status::{Status, StatusTracker};

/// The kind of child client `createClient` produces — each gets its own
/// driver connection, matching the legacy client's one-socket-per-role
/// model for blocking and subscriber traffic (§4.7/§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Normal,
    Subscriber,
    Blocking,
}

/// The adapter's client handle. Cloning is cheap — it shares the same
/// driver connection and status tracker, matching the legacy client's own
/// "one logical client, many `Clone`s" model.
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: DriverClient,
    pub(crate) options: Arc<ClientOptions>,
    pub(crate) status: StatusTracker,
    kind: ClientKind,
    /// Built once per client and shared by every clone — `PubSubBridge`
    /// itself lazily creates the actual subscriber connection on first
    /// subscribe (§4.7), but the bridge object carrying that `OnceCell`
    /// plus the subscription-set bookkeeping must be the *same* instance
    /// across calls, or each call would see its own empty subscription
    /// state and its own broadcast channel that nothing else listens on.
    pubsub: PubSubBridge,
}

impl Client {
    /// Builds a client from its options record. Unless `lazyConnect` is
    /// set, a connection attempt is scheduled immediately in the
    /// background and commands issued before it completes queue up,
    /// subject to `enableOfflineQueue` (§4.8) — this mirrors the legacy
    /// client's "constructor returns synchronously, connect happens
    /// underneath" contract rather than requiring callers to await a
    /// separate connect step.
    pub fn new(options: ClientOptions) -> Result<Self> {
        Self::new_kind(options, ClientKind::Normal)
    }

    fn new_kind(options: ClientOptions, kind: ClientKind) -> Result<Self> {
        let (config, connection, performance, policy) = options.to_fred();
        let inner = DriverClient::new(config, Some(performance), Some(connection), policy);
        let status = StatusTracker::default();
        let pubsub = PubSubBridge::new(inner.clone());

        let client = Client { inner, options: Arc::new(options), status, kind, pubsub };

        if !client.options.lazy_connect {
            client.spawn_connect();
        }

        Ok(client)
    }

    /// Schedules the background connection task and wires the driver's
    /// own event stream into the legacy `connect`/`ready`/`end`/`error`
    /// surface of §6. Idempotent to call more than once isn't guaranteed
    /// — callers only reach this from `new`/`connect`.
    fn spawn_connect(&self) {
        self.status.transition(Status::Connecting);

        let inner = self.inner.clone();
        let status = self.status.clone();
        let options = self.options.clone();

        // Driver reconnects are transparent to callers issuing commands
        // (fred queues/replays them internally); what the legacy surface
        // needs from them is just the `ready` event refiring, which
        // `wait_for_connect` resolving again after a drop would give us.
        // Wiring that multi-shot signal precisely depends on driver event
        // subscription details not exercised anywhere in the grounding
        // corpus available here — tracked as an open question in
        // DESIGN.md rather than guessed at.
        tokio::spawn(async move {
            let _ = inner.connect();
            match inner.wait_for_connect().await {
                Ok(()) => {
                    status.transition(Status::Connected);
                    status.transition(Status::Ready);
                }
                Err(e) => {
                    // §4.8: a background connection error is swallowed
                    // unless `suppressBackgroundErrors` is off or someone
                    // is actually listening for `error`.
                    if !options.suppress_background_errors || status.has_error_listener() {
                        status.emit_error(e.to_string());
                    }
                    status.transition(Status::End);
                }
            }
        });
    }

    /// Explicit connect for a client built with `lazyConnect` — a no-op
    /// (beyond re-emitting the current status) if already connecting or
    /// connected.
    #[instrument(skip(self))]
    pub fn connect(&self) {
        if matches!(self.status.status(), Status::Disconnected | Status::End) {
            self.spawn_connect();
        }
    }

    pub fn status(&self) -> Status {
        self.status.status()
    }

    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<crate::status::ClientEvent> {
        self.status.subscribe()
    }

    /// Graceful shutdown — drains in-flight commands, then closes the
    /// socket. Matches the legacy client's `quit()`, as distinct from
    /// `disconnect()`'s immediate-drop semantics.
    #[instrument(skip(self))]
    pub async fn quit(&self) -> Result<()> {
        self.status.transition(Status::Disconnecting);
        self.inner.quit().await.map_err(Error::from)?;
        self.status.transition(Status::End);
        Ok(())
    }

    /// Immediate disconnect without waiting for in-flight commands,
    /// matching the legacy client's `disconnect()`.
    pub fn disconnect(&self) {
        self.status.transition(Status::Disconnecting);
        let inner = self.inner.clone();
        let status = self.status.clone();
        tokio::spawn(async move {
            let _ = inner.quit().await;
            status.transition(Status::End);
        });
    }

    /// `duplicate()`: a fresh logical client with its own connection,
    /// seeded from this client's options. `overrides` lets callers change
    /// individual fields the way the legacy client's `duplicate(options)`
    /// does (commonly `db` or `connectionName`).
    pub fn duplicate(&self, overrides: Option<ClientOptions>) -> Result<Client> {
        let options = overrides.unwrap_or_else(|| (*self.options).clone());
        Client::new_kind(options, self.kind)
    }

    /// `createClient(type)`: the legacy factory for role-specific child
    /// clients. `"subscriber"` clients are normally obtained through
    /// [`PubSubBridge`] instead, which manages the lazy-create/rebuild
    /// lifecycle of §4.7 directly; this method exists for callers that
    /// want a bare handle of a given kind without going through the
    /// bridge.
    pub fn create_client(&self, kind: ClientKind) -> Result<Client> {
        Client::new_kind((*self.options).clone(), kind)
    }

    pub fn kind(&self) -> ClientKind {
        self.kind
    }

    pub fn driver(&self) -> &DriverClient {
        &self.inner
    }

    /// The pub/sub bridge (§4.7) backing this client's `subscribe`/
    /// `psubscribe`/`ssubscribe`/`publish` family below — exposed directly
    /// for callers that want the raw event stream (`subscribe_events`) or
    /// need to reach [`cluster::ClusterClient`]'s sharded-publish path.
    pub fn pubsub(&self) -> &PubSubBridge {
        &self.pubsub
    }

    /// `client.on('message', ...)` / `on('pmessage', ...)` / `on('smessage',
    /// ...)`, reshaped as a broadcast stream rather than an event-emitter
    /// callback — one receiver per subscriber of this event.
    pub fn subscribe_messages(&self) -> tokio::sync::broadcast::Receiver<crate::pubsub::PubSubEvent> {
        self.pubsub.subscribe_events()
    }

    pub async fn subscribe(&self, channels: Vec<String>) -> Result<()> {
        self.pubsub.subscribe(channels).await
    }

    pub async fn psubscribe(&self, patterns: Vec<String>) -> Result<()> {
        self.pubsub.psubscribe(patterns).await
    }

    pub async fn ssubscribe(&self, channels: Vec<String>) -> Result<()> {
        self.pubsub.ssubscribe(channels).await
    }

    pub async fn unsubscribe(&self, channels: Vec<String>) -> Result<()> {
        self.pubsub.unsubscribe(channels).await
    }

    pub async fn punsubscribe(&self, patterns: Vec<String>) -> Result<()> {
        self.pubsub.punsubscribe(patterns).await
    }

    pub async fn sunsubscribe(&self, channels: Vec<String>) -> Result<()> {
        self.pubsub.sunsubscribe(channels).await
    }

    pub async fn publish(&self, channel: impl Into<String>, payload: crate::pubsub::Payload) -> Result<i64> {
        self.pubsub.publish(channel, payload).await
    }

    pub async fn spublish(&self, channel: impl Into<String>, payload: crate::pubsub::Payload) -> Result<i64> {
        self.pubsub.spublish(channel, payload).await
    }

    /// `client.pipeline()`: a non-atomic batch, buffered client-side and
    /// sent in one round trip on [`Pipeline::exec`].
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(&self.inner)
    }

    /// `client.multi()`: an atomic batch. Call [`Client::watch`] first if
    /// the transaction should abort when a key changes before `EXEC`.
    pub fn multi(&self) -> Transaction {
        Transaction::new(&self.inner)
    }

    /// `WATCH key [key ...]`: must be called on the connected client
    /// itself, before `multi()`, matching the driver's own
    /// watch-then-buffer ordering (grounded in
    /// `examples/apollographql-router/fred/tests/integration/pool/mod.rs`'s
    /// `should_watch_and_trx_exclusive_pool`, which calls `client.watch(...)`
    /// ahead of `client.multi()` on the same handle).
    #[instrument(skip(self))]
    pub async fn watch(&self, keys: Vec<fred::types::Key>) -> Result<()> {
        self.inner.watch(keys).await.map_err(Error::from)
    }

    /// `UNWATCH`: clears any keys watched on this connection. Not
    /// exercised directly in the retrieved grounding pack, unlike `watch`
    /// above — follows `fred`'s naming convention, flagged as an
    /// assumption in DESIGN.md.
    #[instrument(skip(self))]
    pub async fn unwatch(&self) -> Result<()> {
        self.inner.unwatch().await.map_err(Error::from)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("kind", &self.kind).field("status", &self.status().as_str()).finish()
    }
}

