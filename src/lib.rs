//! A compatibility adapter that re-exposes the surface of a legacy
//! "ioredis-style" Node.js client on top of [`fred`], a typed Rust
//! Redis/Valkey driver, so job-queue and session libraries written against
//! the legacy API run unchanged while every wire round-trip is carried by
//! `fred`.
//!
//! The crate is organized the way the legacy client's own surface is
//! organized: one module per concern (connection lifecycle, pub/sub,
//! scripting, pipelining) plus a `commands` module holding one file per
//! command family. [`Client`] is the single public entry point most callers
//! need; [`cluster::ClusterClient`] layers cluster-scoped concerns
//! (sharded pub/sub, cluster scan, per-node reply aggregation) on top of the
//! same command surface.

pub mod client;
pub mod cluster;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pubsub;
pub mod scripting;
pub mod status;
pub mod value;

pub use client::{Client, ClientKind};
pub use cluster::ClusterClient;
pub use config::ClientOptions;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, Transaction};
pub use pubsub::{Payload, PubSubEvent};
pub use scripting::ScriptCache;
pub use status::Status;
pub use value::{Key, Reply, Value as Arg};
