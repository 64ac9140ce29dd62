//! The Pub/Sub Bridge (§4.7): lazily creates a dedicated subscriber
//! connection on first subscribe, tracks the legacy client's channel/
//! pattern/shard-channel sets so a reconnect can re-subscribe everything,
//! and republishes `fred`'s `Message` stream as the legacy
//! `message`/`pmessage`/`smessage` event trio.
//!
//! Grounded in the vendored driver's own pub/sub integration tests
//! (`clone_new`/`subscribe`/`psubscribe`/`ssubscribe`/`message_rx`).

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use fred::clients::Client as DriverClient;
use fred::interfaces::*;
use tokio::sync::broadcast;

use crate::error::{Error, Result};

/// A payload as it arrives off the wire: binary-safe by default, with a
/// lossy string view available for callers running in "string mode" (the
/// common case for job-queue/session libraries that publish JSON).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Binary(Bytes),
}

impl Payload {
    /// Inverse of [`Payload::encode_with_binary_marker`]: a leading `\x00`
    /// means the rest is base64 standing in for the original bytes; anything
    /// else is taken as a plain UTF-8 string, falling back to raw bytes if
    /// it isn't valid UTF-8.
    fn from_bytes(bytes: Bytes) -> Self {
        if bytes.first() == Some(&0) {
            use base64::Engine;
            return match base64::engine::general_purpose::STANDARD.decode(&bytes[1..]) {
                Ok(decoded) => Payload::Binary(Bytes::from(decoded)),
                Err(_) => Payload::Binary(bytes),
            };
        }
        match std::str::from_utf8(&bytes) {
            Ok(s) => Payload::Text(s.to_string()),
            Err(_) => Payload::Binary(bytes),
        }
    }

    pub fn as_bytes(&self) -> Bytes {
        match self {
            Payload::Text(s) => Bytes::copy_from_slice(s.as_bytes()),
            Payload::Binary(b) => b.clone(),
        }
    }

    /// The legacy client's buffer-mode marker: binary payloads are
    /// base64-encoded with a leading `\x00` sentinel byte so a consumer
    /// that only understands strings can still detect "this was binary"
    /// rather than silently mangling it via lossy UTF-8 replacement.
    pub fn encode_with_binary_marker(&self) -> String {
        match self {
            Payload::Text(s) => s.clone(),
            Payload::Binary(b) => {
                use base64::Engine;
                format!("\u{0}{}", base64::engine::general_purpose::STANDARD.encode(b))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PubSubEvent {
    Message { channel: String, payload: Payload },
    PMessage { pattern: String, channel: String, payload: Payload },
    SMessage { channel: String, payload: Payload },
}

#[derive(Default)]
struct Subscriptions {
    channels: HashSet<String>,
    patterns: HashSet<String>,
    shard_channels: HashSet<String>,
}

/// Owns the lazily-created subscriber connection and the subscription
/// bookkeeping used to classify incoming messages. Membership changes
/// (`subscribe`/`psubscribe`/`unsubscribe`/...) mutate that one connection
/// in place via `fred`'s own dynamic subscribe calls; `fred` itself tracks
/// and replays the subscription set on reconnect, so there's no separate
/// rebuild step here.
#[derive(Clone)]
pub struct PubSubBridge {
    publisher: DriverClient,
    subscriber: Arc<tokio::sync::OnceCell<DriverClient>>,
    subscriptions: Arc<Mutex<Subscriptions>>,
    events: broadcast::Sender<PubSubEvent>,
}

impl PubSubBridge {
    pub(crate) fn new(publisher: DriverClient) -> Self {
        let (events, _) = broadcast::channel(1024);
        PubSubBridge {
            publisher,
            subscriber: Arc::new(tokio::sync::OnceCell::new()),
            subscriptions: Arc::new(Mutex::new(Subscriptions::default())),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PubSubEvent> {
        self.events.subscribe()
    }

    /// Returns the subscriber connection, creating and connecting it (and
    /// starting its message pump) on first use. All subsequent subscribe
    /// calls reuse the same connection, matching the legacy client's
    /// "subscriber mode" — a client that has ever subscribed may no longer
    /// issue ordinary commands on that same connection.
    async fn subscriber_client(&self) -> Result<&DriverClient> {
        self.subscriber
            .get_or_try_init(|| async {
                let client = self.publisher.clone_new();
                client.connect();
                client.wait_for_connect().await.map_err(Error::from)?;
                self.spawn_pump(client.clone());
                Ok::<_, Error>(client)
            })
            .await
    }

    fn spawn_pump(&self, subscriber: DriverClient) {
        let events = self.events.clone();
        let subscriptions = self.subscriptions.clone();
        tokio::spawn(async move {
            let mut stream = subscriber.message_rx();
            while let Ok(message) = stream.recv().await {
                let channel = message.channel.to_string();
                let payload = match crate::value::Reply::try_from(message.value) {
                    Ok(crate::value::Reply::Bulk(bytes)) => Payload::from_bytes(bytes),
                    Ok(reply) => Payload::Text(reply.as_bulk_string().unwrap_or_default()),
                    Err(_) => Payload::Binary(Bytes::new()),
                };
                let is_pattern = {
                    let subs = subscriptions.lock().unwrap();
                    subs.patterns.iter().any(|p| glob_match(p, &channel))
                };
                let event = if is_pattern {
                    let pattern = {
                        let subs = subscriptions.lock().unwrap();
                        subs.patterns.iter().find(|p| glob_match(p, &channel)).cloned().unwrap_or_default()
                    };
                    PubSubEvent::PMessage { pattern, channel, payload }
                } else {
                    let is_shard = subscriptions.lock().unwrap().shard_channels.contains(&channel);
                    if is_shard {
                        PubSubEvent::SMessage { channel, payload }
                    } else {
                        PubSubEvent::Message { channel, payload }
                    }
                };
                let _ = events.send(event);
            }
        });
    }

    pub async fn subscribe(&self, channels: Vec<String>) -> Result<()> {
        let client = self.subscriber_client().await?;
        client.subscribe(channels.clone()).await.map_err(Error::from)?;
        self.subscriptions.lock().unwrap().channels.extend(channels);
        Ok(())
    }

    pub async fn psubscribe(&self, patterns: Vec<String>) -> Result<()> {
        let client = self.subscriber_client().await?;
        client.psubscribe(patterns.clone()).await.map_err(Error::from)?;
        self.subscriptions.lock().unwrap().patterns.extend(patterns);
        Ok(())
    }

    pub async fn ssubscribe(&self, channels: Vec<String>) -> Result<()> {
        let client = self.subscriber_client().await?;
        client.ssubscribe(channels.clone()).await.map_err(Error::from)?;
        self.subscriptions.lock().unwrap().shard_channels.extend(channels);
        Ok(())
    }

    pub async fn unsubscribe(&self, channels: Vec<String>) -> Result<()> {
        let Some(client) = self.subscriber.get() else { return Ok(()) };
        if channels.is_empty() {
            client.unsubscribe(()).await.map_err(Error::from)?;
            self.subscriptions.lock().unwrap().channels.clear();
        } else {
            client.unsubscribe(channels.clone()).await.map_err(Error::from)?;
            let mut subs = self.subscriptions.lock().unwrap();
            for c in &channels {
                subs.channels.remove(c);
            }
        }
        Ok(())
    }

    pub async fn punsubscribe(&self, patterns: Vec<String>) -> Result<()> {
        let Some(client) = self.subscriber.get() else { return Ok(()) };
        if patterns.is_empty() {
            client.punsubscribe(()).await.map_err(Error::from)?;
            self.subscriptions.lock().unwrap().patterns.clear();
        } else {
            client.punsubscribe(patterns.clone()).await.map_err(Error::from)?;
            let mut subs = self.subscriptions.lock().unwrap();
            for p in &patterns {
                subs.patterns.remove(p);
            }
        }
        Ok(())
    }

    pub async fn sunsubscribe(&self, channels: Vec<String>) -> Result<()> {
        let Some(client) = self.subscriber.get() else { return Ok(()) };
        if channels.is_empty() {
            client.sunsubscribe(()).await.map_err(Error::from)?;
            self.subscriptions.lock().unwrap().shard_channels.clear();
        } else {
            client.sunsubscribe(channels.clone()).await.map_err(Error::from)?;
            let mut subs = self.subscriptions.lock().unwrap();
            for c in &channels {
                subs.shard_channels.remove(c);
            }
        }
        Ok(())
    }

    /// Binary payloads go out base64-encoded behind the `\x00` marker (see
    /// [`Payload::encode_with_binary_marker`]) so a receiver on the other
    /// end — including [`spawn_pump`]'s own [`Payload::from_bytes`] — can
    /// tell a deliberately-binary message from a string one.
    pub async fn publish(&self, channel: impl Into<String>, payload: Payload) -> Result<i64> {
        self.publisher.publish(channel.into(), payload.encode_with_binary_marker()).await.map_err(Error::from)
    }

    pub async fn spublish(&self, channel: impl Into<String>, payload: Payload) -> Result<i64> {
        self.publisher.spublish(channel.into(), payload.encode_with_binary_marker()).await.map_err(Error::from)
    }
}

/// Minimal glob matcher for the single `*` wildcard Redis patterns use —
/// sufficient for routing an incoming message back to the pattern that
/// produced it, not a general glob implementation.
fn glob_match(pattern: &str, candidate: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == candidate;
    }
    let parts: Vec<&str> = pattern.split('*').collect();
    let mut pos = 0;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        match candidate[pos..].find(part) {
            Some(found) if i == 0 && found != 0 => return false,
            Some(found) => pos += found + part.len(),
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_payload_gets_marker_prefix() {
        let payload = Payload::Binary(Bytes::from_static(&[0xff, 0x00, 0x10]));
        let encoded = payload.encode_with_binary_marker();
        assert!(encoded.starts_with('\u{0}'));
    }

    #[test]
    fn binary_payload_round_trips_through_marker_and_from_bytes() {
        let original = Payload::Binary(Bytes::from_static(&[0xff, 0x00, 0x10, b'a']));
        let encoded = original.encode_with_binary_marker();
        let decoded = Payload::from_bytes(Bytes::copy_from_slice(encoded.as_bytes()));
        assert_eq!(decoded, original);
    }

    #[test]
    fn text_bytes_without_marker_decode_as_text() {
        let decoded = Payload::from_bytes(Bytes::from_static(b"hello"));
        assert_eq!(decoded, Payload::Text("hello".to_string()));
    }

    #[test]
    fn text_payload_passes_through_unmarked() {
        let payload = Payload::Text("hello".to_string());
        assert_eq!(payload.encode_with_binary_marker(), "hello");
    }

    #[test]
    fn glob_matches_prefix_wildcard() {
        assert!(glob_match("news.*", "news.tech"));
        assert!(!glob_match("news.*", "sports.tech"));
        assert!(glob_match("*", "anything"));
    }
}
