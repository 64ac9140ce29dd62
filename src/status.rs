//! The connection status state machine of §3 and the event surface of §6.
//!
//! `fred`'s own client exposes connection state changes through its event
//! interface; this module re-shapes that into the legacy finite-state
//! `status` attribute plus the `connect`/`ready`/`end`/`error` event stream
//! ioredis consumers subscribe to.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// The finite state of §3. `Error` is deliberately not a state — it's an
/// orthogonal observable event, emitted alongside whatever state the client
/// is actually in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    Ready = 3,
    Disconnecting = 4,
    End = 5,
}

impl Status {
    fn from_u8(n: u8) -> Self {
        match n {
            0 => Status::Disconnected,
            1 => Status::Connecting,
            2 => Status::Connected,
            3 => Status::Ready,
            4 => Status::Disconnecting,
            _ => Status::End,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Disconnected => "disconnected",
            Status::Connecting => "connecting",
            Status::Connected => "connected",
            Status::Ready => "ready",
            Status::Disconnecting => "disconnecting",
            Status::End => "end",
        }
    }
}

/// Events emitted on the public event surface of §6.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Connect,
    Ready,
    End,
    Error(Arc<str>),
}

/// Holds the current status plus a broadcast channel subscribers can listen
/// on. Cheap to clone — callers share the same underlying state.
#[derive(Clone)]
pub struct StatusTracker {
    state: Arc<AtomicU8>,
    events: broadcast::Sender<ClientEvent>,
}

impl Default for StatusTracker {
    fn default() -> Self {
        let (events, _) = broadcast::channel(64);
        StatusTracker {
            state: Arc::new(AtomicU8::new(Status::Disconnected as u8)),
            events,
        }
    }
}

impl StatusTracker {
    pub fn status(&self) -> Status {
        Status::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Transitions are the only way the status attribute changes (§3).
    pub fn transition(&self, to: Status) {
        self.state.store(to as u8, Ordering::Release);
        let event = match to {
            Status::Connected => Some(ClientEvent::Connect),
            Status::Ready => Some(ClientEvent::Ready),
            Status::End => Some(ClientEvent::End),
            _ => None,
        };
        if let Some(event) = event {
            let _ = self.events.send(event);
        }
    }

    /// `error` is orthogonal to the state machine — it never changes
    /// `status` by itself.
    pub fn emit_error(&self, message: impl Into<Arc<str>>) {
        let _ = self.events.send(ClientEvent::Error(message.into()));
    }

    pub fn has_error_listener(&self) -> bool {
        self.events.receiver_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let tracker = StatusTracker::default();
        assert_eq!(tracker.status().as_str(), "disconnected");
    }

    #[test]
    fn transition_updates_status_and_emits_event() {
        let tracker = StatusTracker::default();
        let mut rx = tracker.subscribe();
        tracker.transition(Status::Connecting);
        assert_eq!(tracker.status().as_str(), "connecting");
        tracker.transition(Status::Ready);
        assert_eq!(tracker.status().as_str(), "ready");
        let event = rx.try_recv().unwrap();
        assert!(matches!(event, ClientEvent::Ready));
    }

    #[test]
    fn error_does_not_change_status() {
        let tracker = StatusTracker::default();
        tracker.transition(Status::Ready);
        tracker.emit_error("boom");
        assert_eq!(tracker.status().as_str(), "ready");
    }
}
