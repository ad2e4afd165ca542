//! User-facing status events emitted by the orchestrators.
//!
//! Events go into an unbounded channel that the caller drains at its own pace,
//! so the orchestrator never waits on whoever renders them.

use serde::Serialize;
use tokio::sync::mpsc;

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Info,
    Success,
    Error,
    Progress,
}

/// A status message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub kind: EventKind,
    pub message: String,
}

/// Sending half of the event channel.
///
/// Cloning is cheap. Emitting never blocks and never fails: if the receiver
/// is gone, events are only logged.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Option<mpsc::UnboundedSender<Event>>,
}

impl EventSender {
    /// A sender with no listener. Events are still logged.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, kind: EventKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            EventKind::Error => tracing::error!("{message}"),
            EventKind::Info | EventKind::Success | EventKind::Progress => {
                tracing::info!("{message}")
            }
        }
        if let Some(tx) = &self.tx {
            let _ = tx.send(Event { kind, message });
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(EventKind::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(EventKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(EventKind::Error, message);
    }

    pub fn progress(&self, message: impl Into<String>) {
        self.emit(EventKind::Progress, message);
    }
}

/// Create a connected event sender/receiver pair.
pub fn event_channel() -> (EventSender, mpsc::UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx: Some(tx) }, rx)
}

/// Drain every event currently buffered in the receiver.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (events, mut rx) = event_channel();
        events.info("starting");
        events.progress("5 of 10");
        events.success("done");

        let received = drain(&mut rx);
        let kinds: Vec<_> = received.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Info, EventKind::Progress, EventKind::Success]
        );
        assert_eq!(received[1].message, "5 of 10");
    }

    #[test]
    fn test_emit_after_receiver_dropped_does_not_panic() {
        let (events, rx) = event_channel();
        drop(rx);
        events.error("nobody listening");
    }

    #[test]
    fn test_disabled_sender() {
        EventSender::disabled().info("logged only");
    }

    #[test]
    fn test_event_kind_serializes_lowercase() {
        let json = serde_json::to_string(&EventKind::Progress).unwrap();
        assert_eq!(json, "\"progress\"");
    }
}
