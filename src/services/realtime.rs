use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

/// Event name used for dashboard notification broadcasts, both globally and
/// per room.
pub const DASHBOARD_EVENT: &str = "dashboard:notification";

/// Channel name for one recipient scope, e.g. `investor:123`.
pub fn room_key(recipient_type: &str, recipient_id: &str) -> String {
    format!("{}:{}", recipient_type, recipient_id)
}

/// In-process broadcast hub for connected dashboard sessions. One global
/// channel plus lazily created per-scope rooms. The hub lives in `AppState`
/// behind `Option` so "realtime transport not started yet" is an explicit
/// state rather than a runtime error.
pub struct RealtimeHub {
    global: broadcast::Sender<String>,
    rooms: RwLock<HashMap<String, broadcast::Sender<String>>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        let (global, _) = broadcast::channel(256);
        Self {
            global,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    pub fn subscribe_global(&self) -> broadcast::Receiver<String> {
        self.global.subscribe()
    }

    /// Join a room, creating its channel on first subscribe.
    pub async fn subscribe_room(&self, room: &str) -> broadcast::Receiver<String> {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(256).0)
            .subscribe()
    }

    /// Emit to every connected session. Returns the number of receivers the
    /// payload was delivered to; zero receivers is not an error.
    pub fn emit_global<T: Serialize>(&self, event: &str, payload: &T) -> usize {
        self.global.send(envelope(event, payload)).unwrap_or(0)
    }

    /// Emit to one room. A room nobody has joined yet has no channel, which
    /// counts as zero receivers.
    pub async fn emit_to_room<T: Serialize>(&self, room: &str, event: &str, payload: &T) -> usize {
        let rooms = self.rooms.read().await;
        match rooms.get(room) {
            Some(tx) => tx.send(envelope(event, payload)).unwrap_or(0),
            None => 0,
        }
    }
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

fn envelope<T: Serialize>(event: &str, payload: &T) -> String {
    serde_json::json!({ "event": event, "payload": payload }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn global_emit_reaches_subscribers() {
        let hub = RealtimeHub::new();
        let mut rx = hub.subscribe_global();

        let delivered = hub.emit_global(DASHBOARD_EVENT, &serde_json::json!({"id": "n-1"}));
        assert_eq!(delivered, 1);

        let text = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["event"], DASHBOARD_EVENT);
        assert_eq!(value["payload"]["id"], "n-1");
    }

    #[tokio::test]
    async fn room_emit_is_scoped() {
        let hub = RealtimeHub::new();
        let mut driver_rx = hub.subscribe_room(&room_key("driver", "D1")).await;

        // Nobody joined this room
        let delivered = hub
            .emit_to_room("investor:I1", DASHBOARD_EVENT, &serde_json::json!({}))
            .await;
        assert_eq!(delivered, 0);

        let delivered = hub
            .emit_to_room("driver:D1", DASHBOARD_EVENT, &serde_json::json!({"id": "n-2"}))
            .await;
        assert_eq!(delivered, 1);
        assert!(driver_rx.recv().await.unwrap().contains("n-2"));
    }

    #[test]
    fn room_key_concatenates_scope() {
        assert_eq!(room_key("investor", "123"), "investor:123");
    }
}
