use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::db::{CreateNotification, DeviceTokenRepository, Notification, NotificationRepository};
use crate::error::AppResult;
use crate::services::push::{PushDispatcher, PushMessage};
use crate::services::realtime::{room_key, RealtimeHub, DASHBOARD_EVENT};
use crate::AppState;

/// Orchestrates the notification pipeline: persist the record, then fan out
/// over the realtime hub and the push dispatcher. Persistence is the only
/// step that can fail the call; delivery steps log their outcome and move on.
pub struct NotificationService {
    pool: SqlitePool,
    realtime: Arc<RwLock<Option<RealtimeHub>>>,
    push: Arc<RwLock<Option<PushDispatcher>>>,
}

impl NotificationService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            pool: state.db.clone(),
            realtime: state.realtime.clone(),
            push: state.push.clone(),
        }
    }

    #[cfg(test)]
    fn with_parts(
        pool: SqlitePool,
        realtime: Arc<RwLock<Option<RealtimeHub>>>,
        push: Arc<RwLock<Option<PushDispatcher>>>,
    ) -> Self {
        Self {
            pool,
            realtime,
            push,
        }
    }

    pub async fn create(&self, input: CreateNotification) -> AppResult<Notification> {
        let notification = NotificationRepository::create(&self.pool, input).await?;
        tracing::info!(
            id = %notification.id,
            r#type = %notification.notification_type,
            recipient_type = ?notification.recipient_type,
            "Notification created"
        );

        self.broadcast(&notification).await;
        self.dispatch_push(&notification).await;

        Ok(notification)
    }

    async fn broadcast(&self, notification: &Notification) {
        let guard = self.realtime.read().await;
        let Some(hub) = guard.as_ref() else {
            tracing::warn!("Realtime hub not initialized, skipping broadcast");
            return;
        };

        let receivers = hub.emit_global(DASHBOARD_EVENT, notification);
        tracing::debug!(receivers, "Broadcast notification to dashboard");

        if let (Some(rtype), Some(rid)) =
            (&notification.recipient_type, &notification.recipient_id)
        {
            let room = room_key(rtype, rid);
            let receivers = hub.emit_to_room(&room, DASHBOARD_EVENT, notification).await;
            tracing::debug!(room = %room, receivers, "Broadcast notification to room");
        }
    }

    async fn dispatch_push(&self, notification: &Notification) {
        let guard = self.push.read().await;
        let Some(dispatcher) = guard.as_ref() else {
            tracing::debug!("Push dispatcher not configured, skipping push delivery");
            return;
        };

        // Scoped notifications target that recipient's devices; global ones
        // go to every registered device.
        let scope = match (&notification.recipient_type, &notification.recipient_id) {
            (Some(rtype), Some(rid)) => Some((rtype.as_str(), rid.as_str())),
            _ => None,
        };
        let tokens = match DeviceTokenRepository::distinct_tokens(&self.pool, scope).await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!("Failed to load device tokens for push: {}", e);
                return;
            }
        };
        if tokens.is_empty() {
            tracing::debug!("No device tokens registered for scope, skipping push delivery");
            return;
        }

        let message = PushMessage {
            title: notification
                .title
                .clone()
                .unwrap_or_else(|| "Notification".to_string()),
            body: notification.message.clone().unwrap_or_default(),
            data: push_data(notification),
        };

        match dispatcher.send_batch(&tokens, &message).await {
            Ok(result) => tracing::info!(
                id = %notification.id,
                success = result.success_count,
                failure = result.failure_count,
                "Push batch dispatched"
            ),
            Err(e) => tracing::warn!(id = %notification.id, "Push delivery failed: {}", e),
        }
    }
}

/// Payload data plus the stored notification id, so a device tap can resolve
/// the record. Payload keys win on collision.
fn push_data(notification: &Notification) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert(
        "noteId".to_string(),
        serde_json::Value::String(notification.id.clone()),
    );
    if let serde_json::Value::Object(data) = &notification.data.0 {
        for (key, value) in data {
            map.insert(key.clone(), value.clone());
        }
    }
    serde_json::Value::Object(map)
}
