use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// FCM caps multicast sends at 500 registration tokens per request.
pub const MAX_TOKENS_PER_BATCH: usize = 500;

/// A notification to be delivered to one or more device tokens.
#[derive(Debug, Clone)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

/// Wire shape of a single multicast request.
#[derive(Debug, Clone, Serialize)]
pub struct MulticastMessage {
    pub registration_ids: Vec<String>,
    pub notification: PushNotification,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}

/// Per-batch delivery outcome. Token-level failures are reported here, never
/// raised as errors.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub success_count: u32,
    pub failure_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<SendResult>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Transport seam for the push provider, mockable in tests.
#[async_trait]
pub trait PushGateway: Send + Sync + 'static {
    async fn send_multicast(&self, message: &MulticastMessage) -> AppResult<BatchResponse>;
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    success: u32,
    failure: u32,
    results: Option<Vec<FcmResult>>,
}

#[derive(Debug, Deserialize)]
struct FcmResult {
    message_id: Option<String>,
    error: Option<String>,
}

/// HTTP client for the FCM legacy send endpoint.
pub struct FcmClient {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl FcmClient {
    pub fn new(server_key: &str, endpoint: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            server_key: server_key.to_string(),
        })
    }
}

#[async_trait]
impl PushGateway for FcmClient {
    async fn send_multicast(&self, message: &MulticastMessage) -> AppResult<BatchResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Push(format!(
                "FCM returned {}: {}",
                status, body
            )));
        }

        let parsed: FcmResponse = response.json().await?;
        Ok(BatchResponse {
            success_count: parsed.success,
            failure_count: parsed.failure,
            responses: parsed.results.map(|results| {
                results
                    .into_iter()
                    .map(|r| SendResult {
                        message_id: r.message_id,
                        error: r.error,
                    })
                    .collect()
            }),
        })
    }
}

/// Wraps a [`PushGateway`] with batching rules: an empty token list is a
/// silent no-op and oversized lists are truncated to the provider cap.
#[derive(Clone)]
pub struct PushDispatcher {
    gateway: Arc<dyn PushGateway>,
}

impl PushDispatcher {
    pub fn new(gateway: Arc<dyn PushGateway>) -> Self {
        Self { gateway }
    }

    pub async fn send_batch(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> AppResult<BatchResponse> {
        if tokens.is_empty() {
            return Ok(BatchResponse::default());
        }

        let tokens = &tokens[..tokens.len().min(MAX_TOKENS_PER_BATCH)];
        let request = MulticastMessage {
            registration_ids: tokens.to_vec(),
            notification: PushNotification {
                title: message.title.clone(),
                body: message.body.clone(),
            },
            data: stringify_data(&message.data),
        };
        self.gateway.send_multicast(&request).await
    }
}

/// FCM data payloads must be flat string maps; non-string values are coerced
/// via their JSON rendering.
fn stringify_data(data: &serde_json::Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    if let serde_json::Value::Object(map) = data {
        for (key, value) in map {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            out.insert(key.clone(), text);
        }
    }
    out
}
