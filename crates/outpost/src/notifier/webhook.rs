/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! HTTP webhook notifier.
//!
//! Posts each message payload as JSON to a configured endpoint URL and
//! maps the HTTP response onto a [`DeliveryOutcome`]:
//!
//! - 200 or 202 is acceptance; the response body is expected to carry the
//!   endpoint's identifier as `{"messageId": "..."}`
//! - any other status is a rejection
//! - transport errors (DNS, refused connection, timeout) are unreachable
//!
//! A body that cannot be parsed does not demote an acceptance. The status
//! code is the acknowledgement; the identifier is only used for progress
//! recording, so a malformed body is logged and the identifier dropped.

use super::{DeliveryOutcome, Notifier};
use crate::error::ConfigError;
use crate::models::MessagePayload;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Response body returned by the endpoint on acceptance.
#[derive(Debug, Deserialize)]
struct AcceptedResponse {
    #[serde(rename = "messageId")]
    message_id: String,
}

/// Notifier that POSTs message payloads to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    /// Request timeout for a single delivery attempt.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a notifier targeting the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "webhook endpoint URL must not be empty".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::Invalid {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, endpoint })
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn deliver(&self, payload: &MessagePayload) -> DeliveryOutcome {
        let response = match self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return DeliveryOutcome::Unreachable {
                    reason: e.to_string(),
                }
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::OK || status == reqwest::StatusCode::ACCEPTED {
            let external_id = match response.json::<AcceptedResponse>().await {
                Ok(body) => Some(body.message_id),
                Err(e) => {
                    tracing::warn!(
                        "Accepted delivery returned unparseable body, dropping external id: {}",
                        e
                    );
                    None
                }
            };
            DeliveryOutcome::Accepted { external_id }
        } else {
            DeliveryOutcome::Rejected {
                status: status.as_u16(),
            }
        }
    }
}
