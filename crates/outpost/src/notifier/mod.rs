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

//! Delivery of message payloads to the downstream notification endpoint.
//!
//! The [`Notifier`] trait is the seam between the dispatch cycle and the
//! outside world. A single delivery attempt produces a [`DeliveryOutcome`];
//! the notifier never retries on its own. Retry happens naturally because
//! messages that were not accepted stay pending and are reselected on a
//! later cycle.

mod webhook;

pub use webhook::WebhookNotifier;

use crate::models::MessagePayload;
use async_trait::async_trait;

/// Result of a single delivery attempt.
///
/// Every attempt resolves to exactly one of these. Only [`Accepted`]
/// makes a message eligible for the sent transition.
///
/// [`Accepted`]: DeliveryOutcome::Accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The endpoint acknowledged the message. `external_id` is the
    /// endpoint's identifier for the accepted message, when it provided
    /// a parseable one.
    Accepted { external_id: Option<String> },
    /// The endpoint responded with a non-acceptance status code.
    Rejected { status: u16 },
    /// The endpoint could not be reached at all.
    Unreachable { reason: String },
}

impl DeliveryOutcome {
    /// Returns true if the endpoint acknowledged the message.
    pub fn is_accepted(&self) -> bool {
        matches!(self, DeliveryOutcome::Accepted { .. })
    }

    /// Returns true if the endpoint answered with a non-acceptance status.
    pub fn is_rejected(&self) -> bool {
        matches!(self, DeliveryOutcome::Rejected { .. })
    }

    /// Returns true if the endpoint could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, DeliveryOutcome::Unreachable { .. })
    }
}

/// Delivers message payloads to a downstream endpoint.
///
/// Implementations make exactly one attempt per call and report what
/// happened through [`DeliveryOutcome`]. Transport failures are part of
/// the outcome, not an error: the dispatch cycle treats every variant as
/// a normal result and decides commit eligibility from it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempts to deliver one message payload.
    async fn deliver(&self, payload: &MessagePayload) -> DeliveryOutcome;
}
