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

//! # Outpost
//!
//! Outpost is a durable outbox dispatcher: messages are written to a
//! database as pending, and a periodic background cycle delivers them to a
//! downstream HTTP endpoint with at-least-once semantics. A message only
//! transitions to sent after the endpoint has acknowledged it, so a crash,
//! a rejection or an unreachable endpoint never loses a message - it stays
//! pending and is retried on a later cycle.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use outpost::{DispatchRunner, WebhookNotifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     outpost::init_logging(None);
//!
//!     let notifier = WebhookNotifier::new("http://localhost:9090/notify")?;
//!     let runner = DispatchRunner::builder()
//!         .database_url("sqlite://outpost.db")
//!         .notifier(Arc::new(notifier))
//!         .build()
//!         .await?;
//!
//!     // Enqueue a message; it is delivered on the next cycle.
//!     runner
//!         .dal()
//!         .messages()
//!         .create(outpost::NewMessage {
//!             content: "hello".to_string(),
//!             phone_number: "+15550100".to_string(),
//!         })
//!         .await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     runner.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`models`]: the message domain type and its wire payload
//! - [`database`]: connection pooling, backend selection and migrations
//!   for PostgreSQL and SQLite
//! - [`dal`]: message store operations (batch selection, the sent
//!   transition, the capped read view)
//! - [`notifier`]: delivery to the downstream endpoint and the per-attempt
//!   outcome model
//! - [`cache`]: best-effort recording of delivery progress
//! - [`dispatcher`]: the dispatch cycle that ties selection, delivery and
//!   commit together
//! - [`runner`]: the periodic timer, pause flag and shutdown path
//!
//! ## Delivery Semantics
//!
//! Each cycle selects the oldest pending messages (bounded by the batch
//! size) and attempts to deliver each one independently. Only messages the
//! endpoint accepted are committed as sent; everything else remains
//! pending. Duplicate deliveries can happen (a message accepted right
//! before a crash is redelivered), but a message is never marked sent
//! without an acknowledgement.

pub mod cache;
pub mod dal;
pub mod database;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod notifier;
pub mod runner;

pub use cache::{NoopProgressCache, ProgressCache, RedisProgressCache};
pub use dal::{MessageDAL, DAL};
pub use database::{current_timestamp, BackendType, Database, UniversalTimestamp, UniversalUuid};
pub use dispatcher::{CycleStats, DispatchCycle};
pub use error::{CacheError, ConfigError, StoreError};
pub use models::{Message, MessagePayload, NewMessage, READ_CONTENT_LIMIT};
pub use notifier::{DeliveryOutcome, Notifier, WebhookNotifier};
pub use runner::{
    DispatchRunner, DispatchRunnerBuilder, DispatchRunnerConfig, DispatchRunnerConfigBuilder,
    PauseControl,
};

use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber.
///
/// The `RUST_LOG` environment variable takes precedence when set;
/// otherwise `default_level` is used, falling back to `info`. Safe to call
/// more than once - only the first call installs a subscriber.
pub fn init_logging(default_level: Option<tracing::Level>) {
    LOGGING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let fallback = default_level
            .map(|level| level.to_string())
            .unwrap_or_else(|| "info".to_string());
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .init();
    });
}
