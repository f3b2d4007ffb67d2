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

//! Configuration types for the DispatchRunner.
//!
//! This module contains the configuration struct and builders for
//! configuring the DispatchRunner's behavior.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{NoopProgressCache, ProgressCache};
use crate::database::Database;
use crate::dispatcher::DispatchCycle;
use crate::error::ConfigError;
use crate::notifier::Notifier;

use super::{DispatchRunner, PauseControl};

/// Configuration for the dispatch runner
///
/// This struct defines the parameters that control dispatch behavior: how
/// many messages a cycle selects, how often the timer fires, how many sent
/// messages the read path returns, and the database pool size.
///
/// # Construction
///
/// Use [`DispatchRunnerConfig::builder()`] to create a configuration:
///
/// ```rust,ignore
/// let config = DispatchRunnerConfig::builder()
///     .batch_size(5)
///     .tick_interval(Duration::from_secs(60))
///     .build();
/// ```
///
/// Or use the default configuration:
///
/// ```rust,ignore
/// let config = DispatchRunnerConfig::default();
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct DispatchRunnerConfig {
    batch_size: usize,
    tick_interval: Duration,
    sent_read_limit: i64,
    db_pool_size: u32,
}

impl DispatchRunnerConfig {
    /// Creates a new configuration builder with default values.
    pub fn builder() -> DispatchRunnerConfigBuilder {
        DispatchRunnerConfigBuilder::default()
    }

    /// Maximum number of pending messages a single cycle selects.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// How often the dispatch timer fires.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Maximum number of sent messages the read path returns.
    pub fn sent_read_limit(&self) -> i64 {
        self.sent_read_limit
    }

    /// Number of database connections in the pool.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size
    }
}

/// Builder for [`DispatchRunnerConfig`].
///
/// ```rust,ignore
/// let config = DispatchRunnerConfig::builder()
///     .batch_size(10)
///     .sent_read_limit(500)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DispatchRunnerConfigBuilder {
    config: DispatchRunnerConfig,
}

impl Default for DispatchRunnerConfigBuilder {
    fn default() -> Self {
        Self {
            config: DispatchRunnerConfig {
                batch_size: 2,
                tick_interval: Duration::from_secs(120),
                sent_read_limit: 100,
                db_pool_size: 10,
            },
        }
    }
}

impl DispatchRunnerConfigBuilder {
    /// Sets the number of pending messages selected per cycle.
    pub fn batch_size(mut self, value: usize) -> Self {
        self.config.batch_size = value;
        self
    }

    /// Sets the dispatch timer interval.
    pub fn tick_interval(mut self, value: Duration) -> Self {
        self.config.tick_interval = value;
        self
    }

    /// Sets the sent-message read cap.
    pub fn sent_read_limit(mut self, value: i64) -> Self {
        self.config.sent_read_limit = value;
        self
    }

    /// Sets the database pool size.
    pub fn db_pool_size(mut self, value: u32) -> Self {
        self.config.db_pool_size = value;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> DispatchRunnerConfig {
        self.config
    }
}

impl Default for DispatchRunnerConfig {
    fn default() -> Self {
        DispatchRunnerConfigBuilder::default().build()
    }
}

/// Builder for creating a running DispatchRunner
///
/// Wires together the database, the notification endpoint and the optional
/// progress cache, applies migrations, and starts the timer loop.
///
/// # Example
/// ```rust,ignore
/// let notifier = WebhookNotifier::new("http://localhost:9090/notify")?;
/// let runner = DispatchRunner::builder()
///     .database_url("sqlite://outpost.db")
///     .notifier(Arc::new(notifier))
///     .build()
///     .await?;
/// ```
pub struct DispatchRunnerBuilder {
    pub(super) database_url: Option<String>,
    pub(super) database_name: String,
    pub(super) notifier: Option<Arc<dyn Notifier>>,
    pub(super) cache: Option<Arc<dyn ProgressCache>>,
    pub(super) config: DispatchRunnerConfig,
}

impl Default for DispatchRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchRunnerBuilder {
    /// Creates a new builder with default configuration
    pub fn new() -> Self {
        Self {
            database_url: None,
            database_name: "outpost".to_string(),
            notifier: None,
            cache: None,
            config: DispatchRunnerConfig::default(),
        }
    }

    /// Sets the database URL
    pub fn database_url(mut self, url: &str) -> Self {
        self.database_url = Some(url.to_string());
        self
    }

    /// Sets the database name (PostgreSQL only; ignored for SQLite)
    pub fn database_name(mut self, name: &str) -> Self {
        self.database_name = name.to_string();
        self
    }

    /// Sets the notification endpoint client
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Sets the progress cache; defaults to a no-op cache when unset
    pub fn cache(mut self, cache: Arc<dyn ProgressCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the full configuration
    pub fn with_config(mut self, config: DispatchRunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Checks that every configured value is inside its accepted range
    pub(super) fn validate_config(config: &DispatchRunnerConfig) -> Result<(), ConfigError> {
        if config.batch_size() == 0 {
            return Err(ConfigError::Invalid {
                message: "Batch size must be at least 1".to_string(),
            });
        }
        if config.tick_interval().is_zero() {
            return Err(ConfigError::Invalid {
                message: "Tick interval must be greater than zero".to_string(),
            });
        }
        if config.sent_read_limit() < 1 {
            return Err(ConfigError::Invalid {
                message: "Sent read limit must be at least 1".to_string(),
            });
        }
        if config.db_pool_size() == 0 {
            return Err(ConfigError::Invalid {
                message: "Database pool size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the DispatchRunner
    ///
    /// Validates the configuration, connects to the database, applies any
    /// pending migrations, and starts the dispatch timer. The returned
    /// runner starts unpaused.
    pub async fn build(self) -> Result<DispatchRunner, ConfigError> {
        let database_url = self.database_url.ok_or_else(|| ConfigError::Invalid {
            message: "Database URL is required".to_string(),
        })?;
        let notifier = self.notifier.ok_or_else(|| ConfigError::Invalid {
            message: "A notifier is required".to_string(),
        })?;

        Self::validate_config(&self.config)?;

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(NoopProgressCache) as Arc<dyn ProgressCache>);

        let database = Database::new(
            &database_url,
            &self.database_name,
            self.config.db_pool_size(),
        );
        database
            .run_migrations()
            .await
            .map_err(ConfigError::Migration)?;

        let dal = crate::dal::DAL::new(database.clone());
        let cycle = DispatchCycle::new(
            dal,
            notifier,
            cache,
            self.config.batch_size() as i64,
        );

        let pause = PauseControl::new();
        Ok(DispatchRunner::start(database, self.config, cycle, pause))
    }
}
