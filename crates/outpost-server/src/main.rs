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

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use outpost::{
    DispatchRunner, DispatchRunnerConfig, ProgressCache, RedisProgressCache, WebhookNotifier,
};
use outpost_server::{router, AppState};

/// Outbox message dispatcher with an HTTP control API.
#[derive(Parser, Debug)]
#[command(name = "outpost-server", version, about)]
struct Args {
    /// Database connection string (PostgreSQL or SQLite)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Database name (PostgreSQL only; ignored for SQLite)
    #[arg(long, env = "DATABASE_NAME", default_value = "outpost")]
    database_name: String,

    /// Redis address for best-effort progress recording
    #[arg(long, env = "CACHE_URL")]
    cache_url: Option<String>,

    /// Endpoint URL message payloads are delivered to
    #[arg(long, env = "WEBHOOK_URL")]
    webhook_url: String,

    /// Seconds between dispatch cycles
    #[arg(long, env = "OUTPOST_TICK_SECONDS", default_value_t = 120)]
    tick_seconds: u64,

    /// Pending messages selected per cycle
    #[arg(long, env = "OUTPOST_BATCH_SIZE", default_value_t = 2)]
    batch_size: usize,

    /// Bind address for the HTTP API
    #[arg(long, env = "OUTPOST_HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    outpost::init_logging(None);

    let config = DispatchRunnerConfig::builder()
        .batch_size(args.batch_size)
        .tick_interval(Duration::from_secs(args.tick_seconds))
        .build();

    let notifier = WebhookNotifier::new(&args.webhook_url)?;

    let mut builder = DispatchRunner::builder()
        .database_url(&args.database_url)
        .database_name(&args.database_name)
        .notifier(Arc::new(notifier))
        .with_config(config);

    // A dead cache must not keep the dispatcher from starting; progress
    // recording is best effort either way.
    if let Some(cache_url) = &args.cache_url {
        match RedisProgressCache::connect(cache_url).await {
            Ok(cache) => {
                info!("Progress cache connected at {}", cache_url);
                builder = builder.cache(Arc::new(cache) as Arc<dyn ProgressCache>);
            }
            Err(e) => {
                warn!("Progress cache unavailable, continuing without it: {}", e);
            }
        }
    }

    let runner = builder.build().await?;
    info!(
        "Dispatch runner started: batch_size={} tick={}s",
        runner.config().batch_size(),
        runner.config().tick_interval().as_secs()
    );

    let state = AppState::new(
        runner.dal(),
        runner.pause_control(),
        runner.config().sent_read_limit(),
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.http_addr).await?;
    info!("HTTP API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    runner.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
