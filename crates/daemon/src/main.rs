// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `swarmd` — bootstraps one `EventWatcher` and one `FluxTracker` per
//! configured cluster, the single global `AlertAggregator`, and the
//! `ReadGateway` HTTP surface, then runs until terminated (spec §6).

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use kube::Client;
use swarm_aggregator::AlertAggregator;
use swarm_core::{Alert, SystemClock};
use swarm_flux::FluxTracker;
use swarm_gateway::{AppState, ClusterInfo, WorkflowHandle};
use swarm_runtime::SignalChannel;
use swarm_watcher::EventWatcher;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "swarmd")]
struct Args {
    /// Path to the YAML config file.
    #[arg(long, env = "CONFIG_PATH", default_value = "/etc/swarm/config.yaml")]
    config: PathBuf,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "swarm_daemon=info,swarm_watcher=info,swarm_flux=info,swarm_aggregator=info,swarm_gateway=info".into());

    match format {
        LogFormat::Text => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().json().with_env_filter(filter).init();
        }
    }
}

fn kube_client_for(endpoint: &str) -> Result<Client, kube::Error> {
    let uri: http::Uri = endpoint.parse().map_err(kube::Error::InvalidUri)?;
    let config = kube::Config::new(uri);
    Client::try_from(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_format);

    let cfg = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(error = %err, path = %args.config.display(), "failed to load config");
            return ExitCode::FAILURE;
        }
    };

    if cfg.temporal.use_tsnet {
        tracing::warn!(
            "temporal.useTsnet is set but the overlay is out of scope for this build; \
             continuing with direct connectivity"
        );
    }

    let cancel = CancellationToken::new();
    let (alert_tx, alert_rx) = SignalChannel::new::<Alert>();

    let mut workflows = Vec::new();
    let mut watchers = std::collections::BTreeMap::new();
    let mut flux_trackers = std::collections::BTreeMap::new();
    let mut join_handles = Vec::new();

    for cluster in &cfg.clusters {
        let client = match kube_client_for(&cluster.endpoint) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!(cluster = %cluster.name, error = %err, "failed to build kube client");
                return ExitCode::FAILURE;
            }
        };

        let watcher_id = format!("cluster-watch-{}", cluster.name);
        let watcher = match EventWatcher::bootstrap(
            client.clone(),
            cluster.name.clone(),
            cluster.endpoint.clone(),
            &cfg.data_dir,
            SystemClock,
            alert_tx.clone(),
        ) {
            Ok(w) => w,
            Err(err) => {
                tracing::error!(cluster = %cluster.name, error = %err, "failed to bootstrap event watcher");
                return ExitCode::FAILURE;
            }
        };
        watchers.insert(cluster.name.clone(), watcher.queries());
        let watcher_cancel = cancel.clone();
        workflows.push(WorkflowHandle {
            id: watcher_id.clone(),
            kind: "ClusterWatchWorkflow",
            started_at: Utc::now(),
            cancel: watcher_cancel.clone(),
        });
        join_handles.push(tokio::spawn(watcher.run(watcher_cancel)));
        tracing::info!(workflow = %watcher_id, "started workflow");

        let tracker_id = format!("flux-watch-{}", cluster.name);
        let tracker = match FluxTracker::bootstrap(
            client,
            cluster.name.clone(),
            cluster.endpoint.clone(),
            &cfg.data_dir,
            SystemClock,
            alert_tx.clone(),
        ) {
            Ok(t) => t,
            Err(err) => {
                tracing::error!(cluster = %cluster.name, error = %err, "failed to bootstrap flux tracker");
                return ExitCode::FAILURE;
            }
        };
        flux_trackers.insert(cluster.name.clone(), tracker.queries());
        let tracker_cancel = cancel.clone();
        workflows.push(WorkflowHandle {
            id: tracker_id.clone(),
            kind: "FluxWatchWorkflow",
            started_at: Utc::now(),
            cancel: tracker_cancel.clone(),
        });
        join_handles.push(tokio::spawn(tracker.run(tracker_cancel)));
        tracing::info!(workflow = %tracker_id, "started workflow");
    }
    drop(alert_tx);

    let aggregator = match AlertAggregator::bootstrap(&cfg.data_dir, SystemClock, alert_rx) {
        Ok(a) => a,
        Err(err) => {
            tracing::error!(error = %err, "failed to bootstrap alert aggregator");
            return ExitCode::FAILURE;
        }
    };
    let aggregator_queries = aggregator.queries();
    let aggregator_cancel = cancel.clone();
    workflows.push(WorkflowHandle {
        id: "swarm-alerts".to_string(),
        kind: "AlertsWorkflow",
        started_at: Utc::now(),
        cancel: aggregator_cancel.clone(),
    });
    join_handles.push(tokio::spawn(aggregator.run(aggregator_cancel)));
    tracing::info!("started alerts workflow");

    let gateway_state = AppState {
        clusters: cfg
            .clusters
            .iter()
            .map(|c| ClusterInfo { name: c.name.clone(), endpoint: c.endpoint.clone() })
            .collect(),
        aggregator: aggregator_queries,
        watchers,
        flux_trackers,
        workflows,
    };
    let gateway_cancel = cancel.clone();
    let gateway_handle = tokio::spawn(swarm_gateway::serve(gateway_state, gateway_cancel));

    tracing::info!(clusters = cfg.clusters.len(), task_queue = %cfg.temporal.task_queue, "swarm daemon started");

    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("failed to install ctrl-c handler");
    }
    tracing::info!("shutting down");
    cancel.cancel();

    for handle in join_handles {
        let _ = handle.await;
    }
    if let Ok(Err(err)) = gateway_handle.await {
        tracing::error!(error = %err, "gateway shutdown with error");
    }

    ExitCode::SUCCESS
}
