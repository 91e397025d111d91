// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration (spec §6). Recognized keys are unchanged from the
//! system this was distilled from; `data_dir` is an addition needed by our
//! WAL+snapshot durability substrate (see DESIGN.md), which has no
//! counterpart in a Temporal-backed original.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

fn default_namespace() -> String {
    "default".to_string()
}

fn default_task_queue() -> String {
    "swarm-kube-events".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/swarm")
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemporalConfig {
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(rename = "taskQueue", default = "default_task_queue")]
    pub task_queue: String,
    #[serde(rename = "useTsnet", default)]
    pub use_tsnet: bool,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            namespace: default_namespace(),
            task_queue: default_task_queue(),
            use_tsnet: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TailscaleConfig {
    #[serde(default)]
    pub hostname: String,
    #[serde(rename = "oauthClientID", default)]
    pub oauth_client_id: String,
    #[serde(rename = "oauthClientSecret", default)]
    pub oauth_client_secret: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    pub name: String,
    pub endpoint: String,
}

/// Parsed but inert — cleanup/probe parameters are out of core scope
/// (spec §1), kept only so the schema stays forward-compatible with a
/// later milestone, matching the teacher's convention of carrying
/// not-yet-wired config fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LifecycleConfig {
    #[serde(default)]
    pub extra: std::collections::BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub temporal: TemporalConfig,
    #[serde(default)]
    pub tailscale: TailscaleConfig,
    #[serde(default)]
    pub clusters: Vec<ClusterConfig>,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("parsing config {0}: {1}")]
    Parse(PathBuf, #[source] serde_yaml::Error),
    #[error("config has no clusters[] entries")]
    NoClusters,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let mut cfg: Config =
            serde_yaml::from_str(&data).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("TS_OAUTH_CLIENT_ID") {
            if !id.is_empty() {
                self.tailscale.oauth_client_id = id;
            }
        }
        if let Ok(secret) = std::env::var("TS_OAUTH_CLIENT_SECRET") {
            if !secret.is_empty() {
                self.tailscale.oauth_client_secret = secret;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.clusters.is_empty() {
            return Err(ConfigError::NoClusters);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
