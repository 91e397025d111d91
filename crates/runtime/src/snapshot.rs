// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence for crash recovery.
//!
//! A [`Snapshot`] is the complete, serializable state handed from one
//! execution of a durable task to the next at a continue-as-new boundary —
//! this is the concrete mechanism behind spec §9's "state carried across
//! restarts" note, and resolves the open question on schema versioning by
//! always stamping a `version`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RuntimeError;

/// A snapshot of a durable task's materialized state at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<S> {
    /// Schema version for migrations. Tasks bump this when `S`'s shape
    /// changes in a way that isn't forward-compatible under serde defaults.
    #[serde(rename = "v")]
    pub version: u32,
    pub state: S,
    pub created_at: DateTime<Utc>,
}

impl<S> Snapshot<S> {
    pub fn new(version: u32, state: S, created_at: DateTime<Utc>) -> Self {
        Self { version, state, created_at }
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`. The
/// oldest backup is removed when the limit is reached.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

/// Write `snapshot` to `path` atomically: serialize to a temp file, rotate
/// the previous snapshot into a `.bak`, then rename into place.
pub fn save_snapshot<S: Serialize>(path: &Path, snapshot: &Snapshot<S>) -> Result<(), RuntimeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let bytes = serde_json::to_vec_pretty(snapshot)?;
    fs::write(&tmp, bytes)?;

    if path.exists() {
        let bak = rotate_bak_path(path);
        fs::rename(path, bak)?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load a snapshot, returning `Ok(None)` if no snapshot file exists yet
/// (fresh task, first execution).
pub fn load_snapshot<S: for<'de> Deserialize<'de>>(
    path: &Path,
    supported_version: u32,
) -> Result<Option<Snapshot<S>>, RuntimeError> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    let snapshot: Snapshot<S> = serde_json::from_slice(&bytes)?;
    if snapshot.version > supported_version {
        return Err(RuntimeError::UnsupportedSchemaVersion {
            found: snapshot.version,
            supported: supported_version,
        });
    }
    Ok(Some(snapshot))
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
