// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only write-ahead log of mutations applied to a durable task's
//! state between snapshots.
//!
//! A task persists every mutation it applies (an incoming signal, a
//! completed activity result) as one JSON line. On restart, the task loads
//! its last [`Snapshot`](crate::snapshot::Snapshot) and replays any WAL
//! entries recorded after it, so a crash between two snapshots never loses
//! or double-applies a mutation.

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::RuntimeError;

/// One durable record: a monotonic sequence number plus the event it
/// carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalEntry<E> {
    pub seq: u64,
    pub event: E,
}

/// An append-only log backed by a single file, opened in append mode.
pub struct Wal<E> {
    path: PathBuf,
    file: File,
    next_seq: u64,
    _marker: std::marker::PhantomData<E>,
}

impl<E: Serialize + for<'de> Deserialize<'de>> Wal<E> {
    /// Open (creating if absent) the log at `path`, positioned to append
    /// after the last entry it already holds.
    pub fn open(path: &Path) -> Result<Self, RuntimeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let existing = Self::read_all_from_file(path)?;
        let next_seq = existing.last().map(|e| e.seq + 1).unwrap_or(0);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { path: path.to_path_buf(), file, next_seq, _marker: std::marker::PhantomData })
    }

    /// Append one event, fsyncing before returning so the write survives a
    /// crash immediately after this call returns.
    pub fn append(&mut self, event: E) -> Result<u64, RuntimeError> {
        let seq = self.next_seq;
        let entry = WalEntry { seq, event };
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.sync_data()?;
        self.next_seq += 1;
        Ok(seq)
    }

    /// Read every entry currently in the log.
    pub fn read_all(&self) -> Result<Vec<WalEntry<E>>, RuntimeError> {
        Self::read_all_from_file(&self.path)
    }

    /// Read only entries recorded at or after `after_seq` (exclusive lower
    /// bound is `after_seq` itself is excluded; pass the snapshot's last
    /// applied seq + 1 to get entries not yet folded into it).
    pub fn read_from(&self, from_seq: u64) -> Result<Vec<WalEntry<E>>, RuntimeError> {
        Ok(self.read_all()?.into_iter().filter(|e| e.seq >= from_seq).collect())
    }

    /// Truncate the log to empty — called once a fresh snapshot has folded
    /// in every entry, at a continue-as-new boundary.
    pub fn truncate(&mut self) -> Result<(), RuntimeError> {
        self.file = OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?;
        Ok(())
    }

    fn read_all_from_file(path: &Path) -> Result<Vec<WalEntry<E>>, RuntimeError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(path)?);
        let mut out = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            out.push(serde_json::from_str(&line)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
