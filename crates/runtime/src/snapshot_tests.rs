// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Demo {
    count: u32,
}

#[test]
fn roundtrips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let snap = Snapshot::new(1, Demo { count: 7 }, Utc::now());
    save_snapshot(&path, &snap).unwrap();

    let loaded: Snapshot<Demo> = load_snapshot(&path, 1).unwrap().unwrap();
    assert_eq!(loaded.state, Demo { count: 7 });
    assert_eq!(loaded.version, 1);
}

#[test]
fn missing_file_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let loaded: Option<Snapshot<Demo>> = load_snapshot(&path, 1).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let snap = Snapshot::new(5, Demo { count: 1 }, Utc::now());
    save_snapshot(&path, &snap).unwrap();

    let result: Result<Option<Snapshot<Demo>>, _> = load_snapshot(&path, 1);
    assert!(matches!(result, Err(RuntimeError::UnsupportedSchemaVersion { found: 5, supported: 1 })));
}

#[test]
fn overwrite_rotates_previous_into_bak() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    save_snapshot(&path, &Snapshot::new(1, Demo { count: 1 }, Utc::now())).unwrap();
    save_snapshot(&path, &Snapshot::new(1, Demo { count: 2 }, Utc::now())).unwrap();

    let bak_path = path.with_extension("bak");
    assert!(bak_path.exists());
    let bak: Snapshot<Demo> = serde_json::from_slice(&std::fs::read(bak_path).unwrap()).unwrap();
    assert_eq!(bak.state.count, 1);

    let current: Snapshot<Demo> = load_snapshot(&path, 1).unwrap().unwrap();
    assert_eq!(current.state.count, 2);
}

#[test]
fn backups_rotate_past_the_cap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    for i in 0..6 {
        save_snapshot(&path, &Snapshot::new(1, Demo { count: i }, Utc::now())).unwrap();
    }

    assert!(path.with_extension("bak").exists());
    assert!(path.with_extension("bak.2").exists());
    assert!(path.with_extension("bak.3").exists());
    assert!(!path.with_extension("bak.4").exists());
}
