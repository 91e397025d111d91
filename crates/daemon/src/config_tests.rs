// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[test]
fn defaults_namespace_and_task_queue_when_absent() {
    let file = write_config(
        r#"
clusters:
  - name: c1
    endpoint: https://c1.example.com
"#,
    );
    let cfg = Config::load(file.path()).expect("load");
    assert_eq!(cfg.temporal.namespace, "default");
    assert_eq!(cfg.temporal.task_queue, "swarm-kube-events");
}

#[test]
fn rejects_config_with_no_clusters() {
    let file = write_config("temporal:\n  namespace: default\n");
    let err = Config::load(file.path()).expect_err("should fail validation");
    assert!(matches!(err, ConfigError::NoClusters));
}

#[test]
fn env_overrides_take_precedence_over_yaml() {
    let file = write_config(
        r#"
clusters:
  - name: c1
    endpoint: https://c1.example.com
tailscale:
  oauthClientID: from-yaml
"#,
    );
    std::env::set_var("TS_OAUTH_CLIENT_ID", "from-env");
    let cfg = Config::load(file.path()).expect("load");
    std::env::remove_var("TS_OAUTH_CLIENT_ID");
    assert_eq!(cfg.tailscale.oauth_client_id, "from-env");
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let file = write_config("not: [valid: yaml");
    let err = Config::load(file.path()).expect_err("should fail parse");
    assert!(matches!(err, ConfigError::Parse(_, _)));
}
