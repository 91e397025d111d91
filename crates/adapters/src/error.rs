// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the Kubernetes/GitOps platform shims.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
}
