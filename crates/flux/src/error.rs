// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FluxError {
    #[error(transparent)]
    Runtime(#[from] swarm_runtime::RuntimeError),
}
