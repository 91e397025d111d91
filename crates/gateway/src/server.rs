// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dual-port HTTP serving (spec §6: overlay port 80, plain port 8080, both
//! with identical routes) with graceful shutdown on cancellation.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::error::GatewayError;
use crate::routes::router;
use crate::state::AppState;

/// Bind both listeners and serve until `cancel` fires. A failure to bind
/// the overlay port 80 (commonly unprivileged) is logged as a warning and
/// does not fail startup; failure to bind the plain port 8080 is fatal.
pub async fn serve(state: AppState, cancel: CancellationToken) -> Result<(), GatewayError> {
    let app = router(state).layer(TraceLayer::new_for_http());

    let plain_addr: SocketAddr = ([0, 0, 0, 0], 8080).into();
    let plain_listener = TcpListener::bind(plain_addr)
        .await
        .map_err(|e| GatewayError::Bind(plain_addr, e))?;
    tracing::info!(addr = %plain_addr, "gateway listening");

    let overlay_addr: SocketAddr = ([0, 0, 0, 0], 80).into();
    let overlay_listener = match TcpListener::bind(overlay_addr).await {
        Ok(listener) => Some(listener),
        Err(err) => {
            tracing::warn!(addr = %overlay_addr, error = %err, "failed to bind overlay listener, continuing without it");
            None
        }
    };

    let plain_cancel = cancel.clone();
    let plain_app = app.clone();
    let plain_task = tokio::spawn(async move {
        axum::serve(plain_listener, plain_app)
            .with_graceful_shutdown(async move { plain_cancel.cancelled().await })
            .await
    });

    let overlay_task = overlay_listener.map(|listener| {
        let overlay_cancel = cancel.clone();
        let overlay_app = app;
        tokio::spawn(async move {
            axum::serve(listener, overlay_app)
                .with_graceful_shutdown(async move { overlay_cancel.cancelled().await })
                .await
        })
    });

    match plain_task.await {
        Ok(Err(err)) => tracing::warn!(error = %err, "gateway plain-port server error"),
        Err(err) => tracing::warn!(error = %err, "gateway plain-port server task panicked"),
        Ok(Ok(())) => {}
    }
    if let Some(task) = overlay_task {
        match task.await {
            Ok(Err(err)) => tracing::warn!(error = %err, "gateway overlay-port server error"),
            Err(err) => tracing::warn!(error = %err, "gateway overlay-port server task panicked"),
            Ok(Ok(())) => {}
        }
    }

    Ok(())
}
