// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM both mean operator-initiated shutdown; the
// serve loop observes the returned Notify and exits cleanly.

use std::sync::Arc;
use tokio::sync::Notify;

/// Spawn the signal-listener task and return the shutdown notifier (Unix).
#[cfg(unix)]
pub fn spawn_shutdown_listener() -> Arc<Notify> {
    use tokio::signal::unix::{signal, SignalKind};

    let shutdown = Arc::new(Notify::new());
    let notifier = Arc::clone(&shutdown);

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }

        // notify_one stores a permit, so a signal arriving between polls of
        // the serve loop is not lost
        notifier.notify_one();
    });

    shutdown
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn spawn_shutdown_listener() -> Arc<Notify> {
    let shutdown = Arc::new(Notify::new());
    let notifier = Arc::clone(&shutdown);

    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            notifier.notify_one();
        }
    });

    shutdown
}
