//! Server module
//!
//! Listener setup, the accept loop, and interrupt handling. The loop runs
//! until the shutdown signal fires; each accepted connection is served in
//! its own task and shares only the read-only application state.

pub mod listener;
pub mod signal;

pub use listener::bind_listener;
pub use signal::spawn_shutdown_listener;

use crate::config::AppState;
use crate::handler;
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

/// Accept connections until the shutdown signal fires.
///
/// In-flight requests are not drained on shutdown; connection tasks are
/// dropped with the runtime.
pub async fn serve(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }
}

/// Serve a single connection in a spawned task.
///
/// Wraps the stream in `TokioIo`, configures HTTP/1.1 keep-alive from the
/// performance config, and bounds the whole connection with the larger of
/// the read/write timeouts.
fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let keep_alive = state.config.performance.keep_alive_timeout > 0;
        let timeout_duration = Duration::from_secs(
            state
                .config
                .performance
                .read_timeout
                .max(state.config.performance.write_timeout),
        );

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, peer_addr, Arc::clone(&service_state))
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                logger::log_error(&format!("Failed to serve connection: {err}"));
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use std::path::Path;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn state_for(root: &Path) -> Arc<AppState> {
        let mut cfg = Config::load_from("no-such-config").unwrap();
        cfg.site.root = root.to_path_buf();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(cfg))
    }

    #[tokio::test]
    async fn test_serve_exits_on_shutdown_notification() {
        let dir = tempfile::tempdir().unwrap();
        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();

        let shutdown = Arc::new(Notify::new());
        // notify_one stores a permit, so notifying before serve polls is safe
        shutdown.notify_one();

        serve(listener, state_for(dir.path()), shutdown).await;
    }

    #[tokio::test]
    async fn test_request_roundtrip_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/index.html"), "<html>home</html>").unwrap();

        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(serve(
            listener,
            state_for(dir.path()),
            Arc::clone(&shutdown),
        ));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("<html>home</html>"));

        shutdown.notify_one();
        server.await.unwrap();
    }
}
