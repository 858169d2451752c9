use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use airq_server::config::{AppState, Config};
use airq_server::{logger, server, startup};

fn main() -> ExitCode {
    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Required assets are checked before anything binds; a broken checkout
    // should fail here, not after the browser has already been pointed at it.
    let missing = startup::missing_assets(&cfg.site.root);
    if !missing.is_empty() {
        eprintln!("Error: Missing required files!");
        for path in &missing {
            eprintln!("  - {path}");
        }
        return ExitCode::FAILURE;
    }

    if let Err(e) = logger::init(&cfg) {
        eprintln!("Error initializing logging: {e}");
        return ExitCode::FAILURE;
    }

    startup::print_banner(&cfg.base_url());

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting server: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cfg)) {
        Ok(()) => {
            println!("\nServer stopped by user");
            println!("Thanks for using Campus Air Quality Monitor!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error starting server: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Bring the server up and block until an interrupt signal arrives.
async fn run(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let shutdown = server::spawn_shutdown_listener();

    if cfg.browser.auto_open {
        startup::spawn_browser_opener(
            cfg.base_url(),
            Duration::from_millis(cfg.browser.open_delay_ms),
        );
    }

    let listener = server::bind_listener(addr)?;
    println!("Starting server on {}...", cfg.base_url());

    let state = Arc::new(AppState::new(cfg));
    server::serve(listener, state, shutdown).await;

    Ok(())
}
