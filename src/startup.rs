//! Startup sequencing module
//!
//! Validates the required dashboard assets before the port is bound, prints
//! the operator banner, and launches the delayed browser-open task.

use std::path::Path;
use std::time::Duration;

/// Assets that must exist under the project root before the server starts.
pub const REQUIRED_ASSETS: [&str; 4] = [
    "pages/index.html",
    "pages/dashboard.html",
    "js/data-manager.js",
    "data/locations.json",
];

/// Return the required assets missing under `root`, in list order.
///
/// An empty result means the server may start.
pub fn missing_assets(root: &Path) -> Vec<String> {
    REQUIRED_ASSETS
        .iter()
        .filter(|rel| !root.join(rel).exists())
        .map(|rel| (*rel).to_string())
        .collect()
}

/// Print the operator-facing startup banner.
pub fn print_banner(base_url: &str) {
    println!("Campus Air Quality Monitor");
    println!("==============================");
    println!();
    println!("Starting local web server...");
    println!("Server will be available at: {base_url}");
    println!();
    println!("Navigation:");
    println!("- Home Page: {base_url}");
    println!("- Dashboard: Click location cards to view real-time data");
    println!();
    println!("Features:");
    println!("- Real-time CO2 and humidity monitoring");
    println!("- Add/edit/delete locations");
    println!("- Historical data charts");
    println!("- ThingSpeak API integration");
    println!();
    println!("Press Ctrl+C to stop the server");
    println!();
}

/// Spawn the fire-and-forget task that opens the default browser at
/// `base_url` after `delay`.
///
/// The delay gives the listener time to come up. A launch failure prints a
/// fallback instruction and is otherwise ignored; the server keeps running.
pub fn spawn_browser_opener(base_url: String, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match open::that(&base_url) {
            Ok(()) => println!("Browser opened successfully!"),
            Err(e) => {
                eprintln!("Could not open browser automatically: {e}");
                eprintln!("Please open {base_url} in your browser");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_asset(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"asset").unwrap();
    }

    #[test]
    fn test_nothing_missing_when_all_assets_present() {
        let dir = tempfile::tempdir().unwrap();
        for rel in REQUIRED_ASSETS {
            write_asset(dir.path(), rel);
        }
        assert!(missing_assets(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_assets_reported_in_list_order() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), "pages/dashboard.html");

        let missing = missing_assets(dir.path());
        assert_eq!(
            missing,
            vec!["pages/index.html", "js/data-manager.js", "data/locations.json"]
        );
    }

    #[test]
    fn test_empty_root_reports_every_asset() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(missing_assets(dir.path()).len(), REQUIRED_ASSETS.len());
    }
}
