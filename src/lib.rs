//! Local development web server for the campus air quality dashboard.
//!
//! Maps a fixed set of URL paths to static assets on disk, verifies the
//! required assets exist before binding the port, and opens the default
//! browser shortly after startup.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod startup;
