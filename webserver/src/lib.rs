//! Webserver library for the lead ranking service
//!
//! Exposes the run controller over a small JSON API: lead ingestion, run
//! start, batch scoring, finalization, results and CSV export.

pub mod error;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use webserver_impl::WebServer;
