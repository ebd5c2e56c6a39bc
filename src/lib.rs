//! Car Catalog Web
//!
//! A server-rendered front-end for browsing car models from an upstream
//! catalog API, with a per-visitor comparison list and favorites set kept in
//! the browser session.
//!
//! # Architecture
//!
//! - **Server**: Axum router, cookie-backed sessions, request tracing
//! - **Catalog**: `reqwest` client for the read-only upstream API
//! - **Session**: in-process store plus a tolerant codec for list values
//! - **Views**: typed view models rendered through embedded templates
//!
//! # Modules
//!
//! - [`catalog`]: catalog records, the `Catalog` trait and its HTTP client
//! - [`session`]: session storage, cookie wiring and the list codec
//! - [`lists`]: comparison and favorite list operations
//! - [`handlers`]: route handlers
//! - [`views`]: view models and templates

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lists;
pub mod server;
pub mod session;
pub mod views;

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::session::SessionBackend;
use crate::views::Templates;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Upstream catalog source.
    pub catalog: Arc<dyn Catalog>,
    /// Visitor session storage.
    pub sessions: Arc<dyn SessionBackend>,
    /// Compiled page templates.
    pub templates: Arc<Templates>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
