//! Walk-up App
//!
//! Command layer for the walk-up music manager: one [`WalkupApp`] value owns
//! the roster store, the announce engine and the preview engine, and exposes
//! the commands a presentation layer issues (announce, stop, preview, save,
//! delete, lineup moves, uploads) plus the readers it renders from.
//!
//! Also provides configuration loading ([`config::AppConfig`]) and tracing
//! setup ([`logging::init_tracing`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use walkup_app::{config::AppConfig, logging, WalkupApp};
//! use walkup_playback::{EmbedHost, LocalAudioOutput};
//!
//! # async fn example(
//! #     device: Arc<dyn LocalAudioOutput>,
//! #     host: Arc<dyn EmbedHost>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! logging::init_tracing(Some(&config.logging.filter))?;
//!
//! let app = WalkupApp::open(&config, device, host).await?;
//! if let Some(first) = app.lineup().first() {
//!     app.announce(&first.id)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod logging;

pub use app::WalkupApp;
pub use error::{AppError, Result};
