// SPDX-License-Identifier: GPL-3.0-only

//! Photobooth - capture photos and browse them with face overlays
//!
//! The crate provides a capture screen with flash, white balance, zoom,
//! focus and aspect-ratio controls, and a gallery that marks detected faces
//! on thumbnails and exports a selection to a shared photo library.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Application model, update loop and task runtime
//! - [`backends`]: Capture engine, face detector and photo library services
//! - [`storage`]: Photos directory access and photo naming
//! - [`config`]: User configuration handling
//! - [`terminal`]: Interactive terminal front-end
//!
//! # Example
//!
//! ```ignore
//! let config = Config::load()?;
//! let services = Services::local(&config, "/tmp/source.jpg".into());
//! let (mut model, startup) = AppModel::new(config, services);
//! let mut runtime = Runtime::new();
//! runtime.spawn(startup);
//! runtime.run_until_idle(&mut model, AppModel::update).await;
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::gallery::{ExportOutcome, FaceOverlay, ThumbnailGeometry};
pub use app::{AppModel, Message, Runtime, Services, Task};
pub use config::Config;
pub use errors::{AppError, AppResult};
