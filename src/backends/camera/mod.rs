// SPDX-License-Identifier: GPL-3.0-only

//! Capture engine abstraction
//!
//! The camera hardware lives behind [`CaptureEngine`]. The application hands
//! the engine its full [`CaptureSettings`] on every capture and receives the
//! path of a temporary image, which the capture handler then moves into the
//! photos directory.
//!
//! ```text
//! ┌─────────────────────┐
//! │   App (AppModel)    │
//! └──────────┬──────────┘
//!            │ CaptureSettings
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureEngine Trait │
//! └──────────┬──────────┘
//!            │
//!            ▼
//!   ┌──────────────────┐
//!   │ FileSourceCamera │  ← virtual camera backed by an image file
//!   └──────────────────┘
//! ```

pub mod types;

pub use types::*;

use crate::errors::CaptureError;
use futures::future::BoxFuture;

/// Result type for capture engine operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Camera engine interface
///
/// Methods return boxed futures so engines can be shared as
/// `Arc<dyn CaptureEngine>` between the model and spawned tasks.
pub trait CaptureEngine: Send + Sync {
    /// Human-readable engine name for logs and the status bar
    fn name(&self) -> &str;

    /// Capture a single still image with the given settings
    ///
    /// The returned image lives at a temporary path owned by the caller.
    fn capture<'a>(
        &'a self,
        settings: &'a CaptureSettings,
    ) -> BoxFuture<'a, CaptureResult<CapturedImage>>;

    /// Aspect ratios the engine can produce, e.g. `["4:3", "16:9"]`
    ///
    /// An empty list means the engine accepts any ratio.
    fn supported_ratios(&self) -> BoxFuture<'_, CaptureResult<Vec<String>>>;
}
