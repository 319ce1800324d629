// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for the external device services
//!
//! The application never talks to hardware or platform services directly;
//! each service sits behind a trait so the app can be driven by real engines,
//! file-backed stand-ins, or test fakes:
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                  App Layer                    │
//! └───────────────────────┬───────────────────────┘
//!                         │
//! ┌───────────────────────┴───────────────────────┐
//! │                 Backend Layer                 │
//! │  ┌──────────────┐  ┌───────────────────────┐  │
//! │  │CaptureEngine │  │     FaceDetector      │  │
//! │  │ (virtual cam)│  │  (sidecar detector)   │  │
//! │  └──────────────┘  └───────────────────────┘  │
//! │  ┌──────────────┐  ┌───────────────────────┐  │
//! │  │ FileStorage  │  │     PhotoLibrary      │  │
//! │  │ (tokio::fs)  │  │ (directory library)   │  │
//! │  └──────────────┘  └───────────────────────┘  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: capture engine trait and camera settings
//! - [`virtual_camera`]: capture engine replaying an image file
//! - [`face_detection`]: detector trait, face types, sidecar detector
//! - [`library`]: shared photo library trait and directory library
//!
//! File storage lives in [`crate::storage`].

pub mod camera;
pub mod face_detection;
pub mod library;
pub mod virtual_camera;
