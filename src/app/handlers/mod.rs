// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by screen so related state transitions stay together.

pub mod capture;
pub mod gallery;
pub mod system;
