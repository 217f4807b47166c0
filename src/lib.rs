// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sitemark - construction-site photo annotation and photo ledgers.
//!
//! The library holds everything that does not need a window: the raster
//! annotation engine, ledger composition and PDF output, the local photo
//! store and configuration. The desktop shell lives in the binary.

pub mod annotate;
pub mod config;
pub mod error;
pub mod io;
pub mod ledger;
pub mod models;
pub mod store;
pub mod surface;
pub mod util;

pub use annotate::AnnotationSession;
pub use error::{Result, SitemarkError};
