// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the annotation, ledger and store modules.
//!
//! The application shell wraps these in `anyhow`; library code returns
//! them directly so callers can tell a recoverable load failure from an
//! export failure.

use thiserror::Error;

/// Errors produced by the sitemark library.
#[derive(Debug, Error)]
pub enum SitemarkError {
    /// An image could not be read or decoded.
    #[error("failed to load image {source_name}: {message}")]
    Load { source_name: String, message: String },

    /// An operation was rejected before it touched any state.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Flattening, encoding or writing an output file failed.
    #[error("export failed: {0}")]
    Export(String),

    /// The record store rejected a request.
    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SitemarkError {
    pub fn load(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Load {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Whether the failure is a per-item load failure that callers may
    /// recover from locally.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

impl From<serde_json::Error> for SitemarkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for SitemarkError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<lopdf::Error> for SitemarkError {
    fn from(e: lopdf::Error) -> Self {
        Self::Export(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SitemarkError>;
