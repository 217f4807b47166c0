// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Read from `sitemark.yaml` in the working directory, or from the file
//! named by `SITEMARK_CONFIG`. YAML and JSON are both accepted; a missing
//! file means defaults.

use crate::annotate::{StrokeSettings, MAX_LINE_WIDTH, MIN_LINE_WIDTH};
use crate::error::{Result, SitemarkError};
use crate::io::serialization::{export_by_extension, import_by_extension};
use crate::ledger::LedgerConfig;
use crate::models::annotation::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SITEMARK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "sitemark.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the local photo store.
    pub data_dir: PathBuf,
    /// Width in pixels of the annotation buffer.
    pub display_width: u32,
    pub default_color: Color,
    pub default_line_width: f32,
    /// JPEG quality for annotated copies.
    pub jpeg_quality: u8,
    /// Starting directory for ledger exports; the save dialog decides when
    /// unset.
    pub export_dir: Option<PathBuf>,
    pub ledger: LedgerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("sitemark-data"),
            display_width: 800,
            default_color: Color::RED,
            default_line_width: 3.0,
            jpeg_quality: crate::io::media::ANNOTATED_JPEG_QUALITY,
            export_dir: None,
            ledger: LedgerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Path the configuration is read from.
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config: Self = import_by_extension(path)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        export_by_extension(self, path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.display_width == 0 {
            return Err(SitemarkError::Validation("display_width must be positive".into()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(SitemarkError::Validation(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if !(MIN_LINE_WIDTH..=MAX_LINE_WIDTH).contains(&self.default_line_width) {
            return Err(SitemarkError::Validation(format!(
                "default_line_width must be between {} and {}",
                MIN_LINE_WIDTH, MAX_LINE_WIDTH
            )));
        }
        Ok(())
    }

    /// Stroke settings a new session starts with.
    pub fn stroke_settings(&self) -> StrokeSettings {
        StrokeSettings {
            color: self.default_color,
            line_width: self.default_line_width,
        }
    }
}
