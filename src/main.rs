// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sitemark - construction-site photo annotation and photo ledgers.
//!
//! A desktop application for marking up site photos with pens, shapes,
//! stamps and signboards, and for printing photo ledgers to PDF.

mod app;
mod ui;

use anyhow::{Context, Result};
use app::SitemarkApp;
use sitemark::config::AppConfig;
use sitemark::store::LocalStore;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let store = LocalStore::open(&config.data_dir)
        .with_context(|| format!("Failed to open store at {}", config.data_dir.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Sitemark"),
        ..Default::default()
    };

    eframe::run_native(
        "Sitemark",
        options,
        Box::new(|_cc| Ok(Box::new(SitemarkApp::new(config, store)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
