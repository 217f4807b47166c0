// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: annotation records, photos, projects and signboards.

pub mod annotation;
pub mod photo;
pub mod project;
