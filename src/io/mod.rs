// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for photos, configuration and the record index.

pub mod media;
pub mod serialization;
