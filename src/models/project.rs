// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Construction projects and their signboards.
//!
//! These mirror the records kept by the REST backends; sitemark only reads
//! them to label ledgers and to composite signboards onto photos.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a construction project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

/// A construction job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: ProjectStatus,
}

/// Text content printed on a signboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignboardContent {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub construction_period: String,
    #[serde(default)]
    pub contractor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// A metadata placard shown in site photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signboard {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub content: SignboardContent,
}

impl Signboard {
    /// Heading shown on the overlay: the project name, else the title.
    pub fn heading(&self) -> &str {
        if self.content.project_name.is_empty() {
            &self.title
        } else {
            &self.content.project_name
        }
    }

    /// Labelled detail lines, skipping empty fields.
    pub fn detail_lines(&self) -> Vec<String> {
        let c = &self.content;
        let mut lines = Vec::new();
        if !c.construction_period.is_empty() {
            lines.push(format!("Period: {}", c.construction_period));
        }
        if !c.contractor.is_empty() {
            lines.push(format!("Contractor: {}", c.contractor));
        }
        if let Some(supervisor) = c.supervisor.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("Supervisor: {}", supervisor));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_falls_back_to_title() {
        let mut board = Signboard {
            id: "s1".into(),
            project_id: "p1".into(),
            title: "North wing".into(),
            content: SignboardContent::default(),
        };
        assert_eq!(board.heading(), "North wing");
        board.content.project_name = "Riverside Depot".into();
        assert_eq!(board.heading(), "Riverside Depot");
    }

    #[test]
    fn test_detail_lines_skip_empty_fields() {
        let board = Signboard {
            id: "s1".into(),
            project_id: "p1".into(),
            title: "t".into(),
            content: SignboardContent {
                contractor: "Acme Builders".into(),
                supervisor: Some(String::new()),
                ..Default::default()
            },
        };
        assert_eq!(board.detail_lines(), vec!["Contractor: Acme Builders".to_string()]);
    }
}
