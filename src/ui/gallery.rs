// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo list with project filter, paging and ledger selection, plus the
//! project, signboard and import forms.

use crate::ui::properties::{details_form, DetailsForm};
use sitemark::models::photo::{Page, PhotoRecord};
use sitemark::models::project::{Project, Signboard, SignboardContent};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryAction {
    None,
    Filter(Option<String>),
    Select(String),
    Page(usize),
    CreateProject(String),
    CreateSignboard(SignboardForm),
    Import,
}

/// Edit buffer for a new signboard in the filtered project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignboardForm {
    pub title: String,
    pub construction_period: String,
    pub contractor: String,
    pub supervisor: String,
}

impl SignboardForm {
    pub fn is_ready(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Overlay content; the project name comes from the owning project.
    pub fn content(&self, project_name: &str) -> SignboardContent {
        let supervisor = self.supervisor.trim();
        SignboardContent {
            project_name: project_name.to_string(),
            construction_period: self.construction_period.trim().to_string(),
            contractor: self.contractor.trim().to_string(),
            supervisor: (!supervisor.is_empty()).then(|| supervisor.to_string()),
            contact: None,
        }
    }
}

/// Mutable form state owned by the app.
pub struct Forms<'a> {
    pub new_project: &'a mut String,
    pub signboard: &'a mut SignboardForm,
    pub import: &'a mut DetailsForm,
}

/// Display the photo list. `checked` holds ids picked for the ledger.
pub fn show(
    ui: &mut egui::Ui,
    projects: &[Project],
    filter: Option<&str>,
    photos: &Page<PhotoRecord>,
    selected: Option<&str>,
    checked: &mut HashSet<String>,
    signboards: &[Signboard],
    forms: Forms<'_>,
) -> GalleryAction {
    let Forms {
        new_project,
        signboard: signboard_form,
        import,
    } = forms;
    let mut action = GalleryAction::None;

    ui.heading("Photos");
    ui.separator();

    let current = filter
        .and_then(|id| projects.iter().find(|p| p.id == id))
        .map_or("All projects", |p| p.name.as_str());
    egui::ComboBox::from_id_source("project_filter")
        .selected_text(current)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            if ui.selectable_label(filter.is_none(), "All projects").clicked() {
                action = GalleryAction::Filter(None);
            }
            for project in projects {
                if ui
                    .selectable_label(filter == Some(project.id.as_str()), &project.name)
                    .clicked()
                {
                    action = GalleryAction::Filter(Some(project.id.clone()));
                }
            }
        });

    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(new_project).hint_text("New project"));
        if ui
            .add_enabled(!new_project.trim().is_empty(), egui::Button::new("➕"))
            .clicked()
        {
            action = GalleryAction::CreateProject(std::mem::take(new_project));
        }
    });

    if let Some(project_id) = filter {
        let own: Vec<&Signboard> = signboards
            .iter()
            .filter(|s| s.project_id == project_id)
            .collect();

        egui::CollapsingHeader::new("New signboard")
            .id_source("new_signboard")
            .show(ui, |ui| {
                egui::Grid::new("signboard_form")
                    .num_columns(2)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Title:");
                        ui.text_edit_singleline(&mut signboard_form.title);
                        ui.end_row();
                        ui.label("Period:");
                        ui.text_edit_singleline(&mut signboard_form.construction_period);
                        ui.end_row();
                        ui.label("Contractor:");
                        ui.text_edit_singleline(&mut signboard_form.contractor);
                        ui.end_row();
                        ui.label("Supervisor:");
                        ui.text_edit_singleline(&mut signboard_form.supervisor);
                        ui.end_row();
                    });
                if ui
                    .add_enabled(signboard_form.is_ready(), egui::Button::new("Add signboard"))
                    .clicked()
                {
                    action = GalleryAction::CreateSignboard(std::mem::take(signboard_form));
                }
            });

        egui::CollapsingHeader::new("Import details")
            .id_source("import_details")
            .show(ui, |ui| details_form(ui, "import", &own, import));
    }

    if ui
        .add_enabled(filter.is_some(), egui::Button::new("Import photo..."))
        .on_disabled_hover_text("Choose a project first")
        .clicked()
    {
        action = GalleryAction::Import;
    }

    ui.separator();

    if photos.items.is_empty() {
        ui.label(egui::RichText::new("No photos").italics().weak());
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            for photo in &photos.items {
                ui.horizontal(|ui| {
                    let mut is_checked = checked.contains(&photo.id);
                    if ui.checkbox(&mut is_checked, "").changed() {
                        if is_checked {
                            checked.insert(photo.id.clone());
                        } else {
                            checked.remove(&photo.id);
                        }
                    }
                    let label = format!(
                        "{}  {}",
                        photo.display_caption(),
                        photo.taken_at.with_timezone(&chrono::Local).format("%m-%d %H:%M")
                    );
                    if ui
                        .selectable_label(selected == Some(photo.id.as_str()), label)
                        .clicked()
                    {
                        action = GalleryAction::Select(photo.id.clone());
                    }
                });
            }
        });

    ui.separator();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(photos.page > 1, egui::Button::new("◀"))
            .clicked()
        {
            action = GalleryAction::Page(photos.page - 1);
        }
        ui.label(format!("{} / {}", photos.page, photos.total_pages.max(1)));
        if ui
            .add_enabled(photos.page < photos.total_pages, egui::Button::new("▶"))
            .clicked()
        {
            action = GalleryAction::Page(photos.page + 1);
        }
        ui.label(egui::RichText::new(format!("{} total", photos.total)).weak());
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_signboard_form_builds_trimmed_content() {
        let form = SignboardForm {
            title: "Gate A".into(),
            construction_period: " 2025-04 to 2026-03 ".into(),
            contractor: "Kato Builders".into(),
            supervisor: "   ".into(),
        };
        assert!(form.is_ready());
        assert_eq!(
            form.content("Riverside Tower"),
            SignboardContent {
                project_name: "Riverside Tower".into(),
                construction_period: "2025-04 to 2026-03".into(),
                contractor: "Kato Builders".into(),
                supervisor: None,
                contact: None,
            }
        );
    }

    #[test]
    fn test_blank_title_is_not_ready() {
        let form = SignboardForm {
            title: "  ".into(),
            ..Default::default()
        };
        assert!(!form.is_ready());
    }
}
