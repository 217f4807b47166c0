// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Properties panel and ledger settings.
//!
//! Shows the selected photo's metadata with an editable caption, signboard
//! and category, and the options of the ledger export.

use sitemark::ledger::{ImageFit, LedgerConfig, PhotosPerPage};
use sitemark::models::photo::{
    process_label, work_type_label, PhotoCategory, PhotoRecord, PROCESS_CODES, WORK_TYPE_CODES,
};
use sitemark::models::project::{Project, Signboard};

/// Result of interacting with the properties panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    None,
    Annotate,
    SaveCaption(String),
    SaveDetails(DetailsForm),
    Delete,
}

/// Edit buffer for a photo's signboard and category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsForm {
    pub signboard_id: Option<String>,
    pub process: Option<String>,
    pub location: String,
    pub work_type: Option<String>,
}

impl DetailsForm {
    pub fn from_photo(photo: &PhotoRecord) -> Self {
        let category = photo.category.clone().unwrap_or_default();
        Self {
            signboard_id: photo.signboard_id.clone(),
            process: category.process,
            location: category.location.unwrap_or_default(),
            work_type: category.work_type,
        }
    }

    /// The category to store, `None` when every field is blank.
    pub fn category(&self) -> Option<PhotoCategory> {
        PhotoCategory {
            process: self.process.clone(),
            location: Some(self.location.clone()),
            work_type: self.work_type.clone(),
        }
        .normalized()
    }
}

/// Signboard, process, location and work type inputs.
pub fn details_form(ui: &mut egui::Ui, id: &str, signboards: &[&Signboard], form: &mut DetailsForm) {
    egui::Grid::new(format!("{}_details", id))
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Signboard:");
            let current = form
                .signboard_id
                .as_deref()
                .and_then(|sid| signboards.iter().find(|s| s.id == sid))
                .map_or("None", |s| s.title.as_str());
            egui::ComboBox::from_id_source(format!("{}_signboard", id))
                .selected_text(current)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut form.signboard_id, None, "None");
                    for signboard in signboards {
                        ui.selectable_value(
                            &mut form.signboard_id,
                            Some(signboard.id.clone()),
                            &signboard.title,
                        );
                    }
                });
            ui.end_row();

            ui.label("Process:");
            code_combo(ui, &format!("{}_process", id), &mut form.process, &PROCESS_CODES, process_label);
            ui.end_row();

            ui.label("Location:");
            ui.text_edit_singleline(&mut form.location);
            ui.end_row();

            ui.label("Work type:");
            code_combo(
                ui,
                &format!("{}_work_type", id),
                &mut form.work_type,
                &WORK_TYPE_CODES,
                work_type_label,
            );
            ui.end_row();
        });
}

fn code_combo(
    ui: &mut egui::Ui,
    id: &str,
    value: &mut Option<String>,
    codes: &[&str],
    label: fn(&str) -> &str,
) {
    let current = value.as_deref().map_or("None", label).to_string();
    egui::ComboBox::from_id_source(id)
        .selected_text(current)
        .show_ui(ui, |ui| {
            ui.selectable_value(value, None, "None");
            for code in codes {
                ui.selectable_value(value, Some(code.to_string()), label(code));
            }
        });
}

/// Display details of `photo`. `caption` and `details` are its edit buffers.
pub fn show(
    ui: &mut egui::Ui,
    photo: &PhotoRecord,
    project: Option<&Project>,
    signboards: &[Signboard],
    caption: &mut String,
    details: &mut DetailsForm,
) -> PropertiesAction {
    let signboard = photo
        .signboard_id
        .as_deref()
        .and_then(|id| signboards.iter().find(|s| s.id == id));
    let mut action = PropertiesAction::None;

    ui.heading("Photo");
    ui.separator();

    egui::Grid::new("photo_properties")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Project:");
            ui.label(project.map_or("Unknown project", |p| p.name.as_str()));
            ui.end_row();

            ui.label("Signboard:");
            ui.label(signboard.map_or("None", |s| s.title.as_str()));
            ui.end_row();

            ui.label("Taken:");
            ui.label(
                photo
                    .taken_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            );
            ui.end_row();

            if let Some(category) = photo.category.as_ref().filter(|c| !c.is_empty()) {
                ui.label("Category:");
                ui.label(category.labels().join(" / "));
                ui.end_row();
            }

            ui.label("File:");
            ui.label(egui::RichText::new(&photo.filename).monospace().weak());
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.label("Caption:");
    ui.text_edit_singleline(caption);
    let unchanged = caption.as_str() == photo.caption.as_deref().unwrap_or("");
    if ui
        .add_enabled(!unchanged, egui::Button::new("Save caption"))
        .clicked()
    {
        action = PropertiesAction::SaveCaption(caption.clone());
    }

    ui.add_space(8.0);
    ui.label("Details:");
    let own: Vec<&Signboard> = signboards
        .iter()
        .filter(|s| s.project_id == photo.project_id)
        .collect();
    details_form(ui, "photo", &own, details);
    let unchanged = *details == DetailsForm::from_photo(photo);
    if ui
        .add_enabled(!unchanged, egui::Button::new("Save details"))
        .clicked()
    {
        action = PropertiesAction::SaveDetails(details.clone());
    }

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.button("Annotate").clicked() {
            action = PropertiesAction::Annotate;
        }
        if ui
            .button(egui::RichText::new("🗑 Delete").color(egui::Color32::LIGHT_RED))
            .clicked()
        {
            action = PropertiesAction::Delete;
        }
    });

    action
}

/// Ledger export options. Returns true when export was requested.
pub fn ledger_settings(ui: &mut egui::Ui, config: &mut LedgerConfig, photo_count: usize) -> bool {
    egui::Grid::new("ledger_settings")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Photos per page:");
            egui::ComboBox::from_id_source("ledger_layout")
                .selected_text(layout_label(config.layout))
                .show_ui(ui, |ui| {
                    for layout in PhotosPerPage::ALL {
                        ui.selectable_value(&mut config.layout, layout, layout_label(layout));
                    }
                });
            ui.end_row();

            ui.label("Company:");
            ui.text_edit_singleline(&mut config.company_name);
            ui.end_row();

            ui.label("Project:");
            ui.text_edit_singleline(&mut config.project_name);
            ui.end_row();

            ui.label("Image fit:");
            ui.horizontal(|ui| {
                ui.radio_value(&mut config.fit, ImageFit::Contain, "Keep aspect");
                ui.radio_value(&mut config.fit, ImageFit::Stretch, "Stretch");
            });
            ui.end_row();
        });

    ui.checkbox(&mut config.show_date, "Print date");
    ui.checkbox(&mut config.show_page_number, "Print page numbers");

    ui.separator();
    ui.label(format!(
        "{} photos on {} pages",
        photo_count,
        config.page_count(photo_count)
    ));

    ui.add_enabled(photo_count > 0, egui::Button::new("Export PDF..."))
        .clicked()
}

fn layout_label(layout: PhotosPerPage) -> &'static str {
    match layout {
        PhotosPerPage::One => "1 (1 x 1)",
        PhotosPerPage::Two => "2 (1 x 2)",
        PhotosPerPage::Four => "4 (2 x 2)",
        PhotosPerPage::Six => "6 (2 x 3)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(category: Option<PhotoCategory>) -> PhotoRecord {
        PhotoRecord {
            id: "ph1".into(),
            project_id: "p1".into(),
            signboard_id: Some("s1".into()),
            filename: "ph1.jpg".into(),
            caption: None,
            category,
            taken_at: Utc::now(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_details_form_matches_stored_photo() {
        let category = PhotoCategory {
            process: Some("finishing".into()),
            location: Some("Lobby".into()),
            work_type: None,
        };
        let form = DetailsForm::from_photo(&record(Some(category.clone())));
        assert_eq!(form.signboard_id.as_deref(), Some("s1"));
        assert_eq!(form.location, "Lobby");
        assert_eq!(form.category(), Some(category));
    }

    #[test]
    fn test_blank_details_clear_category() {
        let mut form = DetailsForm::from_photo(&record(None));
        assert_eq!(form.category(), None);
        form.location = "  ".into();
        assert_eq!(form.category(), None);
        form.work_type = Some("civil".into());
        assert_eq!(
            form.category().map(|c| c.labels()),
            Some(vec!["Civil".to_string()])
        );
    }
}
