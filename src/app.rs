// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The application owns the photo store and at most one open annotation
//! session. Decoding a photo and exporting a ledger run on background
//! threads and report back through channels polled in `update`.

use crate::ui::{canvas, gallery, properties, toolbar};
use chrono::Local;
use image::RgbaImage;
use sitemark::annotate::{export::annotated_copy, AnnotationSession};
use sitemark::config::AppConfig;
use sitemark::io::media;
use sitemark::ledger::{self, pdf, source::StoreBitmaps};
use sitemark::models::photo::{NewPhoto, Page, PhotoFilter, PhotoRecord};
use sitemark::models::project::{Project, Signboard};
use sitemark::store::{LocalStore, PhotoStore};
use std::collections::HashSet;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

/// Photos per page of the gallery.
const PAGE_LIMIT: usize = 50;

/// Result of background photo decoding.
struct LoadedPhoto {
    photo: PhotoRecord,
    image: RgbaImage,
}

/// An open annotation session and its on-screen state.
struct Editor {
    photo: PhotoRecord,
    signboard: Option<Signboard>,
    session: AnnotationSession,
    texture: Option<egui::TextureHandle>,
    /// Buffer changed since the texture was last uploaded.
    dirty: bool,
    text_input: String,
    confirm_clear: bool,
}

/// Main application state.
pub struct SitemarkApp {
    config: AppConfig,
    store: LocalStore,

    projects: Vec<Project>,
    /// Project id the gallery is restricted to
    filter: Option<String>,
    photos: Page<PhotoRecord>,
    page: usize,
    selected: Option<PhotoRecord>,
    caption_edit: String,
    details_edit: properties::DetailsForm,
    signboards: Vec<Signboard>,
    /// Photo ids picked for the ledger; empty means every listed photo
    checked: HashSet<String>,
    new_project: String,
    new_signboard: gallery::SignboardForm,
    /// Signboard and category given to imported photos
    import_details: properties::DetailsForm,

    editor: Option<Editor>,
    /// Photo waiting to replace an editor with unsaved marks
    confirm_replace: Option<PhotoRecord>,

    /// Receiver for background photo decoding
    image_loader: Option<Receiver<Result<LoadedPhoto, String>>>,
    /// Receiver for a running ledger export
    ledger_job: Option<Receiver<Result<PathBuf, String>>>,
    show_ledger: bool,

    loading_message: Option<String>,
    error_message: Option<String>,
    status: String,
}

impl SitemarkApp {
    pub fn new(config: AppConfig, store: LocalStore) -> Self {
        let mut app = Self {
            config,
            store,
            projects: Vec::new(),
            filter: None,
            photos: Page::slice(&[], 1, PAGE_LIMIT),
            page: 1,
            selected: None,
            caption_edit: String::new(),
            details_edit: properties::DetailsForm::default(),
            signboards: Vec::new(),
            checked: HashSet::new(),
            new_project: String::new(),
            new_signboard: gallery::SignboardForm::default(),
            import_details: properties::DetailsForm::default(),
            editor: None,
            confirm_replace: None,
            image_loader: None,
            ledger_job: None,
            show_ledger: false,
            loading_message: None,
            error_message: None,
            status: "Ready".to_string(),
        };
        app.refresh();
        app
    }

    fn photo_filter(&self) -> PhotoFilter {
        PhotoFilter {
            project_id: self.filter.clone(),
            ..Default::default()
        }
    }

    /// Reload projects and the current gallery page from the store.
    fn refresh(&mut self) {
        match self.store.list_projects() {
            Ok(projects) => self.projects = projects,
            Err(e) => self.report_error("Failed to list projects", e),
        }
        match self.store.list_signboards(None) {
            Ok(signboards) => self.signboards = signboards,
            Err(e) => self.report_error("Failed to list signboards", e),
        }
        match self.store.list_photos(&self.photo_filter(), self.page, PAGE_LIMIT) {
            Ok(photos) => self.photos = photos,
            Err(e) => self.report_error("Failed to list photos", e),
        }
    }

    fn report_error(&mut self, context: &str, error: impl Display) {
        let message = format!("{}: {}", context, error);
        log::error!("{}", message);
        self.error_message = Some(message);
    }

    fn project_name(&self, id: &str) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    fn select_photo(&mut self, id: &str) {
        match self.store.get_photo(id) {
            Ok(photo) => {
                self.caption_edit = photo.caption.clone().unwrap_or_default();
                self.details_edit = properties::DetailsForm::from_photo(&photo);
                self.selected = Some(photo);
            }
            Err(e) => self.report_error("Failed to open photo", e),
        }
    }

    /// Open `photo`, asking first when the open session has unsaved marks.
    fn request_editor(&mut self, photo: PhotoRecord) {
        let unsaved = self
            .editor
            .as_ref()
            .is_some_and(|editor| !editor.session.log().is_empty());
        if unsaved {
            self.confirm_replace = Some(photo);
        } else {
            self.open_editor(photo);
        }
    }

    /// Decode `photo` in the background and open it for annotation.
    fn open_editor(&mut self, photo: PhotoRecord) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some(format!("Loading {}...", photo.display_caption()));

        let store = self.store.clone();
        std::thread::spawn(move || {
            let result = (|| -> Result<LoadedPhoto, String> {
                let bytes = store
                    .read_blob(&photo)
                    .map_err(|e| format!("Failed to read photo: {}", e))?;
                let image = media::decode_image(&bytes, &photo.filename).map_err(|e| e.to_string())?;
                log::info!(
                    "Decoded {} ({}x{})",
                    photo.filename,
                    image.width(),
                    image.height()
                );
                Ok(LoadedPhoto { photo, image })
            })();

            let _ = sender.send(result);
        });
    }

    fn poll_image_loader(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.image_loader = None;
        self.loading_message = None;

        match result {
            Ok(LoadedPhoto { photo, image }) => {
                let mut session = match AnnotationSession::open(&image, self.config.display_width) {
                    Ok(session) => session,
                    Err(e) => return self.report_error("Failed to open photo", e),
                };
                let stroke = self.config.stroke_settings();
                session.set_color(stroke.color);
                session.set_line_width(stroke.line_width);

                let signboard = photo
                    .signboard_id
                    .as_deref()
                    .and_then(|id| self.store.get_signboard(id).ok());

                let mut texture = None;
                canvas::refresh_texture(ctx, &mut texture, &session.pixels());
                self.editor = Some(Editor {
                    photo,
                    signboard,
                    session,
                    texture,
                    dirty: false,
                    text_input: String::new(),
                    confirm_clear: false,
                });
            }
            Err(e) => self.report_error("Failed to load image", e),
        }
    }

    /// Flatten the open session and store it as a new photo.
    fn save_editor(&mut self) {
        let Some(editor) = &self.editor else {
            return;
        };
        let saved = editor
            .session
            .finalize(self.config.jpeg_quality)
            .map(|bytes| annotated_copy(&editor.photo, bytes))
            .and_then(|new_photo| self.store.create_photo(new_photo));

        match saved {
            Ok(record) => {
                log::info!("Saved annotated photo {}", record.id);
                self.status = format!("Saved \"{}\"", record.display_caption());
                self.editor = None;
                self.refresh();
                self.select_photo(&record.id);
            }
            Err(e) => self.report_error("Failed to save annotation", e),
        }
    }

    fn import_photo(&mut self) {
        let Some(project_id) = self.filter.clone() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png"])
            .pick_file()
        else {
            return;
        };

        let signboard_id = self.import_details.signboard_id.clone();
        let category = self.import_details.category();
        let result = media::load_image(&path)
            .and_then(|image| media::encode_jpeg(&image, self.config.jpeg_quality))
            .and_then(|jpeg| {
                self.store.create_photo(NewPhoto {
                    project_id,
                    signboard_id,
                    caption: path
                        .file_stem()
                        .map(|s| s.to_string_lossy().to_string()),
                    category,
                    image: jpeg,
                    taken_at: chrono::Utc::now(),
                })
            });

        match result {
            Ok(record) => {
                self.status = format!("Imported {}", path.display());
                self.refresh();
                self.select_photo(&record.id);
            }
            Err(e) => self.report_error("Failed to import photo", e),
        }
    }

    /// Photos the ledger will contain, in gallery order.
    fn ledger_photos(&self) -> sitemark::Result<Vec<PhotoRecord>> {
        let all = self.store.list_photos(&self.photo_filter(), 1, usize::MAX)?;
        Ok(if self.checked.is_empty() {
            all.items
        } else {
            all.items
                .into_iter()
                .filter(|p| self.checked.contains(&p.id))
                .collect()
        })
    }

    /// Ask for a destination and export the ledger in the background.
    fn start_ledger_export(&mut self) {
        let photos = match self.ledger_photos() {
            Ok(photos) => photos,
            Err(e) => return self.report_error("Failed to collect photos", e),
        };
        let project_name = self.filter.as_deref().and_then(|id| self.project_name(id));
        let mut dialog = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_file_name(pdf::ledger_filename(project_name, Local::now()));
        if let Some(dir) = &self.config.export_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        let (sender, receiver) = channel();
        self.ledger_job = Some(receiver);
        self.loading_message = Some(format!("Exporting {} photos...", photos.len()));

        let store = self.store.clone();
        let config = self.config.ledger.clone();
        std::thread::spawn(move || {
            let document = ledger::compose(&photos, &StoreBitmaps::new(&store), &config, Local::now());
            let result = pdf::export_pdf(&document, &path)
                .map(|_| path)
                .map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    fn poll_ledger_job(&mut self) {
        let Some(receiver) = &self.ledger_job else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.ledger_job = None;
        self.loading_message = None;

        match result {
            Ok(path) => self.status = format!("Ledger written to {}", path.display()),
            Err(e) => self.report_error("Failed to export ledger", e),
        }
    }

    fn handle_gallery(&mut self, action: gallery::GalleryAction) {
        match action {
            gallery::GalleryAction::Filter(filter) => {
                self.filter = filter;
                self.page = 1;
                self.checked.clear();
                self.import_details.signboard_id = None;
                self.refresh();
            }
            gallery::GalleryAction::Select(id) => self.select_photo(&id),
            gallery::GalleryAction::Page(page) => {
                self.page = page;
                self.refresh();
            }
            gallery::GalleryAction::CreateProject(name) => {
                match self.store.create_project(&name, "") {
                    Ok(project) => {
                        self.filter = Some(project.id);
                        self.page = 1;
                        self.refresh();
                    }
                    Err(e) => self.report_error("Failed to create project", e),
                }
            }
            gallery::GalleryAction::CreateSignboard(form) => self.create_signboard(form),
            gallery::GalleryAction::Import => self.import_photo(),
            gallery::GalleryAction::None => {}
        }
    }

    fn handle_properties(&mut self, action: properties::PropertiesAction) {
        let Some(photo) = self.selected.clone() else {
            return;
        };
        match action {
            properties::PropertiesAction::Annotate => self.request_editor(photo),
            properties::PropertiesAction::SaveCaption(caption) => {
                match self.store.update_caption(&photo.id, Some(caption)) {
                    Ok(updated) => {
                        self.selected = Some(updated);
                        self.refresh();
                    }
                    Err(e) => self.report_error("Failed to update caption", e),
                }
            }
            properties::PropertiesAction::SaveDetails(details) => {
                let category = details.category();
                match self
                    .store
                    .update_details(&photo.id, details.signboard_id, category)
                {
                    Ok(updated) => {
                        if let Some(editor) = self
                            .editor
                            .as_mut()
                            .filter(|editor| editor.photo.id == updated.id)
                        {
                            editor.signboard = updated
                                .signboard_id
                                .as_deref()
                                .and_then(|id| self.store.get_signboard(id).ok());
                            editor.photo = updated.clone();
                        }
                        self.details_edit = properties::DetailsForm::from_photo(&updated);
                        self.selected = Some(updated);
                        self.refresh();
                    }
                    Err(e) => self.report_error("Failed to update details", e),
                }
            }
            properties::PropertiesAction::Delete => match self.store.delete_photo(&photo.id) {
                Ok(()) => {
                    self.selected = None;
                    self.checked.remove(&photo.id);
                    self.refresh();
                }
                Err(e) => self.report_error("Failed to delete photo", e),
            },
            properties::PropertiesAction::None => {}
        }
    }

    /// Add a signboard to the filtered project.
    fn create_signboard(&mut self, form: gallery::SignboardForm) {
        let Some(project_id) = self.filter.clone() else {
            return;
        };
        let created = self.store.get_project(&project_id).and_then(|project| {
            self.store
                .create_signboard(&project_id, form.title.trim(), form.content(&project.name))
        });
        match created {
            Ok(signboard) => {
                self.status = format!("Added signboard \"{}\"", signboard.title);
                self.import_details.signboard_id = Some(signboard.id);
                self.refresh();
            }
            Err(e) => self.report_error("Failed to create signboard", e),
        }
    }

    /// Dialog asking whether to drop unsaved marks for another photo.
    fn replace_dialog(&mut self, ctx: &egui::Context) {
        let Some(photo) = self.confirm_replace.clone() else {
            return;
        };
        let mut discard = None;
        egui::Window::new("Unsaved annotations")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "Discard the marks on the open photo and open \"{}\"?",
                    photo.display_caption()
                ));
                ui.horizontal(|ui| {
                    if ui.button("Discard").clicked() {
                        discard = Some(true);
                    }
                    if ui.button("Keep editing").clicked() {
                        discard = Some(false);
                    }
                });
            });
        match discard {
            Some(true) => self.replace_editor(),
            Some(false) => self.confirm_replace = None,
            None => {}
        }
    }

    /// Drop the open session and open the photo waiting in `confirm_replace`.
    fn replace_editor(&mut self) {
        let Some(photo) = self.confirm_replace.take() else {
            return;
        };
        log::info!("Discarded unsaved annotations to open {}", photo.id);
        self.editor = None;
        self.open_editor(photo);
    }

    fn handle_toolbar(&mut self, action: toolbar::ToolbarAction) {
        match action {
            toolbar::ToolbarAction::Save => self.save_editor(),
            toolbar::ToolbarAction::Close => {
                log::info!("Closed annotation session without saving");
                self.editor = None;
            }
            other => {
                let Some(editor) = &mut self.editor else {
                    return;
                };
                match other {
                    toolbar::ToolbarAction::Stamp(kind) => editor.session.stamp(kind),
                    toolbar::ToolbarAction::Signboard => {
                        if let Some(signboard) = &editor.signboard {
                            editor.session.composite_signboard(signboard);
                        }
                    }
                    toolbar::ToolbarAction::Clear => editor.confirm_clear = true,
                    _ => return,
                }
                editor.dirty = true;
            }
        }
    }
}

/// Modal windows of the open session: text entry and clear confirmation.
fn session_dialogs(ctx: &egui::Context, editor: &mut Editor) {
    if editor.session.pending_text_at().is_some() {
        let mut submitted: Option<Option<String>> = None;
        egui::Window::new("Text")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Enter the text to place:");
                let response = ui.text_edit_singleline(&mut editor.text_input);
                response.request_focus();
                let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || entered {
                        submitted = Some(Some(editor.text_input.clone()));
                    }
                    if ui.button("Cancel").clicked() {
                        submitted = Some(None);
                    }
                });
            });
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            submitted = Some(None);
        }
        if let Some(text) = submitted {
            editor.session.submit_text(text.as_deref());
            editor.text_input.clear();
            editor.dirty = true;
        }
    }

    if editor.confirm_clear {
        egui::Window::new("Clear annotations")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Discard every annotation and restore the original photo?");
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        editor.session.clear(|| true);
                        editor.confirm_clear = false;
                        editor.dirty = true;
                    }
                    if ui.button("Keep").clicked() {
                        editor.confirm_clear = false;
                    }
                });
            });
    }
}

impl eframe::App for SitemarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader(ctx);
        self.poll_ledger_job();

        // Request repaint while background work runs (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui
                        .add_enabled(self.filter.is_some(), egui::Button::new("Import Photo..."))
                        .clicked()
                    {
                        self.import_photo();
                        ui.close_menu();
                    }
                    if ui.button("Photo Ledger...").clicked() {
                        self.show_ledger = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status.as_str());
                if let Some(editor) = &self.editor {
                    ui.separator();
                    ui.label(format!(
                        "{} | {}x{} | {} marks",
                        editor.session.tool().label(),
                        editor.session.width(),
                        editor.session.height(),
                        editor.session.log().len()
                    ));
                }
            });
        });

        // Photo list (left side)
        let filter = self.filter.clone();
        let selected_id = self.selected.as_ref().map(|p| p.id.clone());
        let gallery_action = egui::SidePanel::left("gallery")
            .default_width(260.0)
            .show(ctx, |ui| {
                gallery::show(
                    ui,
                    &self.projects,
                    filter.as_deref(),
                    &self.photos,
                    selected_id.as_deref(),
                    &mut self.checked,
                    &self.signboards,
                    gallery::Forms {
                        new_project: &mut self.new_project,
                        signboard: &mut self.new_signboard,
                        import: &mut self.import_details,
                    },
                )
            })
            .inner;
        self.handle_gallery(gallery_action);

        // Properties panel (right side)
        if let Some(photo) = self.selected.clone() {
            let project = self.projects.iter().find(|p| p.id == photo.project_id).cloned();
            let properties_action = egui::SidePanel::right("properties")
                .default_width(250.0)
                .show(ctx, |ui| {
                    properties::show(
                        ui,
                        &photo,
                        project.as_ref(),
                        &self.signboards,
                        &mut self.caption_edit,
                        &mut self.details_edit,
                    )
                })
                .inner;
            self.handle_properties(properties_action);
        }

        // Ledger settings
        if self.show_ledger {
            let photo_count = if self.checked.is_empty() {
                self.photos.total
            } else {
                self.checked.len()
            };
            let mut open = true;
            let export = egui::Window::new("Photo ledger")
                .open(&mut open)
                .resizable(false)
                .show(ctx, |ui| {
                    properties::ledger_settings(ui, &mut self.config.ledger, photo_count)
                })
                .and_then(|r| r.inner)
                .unwrap_or(false);
            self.show_ledger = open;
            if export && self.ledger_job.is_none() {
                self.start_ledger_export();
            }
        }

        if let Some(message) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(message).color(egui::Color32::LIGHT_RED));
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Main canvas (center)
        let mut toolbar_action = toolbar::ToolbarAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref message) = self.loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
                return;
            }
            let Some(editor) = &mut self.editor else {
                canvas::show_empty(ui);
                return;
            };

            let has_signboard = editor.signboard.is_some();
            toolbar_action = toolbar::show(ui, &mut editor.session, has_signboard);
            ui.separator();

            if let Some(texture) = &editor.texture {
                let size = (editor.session.width(), editor.session.height());
                let blocked = self.confirm_replace.is_some()
                    || editor.confirm_clear
                    || editor.session.pending_text_at().is_some();
                let action = canvas::show(ui, texture, size, editor.session.is_drawing(), blocked);
                match action {
                    canvas::CanvasAction::Down(event) => editor.session.pointer_down(&event),
                    canvas::CanvasAction::Move(event) => editor.session.pointer_move(&event),
                    canvas::CanvasAction::Up => editor.session.pointer_up(),
                    canvas::CanvasAction::Leave => editor.session.pointer_leave(),
                    canvas::CanvasAction::None => {}
                }
                if action != canvas::CanvasAction::None {
                    editor.dirty = true;
                }
            }
        });
        self.handle_toolbar(toolbar_action);

        self.replace_dialog(ctx);
        if let Some(editor) = &mut self.editor {
            session_dialogs(ctx, editor);
            if editor.dirty {
                canvas::refresh_texture(ctx, &mut editor.texture, &editor.session.pixels());
                editor.dirty = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemark::annotate::PointerEvent;
    use sitemark::util::geometry::ElementRect;

    fn app(dir: &tempfile::TempDir) -> SitemarkApp {
        let store = LocalStore::open(dir.path()).unwrap();
        SitemarkApp::new(AppConfig::default(), store)
    }

    fn record(id: &str) -> PhotoRecord {
        PhotoRecord {
            id: id.into(),
            project_id: "p1".into(),
            signboard_id: None,
            filename: format!("{}.jpg", id),
            caption: None,
            category: None,
            taken_at: chrono::Utc::now(),
            uploaded_at: chrono::Utc::now(),
        }
    }

    fn editor_with_marks(marks: bool) -> Editor {
        let mut session = AnnotationSession::open(&RgbaImage::new(100, 50), 100).unwrap();
        if marks {
            let element = ElementRect::new(0.0, 0.0, 100.0, 50.0);
            session.pointer_down(&PointerEvent::new(10.0, 10.0, element));
            session.pointer_move(&PointerEvent::new(40.0, 30.0, element));
            session.pointer_up();
        }
        Editor {
            photo: record("open"),
            signboard: None,
            session,
            texture: None,
            dirty: false,
            text_input: String::new(),
            confirm_clear: false,
        }
    }

    #[test]
    fn test_annotate_asks_before_dropping_marks() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.editor = Some(editor_with_marks(true));
        app.selected = Some(record("next"));

        app.handle_properties(properties::PropertiesAction::Annotate);

        assert_eq!(app.confirm_replace.as_ref().map(|p| p.id.as_str()), Some("next"));
        assert!(app.image_loader.is_none());
        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.photo.id, "open");
        assert_eq!(editor.session.log().len(), 1);

        app.replace_editor();
        assert!(app.confirm_replace.is_none());
        assert!(app.editor.is_none());
        assert!(app.image_loader.is_some());
    }

    #[test]
    fn test_annotate_opens_directly_without_marks() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.editor = Some(editor_with_marks(false));
        app.selected = Some(record("next"));

        app.handle_properties(properties::PropertiesAction::Annotate);

        assert!(app.confirm_replace.is_none());
        assert!(app.image_loader.is_some());
    }
}
