// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation canvas.
//!
//! Shows the session buffer fitted into the available space and turns egui
//! pointer input into [`PointerEvent`]s. The displayed rect is recomputed
//! every frame and sent with each event, so the session always maps against
//! the size the user actually sees.

use sitemark::annotate::PointerEvent;
use sitemark::util::geometry::{fit_within, ElementRect};

/// Pointer input for the session, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    None,
    Down(PointerEvent),
    Move(PointerEvent),
    Up,
    Leave,
}

/// Pointer state sampled for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerInput {
    pub pressed: bool,
    pub released: bool,
    pub pos: Option<egui::Pos2>,
    /// The canvas is the topmost thing under the pointer.
    pub hovered: bool,
    /// The primary button went down on the canvas and is still held.
    pub held: bool,
}

/// Classify one frame of pointer input. New gestures only start when the
/// canvas is hovered and no dialog is `blocked` over it.
pub fn pointer_action(
    input: PointerInput,
    image_rect: egui::Rect,
    drawing: bool,
    blocked: bool,
) -> Option<(PointerPhase, egui::Pos2)> {
    let pos = input.pos;
    match pos {
        Some(pos)
            if input.pressed
                && !drawing
                && !blocked
                && input.hovered
                && image_rect.contains(pos) =>
        {
            Some((PointerPhase::Down, pos))
        }
        Some(pos) if input.released && drawing => Some((PointerPhase::Up, pos)),
        None if input.released && drawing => Some((PointerPhase::Up, egui::Pos2::ZERO)),
        Some(pos) if drawing && !image_rect.contains(pos) => Some((PointerPhase::Leave, pos)),
        Some(pos) if drawing && input.held => Some((PointerPhase::Move, pos)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
}

/// Display the buffer texture and report pointer activity over it.
/// `blocked` is set while a dialog waits on top of the canvas.
pub fn show(
    ui: &mut egui::Ui,
    texture: &egui::TextureHandle,
    buffer_size: (u32, u32),
    drawing: bool,
    blocked: bool,
) -> CanvasAction {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);
    let available = ui.available_size();

    let (display_width, display_height) = fit_within(
        buffer_size.0 as f32,
        buffer_size.1 as f32,
        available.x,
        available.y,
    );
    let x_offset = (available.x - display_width) / 2.0;
    let y_offset = (available.y - display_height) / 2.0;
    let image_rect = egui::Rect::from_min_size(
        ui.min_rect().min + egui::vec2(x_offset, y_offset),
        egui::vec2(display_width, display_height),
    );

    // Erased pixels are flattened over white on save, so show them that way.
    ui.painter()
        .rect_filled(image_rect, 0.0, egui::Color32::WHITE);
    ui.painter().image(
        texture.id(),
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
    let element = ElementRect::new(
        image_rect.min.x,
        image_rect.min.y,
        image_rect.width(),
        image_rect.height(),
    );
    let event_at = |pos: egui::Pos2| PointerEvent::new(pos.x, pos.y, element);

    let input = ui.input(|i| PointerInput {
        pressed: i.pointer.primary_pressed(),
        released: i.pointer.primary_released(),
        pos: i.pointer.interact_pos(),
        hovered: response.hovered(),
        held: response.is_pointer_button_down_on(),
    });

    match pointer_action(input, image_rect, drawing, blocked) {
        Some((PointerPhase::Down, pos)) => CanvasAction::Down(event_at(pos)),
        Some((PointerPhase::Move, pos)) => CanvasAction::Move(event_at(pos)),
        Some((PointerPhase::Up, _)) => CanvasAction::Up,
        Some((PointerPhase::Leave, _)) => CanvasAction::Leave,
        None => CanvasAction::None,
    }
}

/// Upload `pixels` into `texture`, creating it on first use.
pub fn refresh_texture(
    ctx: &egui::Context,
    texture: &mut Option<egui::TextureHandle>,
    pixels: &image::RgbaImage,
) {
    let size = [pixels.width() as usize, pixels.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
    match texture {
        Some(handle) => handle.set(color_image, egui::TextureOptions::LINEAR),
        None => {
            *texture = Some(ctx.load_texture(
                "annotation_buffer",
                color_image,
                egui::TextureOptions::LINEAR,
            ))
        }
    }
}

/// Placeholder shown while nothing is open.
pub fn show_empty(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Sitemark")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Construction photo annotation and ledgers")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Select a photo and press Annotate to begin")
                    .color(egui::Color32::from_gray(180)),
            );
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Rect};

    fn canvas() -> Rect {
        Rect::from_min_max(pos2(100.0, 50.0), pos2(500.0, 350.0))
    }

    fn press_at(x: f32, y: f32, hovered: bool) -> PointerInput {
        PointerInput {
            pressed: true,
            pos: Some(pos2(x, y)),
            hovered,
            held: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_press_on_hovered_canvas_starts_gesture() {
        let action = pointer_action(press_at(200.0, 100.0, true), canvas(), false, false);
        assert_eq!(action, Some((PointerPhase::Down, pos2(200.0, 100.0))));
    }

    #[test]
    fn test_press_under_a_window_is_ignored() {
        // A dialog covers the canvas, so egui reports it as not hovered.
        let action = pointer_action(press_at(300.0, 200.0, false), canvas(), false, false);
        assert_eq!(action, None);
    }

    #[test]
    fn test_press_while_dialog_open_is_ignored() {
        let action = pointer_action(press_at(300.0, 200.0, true), canvas(), false, true);
        assert_eq!(action, None);
    }

    #[test]
    fn test_press_outside_image_is_ignored() {
        let action = pointer_action(press_at(20.0, 20.0, true), canvas(), false, false);
        assert_eq!(action, None);
    }

    #[test]
    fn test_drag_moves_then_releases() {
        let held = PointerInput {
            pos: Some(pos2(250.0, 150.0)),
            hovered: true,
            held: true,
            ..Default::default()
        };
        assert_eq!(
            pointer_action(held, canvas(), true, false),
            Some((PointerPhase::Move, pos2(250.0, 150.0)))
        );

        let released = PointerInput {
            released: true,
            pos: Some(pos2(250.0, 150.0)),
            ..Default::default()
        };
        assert!(matches!(
            pointer_action(released, canvas(), true, false),
            Some((PointerPhase::Up, _))
        ));
    }

    #[test]
    fn test_leaving_image_ends_drag() {
        let outside = PointerInput {
            pos: Some(pos2(600.0, 150.0)),
            held: true,
            ..Default::default()
        };
        assert!(matches!(
            pointer_action(outside, canvas(), true, false),
            Some((PointerPhase::Leave, _))
        ));
    }
}
