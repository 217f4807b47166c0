// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation toolbar.
//!
//! Tool selection, stroke color and width, stamps and the session commands.

use sitemark::annotate::{AnnotationSession, MAX_LINE_WIDTH, MIN_LINE_WIDTH};
use sitemark::models::annotation::{Color, StampKind, Tool};

/// Commands the toolbar asks the application to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Stamp(StampKind),
    Signboard,
    Clear,
    Save,
    Close,
}

/// Display the toolbar for an open session.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut AnnotationSession,
    has_signboard: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");
        ui.separator();

        for tool in Tool::ALL {
            if ui
                .selectable_label(
                    session.tool() == tool,
                    format!("{} {}", tool_glyph(tool), tool.label()),
                )
                .clicked()
            {
                session.set_tool(tool);
            }
        }

        ui.separator();

        let stroke = session.stroke();
        let mut rgba = to_color32(stroke.color);
        if egui::color_picker::color_edit_button_srgba(
            ui,
            &mut rgba,
            egui::color_picker::Alpha::Opaque,
        )
        .changed()
        {
            session.set_color(Color::rgba(rgba.r(), rgba.g(), rgba.b(), rgba.a()));
        }

        let mut width = stroke.line_width;
        if ui
            .add(egui::Slider::new(&mut width, MIN_LINE_WIDTH..=MAX_LINE_WIDTH).text("Width"))
            .changed()
        {
            session.set_line_width(width);
        }

        ui.separator();

        if session.tool() == Tool::Stamp {
            for kind in StampKind::ALL {
                let (background, foreground) = kind.colors();
                let button = egui::Button::new(
                    egui::RichText::new(kind.label())
                        .strong()
                        .color(to_color32(foreground)),
                )
                .fill(to_color32(background));
                if ui.add(button).clicked() {
                    action = ToolbarAction::Stamp(kind);
                }
            }
            ui.separator();
        }

        if ui
            .add_enabled(has_signboard, egui::Button::new("Signboard"))
            .on_disabled_hover_text("This photo has no signboard")
            .clicked()
        {
            action = ToolbarAction::Signboard;
        }
        if ui.button("Clear").clicked() {
            action = ToolbarAction::Clear;
        }
        if ui.button("Save copy").clicked() {
            action = ToolbarAction::Save;
        }
        if ui.button("Close").clicked() {
            action = ToolbarAction::Close;
        }
    });

    ui.label(egui::RichText::new(tool_hint(session.tool())).italics().weak());

    action
}

fn tool_glyph(tool: Tool) -> &'static str {
    match tool {
        Tool::Pen => "✏",
        Tool::Eraser => "⌫",
        Tool::Arrow => "➡",
        Tool::Rectangle => "▭",
        Tool::Circle => "◯",
        Tool::Text => "T",
        Tool::Stamp => "✔",
    }
}

fn tool_hint(tool: Tool) -> &'static str {
    match tool {
        Tool::Pen => "Drag to draw freehand",
        Tool::Eraser => "Drag to erase marks",
        Tool::Arrow => "Drag from the tail to the tip",
        Tool::Rectangle => "Drag between opposite corners",
        Tool::Circle => "Drag from the center outwards",
        Tool::Text => "Click where the text should start",
        Tool::Stamp => "Choose a stamp to place it in the center",
    }
}

pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}
