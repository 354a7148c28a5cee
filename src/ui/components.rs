//! Reusable UI components

use crate::theme;
use eframe::egui;
use std::path::Path;

/// Text colour for a path field: normal when `valid`, red otherwise
pub fn path_color(valid: bool) -> egui::Color32 {
    if valid {
        theme::TEXT_PRIMARY
    } else {
        theme::STATUS_ERROR
    }
}

/// Labelled single-line path entry with a browse button.
/// Returns (text edit response, browse clicked).
pub fn path_field(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut String,
    valid: impl Fn(&Path) -> bool,
) -> (egui::Response, bool) {
    let mut browse = false;
    let inner = ui.horizontal(|ui| {
        ui.add_sized(
            [theme::PATH_LABEL_WIDTH, theme::BUTTON_HEIGHT],
            egui::Label::new(egui::RichText::new(label).color(theme::TEXT_MUTED)),
        );
        let color = path_color(valid(Path::new(value.as_str())));
        let browse_width = theme::BUTTON_HEIGHT + theme::SPACING_MD;
        let edit = ui.add(
            egui::TextEdit::singleline(value)
                .text_color(color)
                .desired_width(ui.available_width() - browse_width),
        );
        let btn = ui
            .add(theme::button(egui_phosphor::regular::FOLDER_OPEN))
            .on_hover_text("Browse");
        browse = btn.clicked();
        edit
    });
    (inner.inner, browse)
}

/// Placeholder-aware map preview: the texture centred in a fixed-size frame
pub fn preview_box(ui: &mut egui::Ui, texture: Option<&egui::TextureHandle>, size: (u32, u32), caption: &str) {
    let box_size = egui::vec2(size.0 as f32, size.1 as f32);
    theme::preview_frame().show(ui, |ui| {
        let (rect, _) = ui.allocate_exact_size(box_size, egui::Sense::hover());
        match texture {
            Some(tex) => {
                let img_rect = egui::Rect::from_center_size(rect.center(), tex.size_vec2());
                ui.painter().image(
                    tex.id(),
                    img_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            None => {
                ui.put(rect, egui::Spinner::new());
            }
        }
    });
    ui.add_space(theme::SPACING_SM);
    ui.label(
        egui::RichText::new(caption)
            .size(theme::FONT_CAPTION)
            .color(theme::TEXT_DIM),
    );
}
