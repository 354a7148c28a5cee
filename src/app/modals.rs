//! Modal dialogs (action results, confirmations)

use super::App;
use crate::theme;
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Result of a user action, shown until dismissed
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NoticeKind::Info,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NoticeKind::Warning,
        }
    }

    pub fn error(title: impl Into<String>, message: impl ToString) -> Self {
        Self {
            title: title.into(),
            message: message.to_string(),
            kind: NoticeKind::Error,
        }
    }
}

/// Actions that need an OK before they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    MakeModsDir,
}

impl Confirm {
    fn title(self) -> &'static str {
        match self {
            Self::MakeModsDir => "Create folder",
        }
    }
}

impl App {
    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn render_notice_modal(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };

        let (icon, color) = match notice.kind {
            NoticeKind::Info => (egui_phosphor::regular::INFO, theme::ACCENT),
            NoticeKind::Warning => (egui_phosphor::regular::WARNING, theme::STATUS_WARNING),
            NoticeKind::Error => (egui_phosphor::regular::X_CIRCLE, theme::STATUS_ERROR),
        };

        let mut close = false;
        let modal = egui::Modal::new(egui::Id::new("notice_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(160))
            .frame(theme::modal_frame());
        let response = modal.show(ctx, |ui| {
            ui.set_min_width(320.0);
            ui.set_max_width(380.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(icon).size(20.0).color(color));
                ui.add(egui::Label::new(egui::RichText::new(&notice.title).size(16.0).strong()).selectable(false));
            });
            ui.add_space(8.0);
            ui.label(egui::RichText::new(&notice.message).color(theme::TEXT_MUTED));
            ui.add_space(16.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(theme::button_accent("OK")).clicked() {
                    close = true;
                }
            });
        });

        if close || response.should_close() {
            self.notice = None;
        }
    }

    pub fn render_confirm_modal(&mut self, ctx: &egui::Context) {
        let Some(confirm) = self.confirm else {
            return;
        };

        let mut answer: Option<bool> = None;
        let modal = egui::Modal::new(egui::Id::new("confirm_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(160))
            .frame(theme::modal_frame());
        let response = modal.show(ctx, |ui| {
            ui.set_min_width(300.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(egui_phosphor::regular::WARNING)
                        .size(20.0)
                        .color(theme::STATUS_WARNING),
                );
                ui.add(egui::Label::new(egui::RichText::new(confirm.title()).size(16.0).strong()).selectable(false));
            });
            ui.add_space(8.0);
            ui.label("Do you want to continue?");
            ui.add_space(16.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(theme::button("Cancel")).clicked() {
                    answer = Some(false);
                }
                if ui.add(theme::button_accent("OK")).clicked() {
                    answer = Some(true);
                }
            });
        });

        if response.should_close() && answer.is_none() {
            answer = Some(false);
        }
        if let Some(ok) = answer {
            self.confirm = None;
            if ok {
                match confirm {
                    Confirm::MakeModsDir => self.make_mods_dir(),
                }
            }
        }
    }
}
