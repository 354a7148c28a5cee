//! View rendering (menu bar, path fields, map list, preview panel)

use super::{App, ListAction};
use crate::constants::*;
use crate::mods::validate_mods_dir;
use crate::theme;
use crate::ui::components::{path_field, preview_box};
use eframe::egui;

impl App {
    pub fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar")
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("Options", |ui| {
                        if theme::option_checkbox(ui, self.settings.use_symlinks, "Use symlinks") {
                            self.toggle_symlinks();
                            ui.close_menu();
                        }
                        if theme::option_checkbox(ui, self.settings.eg_mode, "Epic Games mode") {
                            self.toggle_eg_mode();
                            ui.close_menu();
                        }
                        ui.separator();
                        if ui.button(format!("{}  Defaults", egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE)).clicked() {
                            self.set_defaults();
                            ui.close_menu();
                        }
                        if ui.button(format!("{}  Make mods folder", egui_phosphor::regular::FOLDER_PLUS)).clicked() {
                            self.confirm_make_mods_dir();
                            ui.close_menu();
                        }
                    });
                    ui.menu_button("Help", |ui| {
                        if ui.button(format!("{}  Usage", egui_phosphor::regular::QUESTION)).clicked() {
                            self.open_help();
                            ui.close_menu();
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("{} v{}", APP_NAME, APP_VERSION))
                                .size(theme::FONT_CAPTION)
                                .color(theme::TEXT_DIM),
                        );
                        if self.settings.eg_mode {
                            ui.label(
                                egui::RichText::new("Epic Games")
                                    .size(theme::FONT_CAPTION)
                                    .color(theme::STATUS_WARNING),
                            );
                        }
                    });
                });
            });
    }

    pub fn render_path_fields(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("path_fields")
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                let (edit, browse) = path_field(ui, "Workshop dir:", &mut self.settings.workshop_dir, |p| p.is_dir());
                if edit.changed() {
                    self.refresh_files();
                }
                if edit.lost_focus() {
                    self.save_settings();
                }
                if browse {
                    self.browse_workshop_dir();
                }

                let (edit, browse) = path_field(ui, "Mods dir:", self.settings.active_mods_dir_mut(), |p| {
                    validate_mods_dir(p).is_ok()
                });
                if edit.lost_focus() {
                    self.save_settings();
                }
                if browse {
                    self.browse_mods_dir();
                }
            });
    }

    pub fn render_map_list(&mut self, ctx: &egui::Context) {
        use egui_extras::{Column, TableBuilder};

        egui::SidePanel::left("map_list")
            .exact_width(theme::LIST_WIDTH)
            .resizable(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(12)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS).color(theme::TEXT_DIM));
                    let search = ui.add(
                        egui::TextEdit::singleline(&mut self.search_query)
                            .hint_text("Search maps")
                            .desired_width(ui.available_width()),
                    );
                    if search.changed() {
                        self.apply_search();
                    }
                });
                ui.add_space(theme::SPACING_SM);
                ui.label(
                    egui::RichText::new(format!("Showing {} of {} maps", self.files.len(), self.all_files.len()))
                        .size(theme::FONT_CAPTION)
                        .color(theme::TEXT_DIM),
                );
                ui.add_space(theme::SPACING_SM);

                let ctx = ui.ctx().clone();
                let mut action: Option<ListAction> = None;

                TableBuilder::new(ui)
                    .striped(false)
                    .resizable(false)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .sense(egui::Sense::click())
                    .min_scrolled_height(0.0)
                    .column(Column::remainder().clip(true))
                    .body(|mut body| {
                        body.ui_mut().visuals_mut().selection.bg_fill = theme::ROW_SELECTED;

                        body.rows(theme::ROW_HEIGHT, self.files.len(), |mut row| {
                            let idx = row.index();
                            row.set_selected(self.selected == Some(idx));
                            row.col(|ui| {
                                ui.add(
                                    egui::Label::new(
                                        egui::RichText::new(&self.files[idx].name).size(theme::FONT_LABEL),
                                    )
                                    .truncate()
                                    .selectable(false),
                                );
                            });

                            let response = row.response();
                            if response.hovered() {
                                ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                            }
                            if let Some(a) = ListAction::from_row(idx, response.clicked(), response.double_clicked()) {
                                action = Some(a);
                            }
                        });
                    });

                if let Some(action) = action {
                    self.handle_list_action(action);
                }
            });
    }

    pub fn render_preview_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                let title = self
                    .selected()
                    .map(|s| s.name)
                    .unwrap_or_else(|| "No map selected".to_string());
                ui.label(egui::RichText::new(title).size(theme::FONT_HEADING).strong());
                ui.add_space(theme::SPACING_MD);

                let texture = if self.preview_loading && self.preview_texture.is_none() {
                    None
                } else {
                    self.preview_texture.as_ref()
                };
                preview_box(ui, texture, PREVIEW_SIZE, self.preview_caption());
                ui.add_space(theme::SPACING_LG);

                let button_size = [PREVIEW_SIZE.0 as f32 + 2.0 * theme::SPACING_MD, theme::BUTTON_HEIGHT];
                if ui
                    .add_sized(button_size, theme::button_accent(format!("{}  Activate", egui_phosphor::regular::PLAY)))
                    .clicked()
                {
                    self.activate_selected();
                }
                if ui
                    .add_sized(button_size, theme::button(format!("{}  Restore Underpass", egui_phosphor::regular::ARROW_U_UP_LEFT)))
                    .clicked()
                {
                    self.restore_underpass();
                }
                if ui
                    .add_sized(button_size, theme::button(format!("{}  Open folder", egui_phosphor::regular::FOLDER_OPEN)))
                    .clicked()
                {
                    self.open_folder();
                }

                ui.add_space(theme::SPACING_SM);
                let mode = if self.settings.use_symlinks { "symlink" } else { "copy" };
                ui.label(
                    egui::RichText::new(format!("Activates as {} ({})", ACTIVE_MAP_FILENAME, mode))
                        .size(theme::FONT_CAPTION)
                        .color(theme::TEXT_DIM),
                );
            });
    }
}
