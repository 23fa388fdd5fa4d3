use super::{PreviewStatus, ScanTranslator};
use crate::utils::color::{ColorExt, DROP_ZONE_HOVER, DROP_ZONE_IDLE};
use crate::utils::file_size::FileSizeUtils;
use crate::utils::mime::IMAGE_EXTENSIONS;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;
use tracing::warn;

const ACCENT: Color32 = Color32::from_rgb(52, 152, 219);
const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);

impl ScanTranslator {
    pub fn render(&mut self, ctx: &egui::Context) {
        let blocked = self.controller.notice().is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 30.0;
            let content_height = total_height - footer_height;

            ui.add_enabled_ui(!blocked, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(content_height)
                    .show(ui, |ui| {
                        ui.add_space(20.0);
                        ui.vertical_centered(|ui| {
                            ui.heading("Image Text Extractor");
                            ui.add_space(5.0);
                            ui.label(
                                RichText::new(
                                    "Extract, translate and read the fields of a scanned document",
                                )
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                            );
                        });
                        ui.add_space(20.0);

                        if self.controller.drop_zone_visible() {
                            self.render_drop_zone(ctx, ui);
                        }
                        if self.controller.preview_visible() {
                            self.render_preview(ui);
                        }

                        ui.add_space(15.0);
                        self.render_process_button(ui);

                        if self.controller.results_visible() {
                            ui.add_space(20.0);
                            self.render_results(ui);
                        }
                        ui.add_space(20.0);
                    });
            });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                self.render_footer(ui);
            });
        });

        self.render_notice(ctx);
    }

    fn render_drop_zone(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let border = if hovering {
            Color32::from_hex_or(DROP_ZONE_HOVER, ACCENT)
        } else {
            Color32::from_hex_or(DROP_ZONE_IDLE, ACCENT)
        };
        let decoding = matches!(self.controller.preview(), PreviewStatus::Decoding);

        let response = egui::Frame::none()
            .stroke(egui::Stroke::new(2.0, border))
            .rounding(8.0)
            .inner_margin(egui::Margin::same(32.0))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("🖼").size(40.0));
                    ui.add_space(8.0);
                    if decoding {
                        ui.spinner();
                        ui.label("Loading preview...");
                    } else {
                        ui.label("Drag & drop an image here");
                        ui.label(RichText::new("or click to browse").weak());
                    }
                });
            })
            .response
            .interact(egui::Sense::click());

        if response.clicked() && !decoding {
            if let Some(path) = FileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
            {
                self.open_file(&path);
            }
        }
    }

    fn render_preview(&mut self, ui: &mut egui::Ui) {
        let mut remove = false;

        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                if let Some((_, texture)) = &self.preview_texture {
                    ui.add(
                        egui::Image::new((texture.id(), texture.size_vec2()))
                            .max_size(egui::vec2(ui.available_width(), 280.0)),
                    );
                } else if let PreviewStatus::Unavailable(reason) = self.controller.preview() {
                    ui.label(
                        RichText::new(format!("Preview unavailable: {}", reason))
                            .color(ui.visuals().weak_text_color()),
                    );
                }

                if let Some(file) = self.controller.staged() {
                    ui.add_space(5.0);
                    ui.label(format!(
                        "{} · {}",
                        file.name,
                        FileSizeUtils::format_size(file.size())
                    ));
                }

                ui.add_space(5.0);
                if ui.button("✖ Remove").clicked() {
                    remove = true;
                }
            });
        });

        if remove {
            self.controller.clear();
        }
    }

    fn render_process_button(&mut self, ui: &mut egui::Ui) {
        let busy = self.controller.is_busy();
        let mut process = false;

        ui.vertical_centered(|ui| {
            let label = if busy {
                "⏳ Processing..."
            } else {
                "🔍 Process Image"
            };
            let button = egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
            if ui
                .add_enabled(self.controller.process_enabled(), button)
                .clicked()
            {
                process = true;
            }
            if busy {
                ui.add_space(5.0);
                ui.spinner();
            }
        });

        if process {
            if let Err(e) = self.controller.process() {
                warn!("Could not start processing: {}", e);
            }
        }
    }

    fn render_results(&mut self, ui: &mut egui::Ui) {
        let Some(view) = self.controller.view().cloned() else {
            return;
        };
        let mut want_contact = false;

        ui.group(|ui| {
            ui.label(RichText::new("Extracted Fields").strong().size(16.0));
            ui.add_space(8.0);

            egui::Grid::new("parsed_fields")
                .num_columns(2)
                .spacing([16.0, 6.0])
                .striped(true)
                .show(ui, |ui| {
                    for (label, value) in view.field_rows() {
                        ui.label(RichText::new(label).strong());
                        ui.label(value);
                        ui.end_row();
                    }
                    if let Some(info) = &view.additional_info {
                        ui.label(RichText::new("Additional Information").strong());
                        ui.label(info.as_str());
                        ui.end_row();
                    }
                });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let pending = self.controller.contact_pending();
                if ui
                    .add_enabled(!pending, egui::Button::new("📇 Format contact card"))
                    .clicked()
                {
                    want_contact = true;
                }
                if pending {
                    ui.spinner();
                }
            });

            if let Some(card) = self.controller.contact_card() {
                ui.add_space(5.0);
                egui::Frame::none()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .inner_margin(egui::Margin::same(8.0))
                    .show(ui, |ui| {
                        ui.label(RichText::new(&card.result).monospace());
                    });
            }
        });

        ui.add_space(10.0);
        Self::render_text_section(ui, "Original Text", &view.original_text);
        Self::render_text_section(ui, "Translated Text", &view.translated_text);

        if want_contact {
            if let Err(e) = self.controller.request_contact_card() {
                warn!("Could not request contact card: {}", e);
            }
        }
    }

    fn render_text_section(ui: &mut egui::Ui, title: &str, text: &str) {
        egui::CollapsingHeader::new(title)
            .default_open(true)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_source(title)
                    .max_height(160.0)
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut &*text)
                                .desired_width(f32::INFINITY)
                                .desired_rows(4),
                        );
                    });
            });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(self.controller.state().status_text())
                    .color(ui.visuals().weak_text_color()),
            );
            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("Server: {}", self.server_label))
                        .color(ui.visuals().weak_text_color()),
                );
            });
        });
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.notice().cloned() else {
            return;
        };
        let mut dismissed = false;

        egui::Window::new(notice.title.clone())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.colored_label(ERROR_RED, notice.message.as_str());
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.controller.dismiss_notice();
        }
    }
}
