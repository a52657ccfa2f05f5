//! Overlay rendering for `XmasApp`.
//!
//! Header and footer are static; the centre shows the instructions, the
//! loading spinner or the wish card depending on `OverlayState`.

use eframe::egui;
use egui::{Align2, Color32, RichText, Stroke, Vec2};

use digital_xmas::ui::state::{OverlayView, INSTRUCTIONS, LOADING_TEXT};

use super::XmasApp;

const RED: Color32 = Color32::from_rgb(239, 68, 68);
const EMERALD: Color32 = Color32::from_rgb(52, 211, 153);
const EMERALD_DARK: Color32 = Color32::from_rgb(16, 185, 129);

impl XmasApp {
    pub fn draw_overlay(&mut self, ctx: &egui::Context) {
        draw_header(ctx);
        draw_footer(ctx);

        let time = ctx.input(|i| i.time) as f32;
        let mut close = false;

        match self.overlay.view() {
            OverlayView::Instructions => {
                egui::Area::new(egui::Id::new("instructions"))
                    .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
                    .interactable(false)
                    .show(ctx, |ui| {
                        let alpha = 0.45 + 0.3 * (time * 2.0).sin();
                        ui.label(
                            RichText::new(INSTRUCTIONS)
                                .size(20.0)
                                .color(Color32::WHITE.gamma_multiply(alpha)),
                        );
                    });
            }
            OverlayView::Spinner => {
                wish_card(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(24.0);
                        ui.add(egui::Spinner::new().size(48.0).color(EMERALD_DARK));
                        ui.add_space(12.0);
                        ui.label(RichText::new(LOADING_TEXT).color(EMERALD).strong());
                        ui.add_space(24.0);
                    });
                });
            }
            OverlayView::WishCard { message, author } => {
                wish_card(ctx, |ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                        let button = egui::Button::new(
                            RichText::new("\u{2715}").size(18.0).color(Color32::from_white_alpha(120)),
                        )
                        .frame(false);
                        if ui.add(button).on_hover_text("Close").clicked() {
                            close = true;
                        }
                    });
                    ui.label(
                        RichText::new("\u{201C}")
                            .size(40.0)
                            .color(EMERALD_DARK.gamma_multiply(0.3)),
                    );
                    ui.label(
                        RichText::new(format!("\"{}\"", message))
                            .size(24.0)
                            .italics()
                            .color(Color32::WHITE),
                    );
                    ui.add_space(24.0);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("\u{2014} {}", author.to_uppercase()))
                                .size(14.0)
                                .strong()
                                .color(EMERALD),
                        );
                    });
                });
            }
        }

        if close {
            self.overlay.close();
        }
    }
}

/// Frosted card centred over the scene.
fn wish_card(ctx: &egui::Context, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Area::new(egui::Id::new("wish_card"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(Color32::from_black_alpha(160))
                .stroke(Stroke::new(1.0, Color32::from_white_alpha(26)))
                .rounding(24.0)
                .inner_margin(32.0)
                .show(ui, |ui| {
                    ui.set_width(480.0);
                    add_contents(ui);
                });
        });
}

fn draw_header(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("header"))
        .anchor(Align2::LEFT_TOP, Vec2::new(32.0, 32.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                ui.label(RichText::new("DIGITAL ").size(36.0).strong().color(Color32::WHITE));
                ui.label(RichText::new("XMAS").size(36.0).strong().color(RED));
            });
            ui.label(
                RichText::new("STAY COZY \u{2022} STAY MAGICAL")
                    .size(13.0)
                    .color(EMERALD.gamma_multiply(0.8)),
            );
        });
}

fn draw_footer(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("footer_status"))
        .anchor(Align2::LEFT_BOTTOM, Vec2::new(32.0, -32.0))
        .interactable(false)
        .show(ctx, |ui| {
            for line in ["SYSTEM_STATUS: MERRY", "AMBIENT_LIGHT: BREATHING", "MAGIC_LEVEL: 100%"] {
                ui.label(
                    RichText::new(line)
                        .monospace()
                        .size(11.0)
                        .color(Color32::from_white_alpha(100)),
                );
            }
        });

    egui::Area::new(egui::Id::new("footer_credit"))
        .anchor(Align2::RIGHT_BOTTOM, Vec2::new(-32.0, -32.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                ui.label(
                    RichText::new("CRAFTED WITH DIGITAL SNOW")
                        .size(10.0)
                        .color(Color32::from_white_alpha(76)),
                );
                ui.label(RichText::new("NORTH POLE V2.0").size(14.0).strong().color(Color32::WHITE));
            });
        });
}
