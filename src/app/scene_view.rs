//! Interactive 3-D canvas for `XmasApp`.
//!
//! Drag to orbit, scroll to zoom, click an ornament to activate it. The
//! camera auto-rotates while the user isn't dragging.

use eframe::egui;

use digital_xmas::render::paint::paint_scene;
use digital_xmas::render::scene::animation_time;

use super::XmasApp;

impl XmasApp {
    pub fn draw_scene(&mut self, ui: &mut egui::Ui) {
        let now = std::time::Instant::now();
        let dt = (now - self.last_frame_time).as_secs_f32().min(0.1);
        self.last_frame_time = now;
        let time = animation_time(self.app_start.elapsed().as_secs_f64());

        let response = ui.allocate_response(
            ui.available_size(),
            egui::Sense::click_and_drag().union(egui::Sense::hover()),
        );
        let rect = response.rect;

        if response.dragged() {
            let delta = response.drag_delta();
            self.camera.orbit(delta.x, delta.y, rect.height());
        } else {
            self.camera.advance(dt);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.camera.zoom(scroll);
            }
        }

        self.hovered = response
            .hover_pos()
            .and_then(|pos| self.camera.pick(&self.scene, rect, pos, time));
        if self.hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(index) = self.camera.pick(&self.scene, rect, pos, time) {
                    self.scene.activate(index);
                }
            }
        }

        let painter = ui.painter_at(rect);
        paint_scene(&painter, rect, &self.scene, &self.camera, time, self.hovered);
    }
}
