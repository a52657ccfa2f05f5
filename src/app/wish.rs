//! Wish lifecycle for `XmasApp`.
//!
//! Activations from the scene start a background fetch; finished wishes are
//! polled from the shared channel each frame (`check_wishes`).

use std::sync::Arc;

use eframe::egui;

use digital_xmas::ornament::OrnamentType;

use super::XmasApp;

impl XmasApp {
    /// Start a wish request for every ornament activated this frame.
    pub fn dispatch_activations(&mut self, ctx: &egui::Context) {
        while let Ok(kind) = self.activation_rx.try_recv() {
            self.request_wish(ctx, kind);
        }
    }

    /// Show the spinner and fetch a wish for `kind` on a worker thread.
    pub fn request_wish(&mut self, ctx: &egui::Context, kind: OrnamentType) {
        self.overlay.click();
        self.in_flight += 1;
        log::info!("requesting wish for {} ({} in flight)", kind, self.in_flight);

        let service = Arc::clone(&self.wish_service);
        let tx = self.wish_tx.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let wish = service.fetch_wish(kind.label());
            let _ = tx.send(wish);
            ctx.request_repaint();
        });
    }

    /// Poll the wish channel and show whatever arrived last.
    pub fn check_wishes(&mut self) {
        while let Ok(wish) = self.wish_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.overlay.resolve(wish);
        }
    }
}
