//! `XmasApp`: the top-level egui application state.
//!
//! This module declares the `XmasApp` struct, its constructor and the
//! `eframe::App` impl. Methods are split across the sibling sub-modules:
//!
//! - `wish`      : ornament activation, async wish fetch lifecycle
//! - `scene_view`: the interactive 3-D canvas (orbit, pick, paint)
//! - `overlay`   : header, footer, instructions and the wish card

pub mod overlay;
pub mod scene_view;
pub mod wish;

use std::sync::{mpsc, Arc};
use std::time::Instant;

use eframe::egui;

use digital_xmas::config::AppConfig;
use digital_xmas::net::gemini::{GeminiClient, WishError};
use digital_xmas::net::wish::{WishResponse, WishService};
use digital_xmas::ornament::OrnamentType;
use digital_xmas::render::camera::OrbitCamera;
use digital_xmas::render::scene::{compose, Scene, SceneSettings};
use digital_xmas::ui::state::OverlayState;

// ─── Application state ───────────────────────────────────────────────────────

pub struct XmasApp {
    pub scene: Scene,
    pub camera: OrbitCamera,
    /// Ornament under the pointer
    pub hovered: Option<usize>,
    pub overlay: OverlayState,
    pub wish_service: Arc<WishService<GeminiClient>>,
    // Every request shares one channel: the last wish to arrive is shown
    pub wish_tx: mpsc::Sender<WishResponse>,
    pub wish_rx: mpsc::Receiver<WishResponse>,
    pub in_flight: usize,
    /// Ornament activations dispatched by the scene
    pub activation_rx: mpsc::Receiver<OrnamentType>,
    pub app_start: Instant,
    pub last_frame_time: Instant,
}

impl XmasApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Result<Self, WishError> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let client = GeminiClient::new(&config.endpoint, config.request_timeout())?;
        let wish_service = WishService::new(client, config.api_key.clone()).with_model(config.model.clone());
        if !wish_service.has_credential() {
            log::warn!("no API key set (API_KEY / GEMINI_API_KEY); wishes will be offline");
        }

        let seed = config.layout_seed.unwrap_or_else(rand::random);
        log::info!("layout seed {}", seed);

        let (activation_tx, activation_rx) = mpsc::channel();
        let scene = compose(
            &SceneSettings {
                seed,
                ..SceneSettings::default()
            },
            move |kind| {
                let _ = activation_tx.send(kind);
            },
        );
        let camera = OrbitCamera::from_scene(&scene);
        let (wish_tx, wish_rx) = mpsc::channel();

        Ok(Self {
            scene,
            camera,
            hovered: None,
            overlay: OverlayState::default(),
            wish_service: Arc::new(wish_service),
            wish_tx,
            wish_rx,
            in_flight: 0,
            activation_rx,
            app_start: Instant::now(),
            last_frame_time: Instant::now(),
        })
    }
}

impl eframe::App for XmasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_wishes();

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.draw_scene(ui);
            });

        self.dispatch_activations(ctx);
        self.draw_overlay(ctx);

        // The scene animates continuously
        ctx.request_repaint();
    }
}
