pub mod config;
pub mod net;
pub mod ornament;
pub mod render;
pub mod ui;
