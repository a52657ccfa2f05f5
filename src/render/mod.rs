pub mod camera;
pub mod layout;
pub mod paint;
pub mod scene;
