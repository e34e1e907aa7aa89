pub mod app;
pub mod controls;
pub mod error;
pub mod graphics;
pub mod pixels_renderer;
pub mod slider;
pub mod surface;
pub mod ui;

pub use error::EngineError;
