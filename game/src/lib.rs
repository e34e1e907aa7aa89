pub mod config;
pub mod cursor;
pub mod events;
pub mod hud;
pub mod main_menu;
pub mod node_art;
pub mod palette;
pub mod panel;
pub mod pause_menu;
pub mod sandbox;
pub mod screen;
pub mod settings;
pub mod settings_menu;
pub mod skilltree;
pub mod skilltree_camera;
pub mod skilltree_view;
pub mod tooltip;
pub mod ui_layer;
pub mod victory;
pub mod widgets;
pub mod world;

pub use config::UiConfig;
pub use ui_layer::{UiCommand, UiLayer};
