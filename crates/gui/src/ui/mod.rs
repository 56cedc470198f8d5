pub mod debug_panel;
pub mod status_bar;
