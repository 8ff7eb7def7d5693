//! UI components module

pub mod error_panel;
pub mod settings_panel;
