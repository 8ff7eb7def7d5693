//! Settings record and the observable service that owns it.

pub mod service;
pub mod settings;

pub use service::{ChangeCallback, SettingsService};
pub use settings::{SettingKey, Settings};
