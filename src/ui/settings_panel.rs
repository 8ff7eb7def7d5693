use eframe::egui;

use crate::config::settings::SettingKey;
use crate::config::SettingsService;

pub enum SettingsAction {
    /// A toggle changed; the full record should be persisted.
    Persist,
    RestoreDefaults,
}

/// Preferences panel: one labeled toggle row per setting.
///
/// Values are read from and written through the service, so every flip runs
/// the registered change callbacks before the persist action is returned.
#[derive(Default)]
pub struct SettingsPanel;

impl SettingsPanel {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        service: &mut SettingsService,
    ) -> Option<SettingsAction> {
        let mut action: Option<SettingsAction> = None;

        ui.heading("⚙ Preferences");
        ui.separator();
        ui.add_space(4.0);

        for key in SettingKey::ALL {
            if self.toggle_row(ui, service, key) {
                // Each toggle persists independently; no batching
                action = Some(SettingsAction::Persist);
            }
            ui.add_space(8.0);
        }

        ui.separator();
        ui.add_space(4.0);

        if ui
            .button("↺ Restore defaults")
            .on_hover_text("Set every preference back to its default value")
            .clicked()
        {
            action = Some(SettingsAction::RestoreDefaults);
        }

        action
    }

    /// Render one row; returns true when the toggle was flipped this frame.
    fn toggle_row(
        &mut self,
        ui: &mut egui::Ui,
        service: &mut SettingsService,
        key: SettingKey,
    ) -> bool {
        let mut value = service.get(key);
        let response = ui.checkbox(&mut value, key.label());
        if let Some(description) = key.description() {
            ui.indent(key.as_str(), |ui| {
                ui.label(egui::RichText::new(description).small().weak());
            });
        }

        if response.changed() {
            service.set(key, value);
            true
        } else {
            false
        }
    }
}
