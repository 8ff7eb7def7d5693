use eframe::egui;
use std::sync::mpsc;
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::config::settings::SettingKey;
use crate::config::SettingsService;
use crate::storage::JsonFileStore;
use crate::ui::error_panel::{ErrorPanel, ErrorSeverity};
use crate::ui::settings_panel::{SettingsAction, SettingsPanel};

/// Name of the settings file kept next to the executable.
const SETTINGS_FILE: &str = "preferences.json";

#[derive(Debug)]
pub enum BackendMessage {
    /// A background save finished, successfully or not.
    SettingsSaved(Result<(), String>),
}

pub struct PreferencesApp {
    runtime: Handle,

    backend_rx: mpsc::Receiver<BackendMessage>,

    backend_tx: mpsc::Sender<BackendMessage>,

    service: SettingsService,

    settings_panel: SettingsPanel,

    error_panel: ErrorPanel,

    show_errors: bool,

    show_about: bool,

    status_message: String,

    /// Saves spawned but not yet reported back. Saves are independent and
    /// unordered; the store is trusted to tolerate overlapping writes.
    pending_saves: usize,

    last_save_started: Option<std::time::Instant>,
}

impl PreferencesApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, runtime: Handle) -> Self {
        let (backend_tx, backend_rx) = mpsc::channel::<BackendMessage>();

        let store = Arc::new(JsonFileStore::next_to_executable(SETTINGS_FILE));
        let mut service = SettingsService::new(store);

        let mut error_panel = ErrorPanel::default();

        // Load persisted preferences before the first frame; a failed load
        // keeps the defaults.
        if let Err(e) = runtime.block_on(service.load()) {
            tracing::warn!("Could not load preferences, using defaults: {}", e);
            error_panel.add_error_with_details(
                "Could not load preferences, using defaults",
                e.to_string(),
                ErrorSeverity::Warning,
            );
        }

        // Audit trail: every preference change lands in the log
        for key in SettingKey::ALL {
            service.on_change(
                key,
                Arc::new(move |value| {
                    tracing::info!("preference {} changed to {}", key, value);
                }),
            );
        }

        Self {
            runtime,
            backend_rx,
            backend_tx,
            service,
            settings_panel: SettingsPanel::default(),
            error_panel,
            show_errors: false,
            show_about: false,
            status_message: "Ready".to_string(),
            pending_saves: 0,
            last_save_started: None,
        }
    }

    /// Process messages from background tasks
    fn process_backend_messages(&mut self) {
        while let Ok(msg) = self.backend_rx.try_recv() {
            match msg {
                BackendMessage::SettingsSaved(result) => {
                    self.pending_saves = self.pending_saves.saturating_sub(1);
                    if self.pending_saves == 0 {
                        self.last_save_started = None;
                    }
                    match result {
                        Ok(()) => {
                            self.status_message = "Preferences saved".to_string();
                        }
                        Err(e) => {
                            // The toggled value stays in memory; only the
                            // persistence failed.
                            self.status_message = "Failed to save preferences".to_string();
                            self.error_panel.add_error_with_details(
                                "Failed to save preferences",
                                e,
                                ErrorSeverity::Error,
                            );
                        }
                    }
                }
            }
        }
    }

    /// Persist the record as of now on the runtime, reporting completion
    /// through the backend channel.
    fn persist(&mut self) {
        let save = self.service.save();
        let tx = self.backend_tx.clone();

        self.runtime.spawn(async move {
            let result = save.await.map_err(|e| e.to_string());
            let _ = tx.send(BackendMessage::SettingsSaved(result));
        });

        self.pending_saves += 1;
        if self.last_save_started.is_none() {
            self.last_save_started = Some(std::time::Instant::now());
        }
        self.status_message = "Saving…".to_string();
    }
}

impl eframe::App for PreferencesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_backend_messages();

        ctx.request_repaint_after(std::time::Duration::from_millis(100));

        ctx.set_visuals(egui::Visuals::dark());

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_errors, "Notifications");
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.show_about = true;
                    }
                });
            });
        });

        if self.show_about {
            egui::Window::new("About")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Outliner Preferences");
                        ui.label(egui::RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).strong());
                        ui.add_space(10.0);
                        ui.separator();
                        ui.add_space(10.0);
                        ui.label("Settings service and preferences window");
                        ui.label("for the Outliner editing plugin");
                        ui.add_space(20.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }

        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if self.pending_saves > 0 {
                        ui.spinner();
                        if let Some(started) = self.last_save_started {
                            ui.label(format!("Saving: {}s", started.elapsed().as_secs()));
                        }
                        ui.separator();
                    }
                    ui.label(&self.status_message);
                });
            });

        if self.show_errors {
            egui::SidePanel::right("error_panel")
                .resizable(true)
                .default_width(350.0)
                .min_width(280.0)
                .max_width(500.0)
                .show(ctx, |ui| {
                    self.error_panel.show_panel(ui);
                });
        }

        self.error_panel.show_toasts(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let action = self.settings_panel.show(ui, &mut self.service);

                    match action {
                        Some(SettingsAction::Persist) => {
                            self.persist();
                        }
                        Some(SettingsAction::RestoreDefaults) => {
                            self.service.reset();
                            self.persist();
                        }
                        None => {}
                    }
                });
        });
    }
}
