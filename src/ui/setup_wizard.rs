//! First-run setup wizard for configuration.

use std::path::PathBuf;
use std::sync::mpsc;

use eframe::egui::{self, RichText};

use super::app::api_config_grid;
use super::components::colors;
use crate::client::ApiClient;
use crate::config::AppConfig;

/// Connection test state.
#[derive(Default, Clone)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success,
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-3).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// API connection test state.
    pub api_test_state: ConnectionTestState,
    /// Wizard completed flag.
    pub completed: bool,
    /// Port input as string for text editing.
    port_input: String,
    /// Debounce input as string.
    debounce_input: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        Self::from_config(AppConfig::default())
    }

    /// Start from an existing (possibly invalid) configuration.
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            current_step: 0,
            port_input: config.api.port.to_string(),
            debounce_input: config.ui.search_debounce_ms.to_string(),
            config,
            api_test_state: ConnectionTestState::NotTested,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true,
            1 => matches!(self.api_test_state, ConnectionTestState::Success),
            2 => self.config.validate().is_ok(),
            3 => true,
            _ => false,
        }
    }

    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Welcome",
            1 => "API Configuration",
            2 => "Preferences",
            3 => "Confirmation",
            _ => "Setup",
        }
    }

    const TOTAL_STEPS: usize = 4;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    pub rt: tokio::runtime::Runtime,
    config_path: PathBuf,
    api_test_rx: Option<mpsc::Receiver<Result<(), String>>>,
}

impl SetupApp {
    pub fn new(wizard: SetupWizard, initial_error: Option<String>, config_path: PathBuf) -> std::io::Result<Self> {
        Ok(Self {
            wizard,
            initial_error,
            rt: tokio::runtime::Runtime::new()?,
            config_path,
            api_test_rx: None,
        })
    }

    /// Test API connection asynchronously.
    fn start_api_test(&mut self) {
        let base_url = self.wizard.config.api.base_url();
        let (tx, rx) = mpsc::channel();
        self.api_test_rx = Some(rx);
        self.wizard.api_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = test_api_connection(&base_url).await;
            let _ = tx.send(result);
        });
    }

    /// Check for async test results.
    fn poll_test_results(&mut self) {
        if let Some(rx) = &self.api_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.api_test_state = match result {
                Ok(()) => ConnectionTestState::Success,
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.api_test_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_test_results();

        if matches!(self.wizard.api_test_state, ConnectionTestState::Testing) {
            ctx.request_repaint();
        }

        // Show initial error dialog
        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Configuration Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Quotation Desk Setup").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Step {} of {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                let needs_api_test = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        false
                    }
                    1 => show_api_step(ui, &mut self.wizard),
                    2 => {
                        show_preferences_step(ui, &mut self.wizard);
                        false
                    }
                    3 => {
                        show_confirmation_step(ui, &self.wizard, &self.config_path);
                        false
                    }
                    _ => false,
                };

                if needs_api_test {
                    self.start_api_test();
                }

                ui.add_space(30.0);
                ui.separator();

                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Back").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Get Started >"
                            } else {
                                "Next >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else if ui.button("Save & Exit").clicked() {
                            self.wizard.completed = true;
                        }
                    });
                });
            });
        });

        if self.wizard.completed {
            match self.wizard.config.save(&self.config_path) {
                Ok(()) => {
                    tracing::info!("Configuration saved to {}", self.config_path.display());
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    self.initial_error = Some(format!("Failed to save config: {}", e));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Welcome to Quotation Desk!");
    ui.add_space(10.0);
    ui.label("This wizard will help you connect the application to its server.");
    ui.add_space(20.0);
    ui.label("You will need:");
    ui.add_space(5.0);
    ui.label("  - The host name or IP address of the quotation API");
    ui.label("  - Its port and path prefix, if any");
}

fn show_api_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;

    let before = wizard.config.api.base_url();
    api_config_grid(ui, "api_grid", &mut wizard.config.api, &mut wizard.port_input);
    let url = wizard.config.api.base_url();
    if url != before {
        wizard.api_test_state = ConnectionTestState::NotTested;
    }

    ui.add_space(5.0);
    ui.label(RichText::new(url).weak());
    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.api_test_state, ConnectionTestState::Testing);
        if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.api_test_state {
            ConnectionTestState::NotTested => {
                ui.label("Not tested");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Testing...");
            }
            ConnectionTestState::Success => {
                ui.colored_label(colors::SUCCESS, "Connection successful!");
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(colors::ERROR, format!("Failed: {}", e));
            }
        }
    });

    needs_test
}

fn show_preferences_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) {
    egui::Grid::new("preferences_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Search delay (ms):");
            if ui.text_edit_singleline(&mut wizard.debounce_input).changed()
                && let Ok(ms) = wizard.debounce_input.trim().parse()
            {
                wizard.config.ui.search_debounce_ms = ms;
            }
            ui.end_row();

            ui.label("Login:");
            ui.checkbox(&mut wizard.config.ui.remember_me_default, "Tick \"Remember me\" by default");
            ui.end_row();
        });

    if let Err(e) = wizard.config.validate() {
        ui.add_space(10.0);
        ui.colored_label(colors::ERROR, e.to_string());
    }
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard, path: &std::path::Path) {
    ui.label("Review your configuration:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("API");
        ui.label(format!("  {}", wizard.config.api.base_url()));
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Preferences");
        ui.label(format!("  Search delay: {} ms", wizard.config.ui.search_debounce_ms));
        ui.label(format!(
            "  Remember me: {}",
            if wizard.config.ui.remember_me_default {
                "On"
            } else {
                "Off"
            }
        ));
    });

    ui.add_space(20.0);
    ui.label(format!("Click 'Save & Exit' to write {}.", path.display()));
    ui.label("You will need to restart the application after setup.");
}

/// Reachability check against the company endpoint.
async fn test_api_connection(base_url: &str) -> Result<(), String> {
    let api = ApiClient::new(base_url).map_err(|e| e.to_string())?;
    match api.test_connection().await {
        Ok(true) => Ok(()),
        Ok(false) => Err("Server responded with an error".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_step_requires_successful_test() {
        let mut wizard = SetupWizard::new();
        wizard.current_step = 1;
        assert!(!wizard.can_proceed());

        wizard.api_test_state = ConnectionTestState::Success;
        assert!(wizard.can_proceed());
    }

    #[test]
    fn test_preferences_step_rejects_invalid_config() {
        let mut wizard = SetupWizard::new();
        wizard.current_step = 2;
        wizard.config.ui.search_debounce_ms = 10_000;
        assert!(!wizard.can_proceed());
    }
}
