//! Login screen shown while no session is active.

use eframe::egui::{self, Key, RichText, Ui};
use egui_phosphor::regular::SIGN_IN;

use super::app::App;
use super::components::{colors, field_error, primary_button_with_icon};

pub fn show(app: &mut App, ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(RichText::new("Quotation Desk").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Quotation, Customer and Sales Management").size(14.0).weak());
        ui.add_space(40.0);

        egui::Frame::new()
            .fill(ui.style().visuals.extreme_bg_color)
            .inner_margin(egui::Margin::same(25))
            .corner_radius(egui::CornerRadius::same(8))
            .show(ui, |ui| {
                ui.set_width(320.0);

                egui::Grid::new("login_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Username:");
                        ui.add(egui::TextEdit::singleline(&mut app.login_form.username).desired_width(200.0));
                        ui.end_row();

                        ui.label("Password:");
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut app.login_form.password)
                                .password(true)
                                .desired_width(200.0),
                        );
                        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) && !app.logging_in {
                            app.login();
                        }
                        ui.end_row();
                    });

                ui.add_space(10.0);
                ui.checkbox(&mut app.login_form.remember_me, "Remember me");
                ui.add_space(10.0);

                field_error(ui, &app.login_errors, "credentials");

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!app.logging_in, |ui| {
                        if primary_button_with_icon(ui, SIGN_IN, "Login").clicked() {
                            app.login();
                        }
                    });
                    if app.logging_in {
                        ui.spinner();
                        ui.colored_label(colors::NEUTRAL, "Signing in...");
                    }
                });
            });
    });
}
