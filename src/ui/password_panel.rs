//! Change password panel.

use eframe::egui::{self, Key, Ui};
use egui_phosphor::regular::KEY;

use super::app::App;
use super::components::{back_button, field_error, panel_header, primary_button_with_icon};

/// Show the change password form.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Change Password");

    let mut submit = false;

    egui::Grid::new("password_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            let form = &mut app.password_form;
            let errors = &app.password_errors;
            for (label, value, field) in [
                ("Old Password:", &mut form.old_password, "old_password"),
                ("New Password:", &mut form.new_password, "new_password"),
                ("Confirm Password:", &mut form.confirm_password, "confirm_password"),
            ] {
                ui.label(label);
                ui.vertical(|ui| {
                    let response = ui.add(egui::TextEdit::singleline(value).password(true).desired_width(250.0));
                    if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        submit = true;
                    }
                    field_error(ui, errors, field);
                });
                ui.end_row();
            }
        });

    ui.add_space(5.0);
    ui.label(egui::RichText::new("At least 8 characters, including a letter and a number.").weak());
    ui.add_space(15.0);

    ui.horizontal(|ui| {
        ui.add_enabled_ui(!app.password_saving, |ui| {
            if primary_button_with_icon(ui, KEY, "Change Password").clicked() {
                submit = true;
            }
        });
        if app.password_saving {
            ui.spinner();
        }
    });

    if submit && !app.password_saving {
        app.change_password();
    }

    go_back
}
