//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod customer_panel;
pub mod dashboard;
pub mod item_panel;
pub mod line_table;
pub mod login;
pub mod new_quotation;
pub mod password_panel;
pub mod quotation_view;
pub mod quotations_panel;
pub mod reports_panel;
pub mod salesperson_panel;
pub mod setup_wizard;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
