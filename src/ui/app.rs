//! Main application UI.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate};
use eframe::egui::{self, Align, Layout, RichText};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::client::ApiClient;
use crate::config::{ApiConfig, AppConfig};
use crate::error::AppError;
use crate::models::{
    Company, CreateCustomer, CreateItem, Customer, CustomerInfo, Item, ItemInfo, LoginForm, PasswordForm,
    QuotationDetailRow, QuotationSummary, SalesPerson, SalesPersonForm, StatusCounts, UpdateCustomer, UpdateItem,
    WeeklyCount,
};
use crate::quote::{Action, QuotationDraft, QuotationEditor, StatusRequest};
use crate::reports::QuotationReportFilter;
use crate::resource::{Mutation, Reconciled, ResourceList};
use crate::session::AppContext;
use crate::stats::Category;
use crate::validation::{FieldErrors, Validate};

use super::components::colors;
use super::line_table::LineInputs;
use super::{
    customer_panel, dashboard, item_panel, login, new_quotation, password_panel, quotation_view, quotations_panel,
    reports_panel, salesperson_panel,
};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Customers,
    Items,
    SalesPersons,
    Quotations,
    NewQuotation,
    QuotationView,
    Reports,
    ChangePassword,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::Customers => "Customers",
            Panel::Items => "Items",
            Panel::SalesPersons => "Sales Persons",
            Panel::Quotations => "Quotations",
            Panel::NewQuotation => "New Quotation",
            Panel::QuotationView => "Quotation",
            Panel::Reports => "Reports",
            Panel::ChangePassword => "Change Password",
        }
    }
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Session
    LoggedIn { user: crate::models::User, remember: bool },
    LoginFailed(String),
    PasswordChanged(String),

    // Data loading
    CustomersLoaded(Vec<Customer>),
    ItemsLoaded(Vec<Item>),
    SalesPersonsLoaded(Vec<SalesPerson>),
    QuotationsLoaded(Vec<QuotationSummary>),
    CompaniesLoaded(Vec<Company>),
    QuotationLoaded {
        quotation_id: String,
        rows: Vec<QuotationDetailRow>,
    },
    StatusCountsLoaded(StatusCounts),
    MonthlyLoaded(Vec<QuotationSummary>),
    WeeklyLoaded(Vec<WeeklyCount>),
    LoadError(String),

    // CRUD operations
    CustomerChanged(Mutation<Customer>, String),
    ItemChanged(Mutation<Item>, String),
    SalesPersonChanged(Mutation<SalesPerson>, String),
    QuotationCreated(String),
    QuotationSaved(String),
    QuotationStatusChanged(String),
    QuotationDeleted(String),
    OperationFailed(String),

    // Connection test
    ConnectionTested(Result<(), String>),
}

/// Customer add/edit dialog.
#[derive(Default, Clone)]
pub struct CustomerDialog {
    pub base: Option<Customer>,
    pub info: CustomerInfo,
    pub errors: FieldErrors,
    pub is_open: bool,
    pub saving: bool,
}

impl CustomerDialog {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn create() -> Self {
        Self {
            is_open: true,
            ..Default::default()
        }
    }

    /// Create a form pre-filled for editing an existing customer.
    pub fn edit(customer: &Customer) -> Self {
        Self {
            base: Some(customer.clone()),
            info: CustomerInfo::from_customer(customer),
            is_open: true,
            ..Default::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.base.is_some()
    }
}

/// Item add/edit dialog.
#[derive(Default, Clone)]
pub struct ItemDialog {
    pub base: Option<Item>,
    pub info: ItemInfo,
    pub errors: FieldErrors,
    pub is_open: bool,
    pub saving: bool,
}

impl ItemDialog {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn create() -> Self {
        Self {
            is_open: true,
            ..Default::default()
        }
    }

    pub fn edit(item: &Item) -> Self {
        Self {
            base: Some(item.clone()),
            info: ItemInfo::from_item(item),
            is_open: true,
            ..Default::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.base.is_some()
    }
}

/// Sales person add/edit dialog.
#[derive(Default, Clone)]
pub struct SalesPersonDialog {
    /// Code of the record being edited.
    pub code: Option<String>,
    pub form: SalesPersonForm,
    pub errors: FieldErrors,
    pub is_open: bool,
    pub saving: bool,
}

impl SalesPersonDialog {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn create() -> Self {
        Self {
            is_open: true,
            ..Default::default()
        }
    }

    pub fn edit(sp: &SalesPerson) -> Self {
        Self {
            code: Some(sp.sales_p_code.clone()),
            form: SalesPersonForm::from_salesperson(sp),
            is_open: true,
            ..Default::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.code.is_some()
    }
}

/// Backend connection settings dialog.
#[derive(Default, Clone)]
pub struct ApiDialog {
    pub is_open: bool,
    pub api: ApiConfig,
    pub port_input: String,
    pub testing: bool,
    pub result: Option<Result<(), String>>,
}

impl ApiDialog {
    pub fn open(api: &ApiConfig) -> Self {
        Self {
            is_open: true,
            api: api.clone(),
            port_input: api.port.to_string(),
            ..Default::default()
        }
    }
}

/// Target for delete confirmation dialog.
#[derive(Clone)]
pub enum DeleteTarget {
    /// Customers are keyed by id locally and deleted by code.
    Customer { id: i64, code: String, name: String },
    Item { code: String, name: String },
    SalesPerson { code: String, name: String },
    Quotation { code: String, name: String },
}

impl DeleteTarget {
    fn record(&self) -> &'static str {
        match self {
            DeleteTarget::Customer { .. } => "customer",
            DeleteTarget::Item { .. } => "item",
            DeleteTarget::SalesPerson { .. } => "sales person",
            DeleteTarget::Quotation { .. } => "quotation",
        }
    }

    fn name(&self) -> &str {
        match self {
            DeleteTarget::Customer { name, .. }
            | DeleteTarget::Item { name, .. }
            | DeleteTarget::SalesPerson { name, .. }
            | DeleteTarget::Quotation { name, .. } => name,
        }
    }
}

/// Approve/reject/submit dialog of the detail view.
#[derive(Clone)]
pub struct StatusDialog {
    pub action: Action,
    pub reason: String,
}

/// Detail view state.
#[derive(Default)]
pub struct QuotationViewState {
    /// Id being shown; kept for reloads after a status change.
    pub quotation_id: Option<String>,
    pub editor: Option<QuotationEditor>,
    pub inputs: Vec<LineInputs>,
    pub errors: FieldErrors,
    pub loading: bool,
    pub saving: bool,
    pub add_item: Option<String>,
    pub status_dialog: Option<StatusDialog>,
}

/// New quotation builder state.
#[derive(Default)]
pub struct NewQuotationState {
    pub draft: QuotationDraft,
    pub inputs: Vec<LineInputs>,
    pub errors: FieldErrors,
    pub add_item: Option<String>,
    pub saving: bool,
}

/// Dashboard data.
#[derive(Default)]
pub struct DashboardState {
    pub counts: Option<StatusCounts>,
    pub monthly: Vec<QuotationSummary>,
    pub weekly: Vec<WeeklyCount>,
    pub selected: Option<Category>,
    pub loaded_at: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportTab {
    #[default]
    Customers,
    Quotations,
}

/// Report panel filters.
pub struct ReportState {
    pub tab: ReportTab,
    pub customer_query: String,
    pub filter: QuotationReportFilter,
    pub use_start: bool,
    pub use_end: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Default for ReportState {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            tab: ReportTab::default(),
            customer_query: String::new(),
            filter: QuotationReportFilter::default(),
            use_start: false,
            use_end: false,
            start_date: today - chrono::Duration::days(30),
            end_date: today,
        }
    }
}

impl ReportState {
    /// Copy the date pickers into the filter.
    pub fn sync_dates(&mut self) {
        self.filter.start = self.use_start.then_some(self.start_date);
        self.filter.end = self.use_end.then_some(self.end_date);
    }
}

/// Main application state.
pub struct App {
    // Runtime and session
    pub rt: tokio::runtime::Runtime,
    pub ctx: AppContext,
    config_path: PathBuf,

    // Message channel for async communication, tagged with the session that issued the request
    pub tx: mpsc::UnboundedSender<(u64, UiMessage)>,
    pub rx: mpsc::UnboundedReceiver<(u64, UiMessage)>,
    session: u64,

    // Navigation
    pub current_panel: Panel,

    // Collections
    pub customers: ResourceList<Customer>,
    pub items: ResourceList<Item>,
    pub salespersons: ResourceList<SalesPerson>,
    pub quotations: ResourceList<QuotationSummary>,
    pub companies: Vec<Company>,

    // Forms
    pub login_form: LoginForm,
    pub login_errors: FieldErrors,
    pub logging_in: bool,
    pub customer_dialog: CustomerDialog,
    pub item_dialog: ItemDialog,
    pub salesperson_dialog: SalesPersonDialog,
    pub password_form: PasswordForm,
    pub password_errors: FieldErrors,
    pub password_saving: bool,

    // Views
    pub dashboard: DashboardState,
    pub view: QuotationViewState,
    pub new_quotation: NewQuotationState,
    pub reports: ReportState,

    // Dialogs
    pub api_dialog: ApiDialog,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(ctx: AppContext, config_path: PathBuf, rt: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let debounce = ctx.config.ui.debounce();
        let login_form = LoginForm {
            remember_me: ctx.config.ui.remember_me_default,
            ..Default::default()
        };

        let mut app = Self {
            rt,
            ctx,
            config_path,
            tx,
            rx,
            session: 0,
            current_panel: Panel::default(),
            customers: ResourceList::new(debounce),
            items: ResourceList::new(debounce),
            salespersons: ResourceList::new(debounce),
            quotations: ResourceList::new(debounce),
            companies: Vec::new(),
            login_form,
            login_errors: FieldErrors::new(),
            logging_in: false,
            customer_dialog: CustomerDialog::default(),
            item_dialog: ItemDialog::default(),
            salesperson_dialog: SalesPersonDialog::default(),
            password_form: PasswordForm::default(),
            password_errors: FieldErrors::new(),
            password_saving: false,
            dashboard: DashboardState::default(),
            view: QuotationViewState::default(),
            new_quotation: NewQuotationState::default(),
            reports: ReportState::default(),
            api_dialog: ApiDialog::default(),
            delete_target: None,
            error_message: None,
            success_message: None,
        };

        if app.ctx.is_logged_in() {
            app.load_dashboard();
        }

        app
    }

    /// Spawn a request on the runtime and forward its message to the UI.
    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = UiMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        let session = self.session;
        self.rt.spawn(async move {
            let _ = tx.send((session, task.await));
        });
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Switch panels, tearing down the one being left and loading the next.
    pub fn navigate(&mut self, panel: Panel) {
        if panel == self.current_panel {
            return;
        }
        debug!("Navigate {:?} -> {:?}", self.current_panel, panel);

        match self.current_panel {
            Panel::Customers => {
                self.customers.leave();
                self.customer_dialog.reset();
            }
            Panel::Items => {
                self.items.leave();
                self.item_dialog.reset();
            }
            Panel::SalesPersons => {
                self.salespersons.leave();
                self.salesperson_dialog.reset();
            }
            Panel::Quotations => self.quotations.leave(),
            Panel::QuotationView => {
                if let Some(editor) = self.view.editor.as_mut() {
                    editor.cancel();
                }
                self.view.status_dialog = None;
            }
            _ => {}
        }

        self.current_panel = panel;

        match panel {
            Panel::Dashboard => self.load_dashboard(),
            Panel::Customers => self.load_customers(),
            Panel::Items => self.load_items(),
            Panel::SalesPersons => self.load_salespersons(),
            Panel::Quotations => self.load_quotations(),
            Panel::NewQuotation => {
                self.load_customers();
                self.load_items();
                self.load_salespersons();
                self.load_companies();
                if self.new_quotation.draft.salesperson.is_none() {
                    let code = self.ctx.salesperson_code();
                    self.new_quotation.draft.salesperson = (!code.is_empty()).then_some(code);
                }
            }
            Panel::QuotationView => self.load_items(),
            Panel::Reports => {
                self.load_customers();
                self.load_quotations();
                self.load_salespersons();
            }
            Panel::ChangePassword => {
                self.password_form = PasswordForm::default();
                self.password_errors = FieldErrors::new();
            }
        }
    }

    /// Open the detail view for a quotation id.
    pub fn open_quotation(&mut self, quotation_id: &str) {
        self.view = QuotationViewState {
            quotation_id: Some(quotation_id.to_string()),
            ..Default::default()
        };
        self.navigate(Panel::QuotationView);
        self.load_quotation();
    }

    // ========================================================================
    // Session
    // ========================================================================

    pub fn login(&mut self) {
        self.login_errors = self.login_form.validate();
        if !self.login_errors.is_empty() {
            return;
        }

        let api = self.ctx.api.clone();
        let username = self.login_form.username.trim().to_string();
        let password = self.login_form.password.clone();
        let remember = self.login_form.remember_me;
        self.logging_in = true;
        info!("Logging in as {}", username);

        self.spawn(async move {
            match api.login(&username, &password).await {
                Ok(user) => UiMessage::LoggedIn { user, remember },
                Err(e) => UiMessage::LoginFailed(e.user_message("Unable to log in. Please try again.")),
            }
        });
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.ctx.logout() {
            warn!("Failed to clear session: {}", e);
        }
        info!("Logged out");
        // Responses still in flight belong to the previous user.
        self.session += 1;
        self.logging_in = false;
        self.password_saving = false;
        let remember_me = self.ctx.config.ui.remember_me_default;
        let debounce = self.ctx.config.ui.debounce();
        self.login_form = LoginForm {
            remember_me,
            ..Default::default()
        };
        self.current_panel = Panel::Dashboard;
        self.customers = ResourceList::new(debounce);
        self.items = ResourceList::new(debounce);
        self.salespersons = ResourceList::new(debounce);
        self.quotations = ResourceList::new(debounce);
        self.dashboard = DashboardState::default();
        self.view = QuotationViewState::default();
        self.new_quotation = NewQuotationState::default();
        self.reports = ReportState::default();
        self.delete_target = None;
    }

    pub fn change_password(&mut self) {
        self.password_errors = self.password_form.validate();
        if !self.password_errors.is_empty() {
            return;
        }
        let Some(user) = self.ctx.user() else {
            return;
        };
        let request = self.password_form.to_request(&user.user_id);
        let api = self.ctx.api.clone();
        self.password_saving = true;

        self.spawn(async move {
            match api.change_password(&request).await {
                Ok(msg) => UiMessage::PasswordChanged(
                    msg.message
                        .unwrap_or_else(|| "Password changed successfully".to_string()),
                ),
                Err(e) => UiMessage::OperationFailed(e.user_message("Error changing password. Please try again.")),
            }
        });
    }

    // ========================================================================
    // Loading
    // ========================================================================

    pub fn load_dashboard(&mut self) {
        let api = self.ctx.api.clone();
        let scope = self.ctx.scope_code();
        self.spawn(async move {
            match api.status_counts(scope.as_deref()).await {
                Ok(counts) => UiMessage::StatusCountsLoaded(counts),
                Err(e) => UiMessage::LoadError(e.user_message("Failed to load quotation counts")),
            }
        });

        let api = self.ctx.api.clone();
        let scope = self.ctx.scope_code();
        self.spawn(async move {
            match api.quotations_by_month(scope.as_deref()).await {
                Ok(rows) => UiMessage::MonthlyLoaded(rows),
                Err(e) => UiMessage::LoadError(e.user_message("Failed to load this month's quotations")),
            }
        });

        let api = self.ctx.api.clone();
        self.spawn(async move {
            match api.weekly_counts().await {
                Ok(rows) => UiMessage::WeeklyLoaded(rows),
                Err(e) => UiMessage::LoadError(e.user_message("Failed to load weekly counts")),
            }
        });
    }

    pub fn load_customers(&mut self) {
        let api = self.ctx.api.clone();
        let scope = self.ctx.scope_code();
        self.customers.set_loading(true);
        self.spawn(async move {
            match api.customers(scope.as_deref()).await {
                Ok(rows) => UiMessage::CustomersLoaded(rows),
                Err(e) => UiMessage::LoadError(e.user_message("Failed to load customers")),
            }
        });
    }

    pub fn load_items(&mut self) {
        let api = self.ctx.api.clone();
        self.items.set_loading(true);
        self.spawn(async move {
            match api.items().await {
                Ok(rows) => UiMessage::ItemsLoaded(rows),
                Err(e) => UiMessage::LoadError(e.user_message("Failed to load items")),
            }
        });
    }

    pub fn load_salespersons(&mut self) {
        let api = self.ctx.api.clone();
        self.salespersons.set_loading(true);
        self.spawn(async move {
            match api.salespersons().await {
                Ok(rows) => UiMessage::SalesPersonsLoaded(rows),
                Err(e) => UiMessage::LoadError(e.user_message("Failed to load sales persons")),
            }
        });
    }

    pub fn load_quotations(&mut self) {
        let api = self.ctx.api.clone();
        let scope = self.ctx.scope_code();
        self.quotations.set_loading(true);
        self.spawn(async move {
            match api.quotations(scope.as_deref()).await {
                Ok(rows) => UiMessage::QuotationsLoaded(rows),
                Err(e) => UiMessage::LoadError(e.user_message("Failed to load quotations")),
            }
        });
    }

    pub fn load_companies(&mut self) {
        let api = self.ctx.api.clone();
        self.spawn(async move {
            match api.companies().await {
                Ok(rows) => UiMessage::CompaniesLoaded(rows),
                Err(e) => UiMessage::LoadError(e.user_message("Failed to load companies")),
            }
        });
    }

    pub fn load_quotation(&mut self) {
        let Some(id) = self.view.quotation_id.clone() else {
            return;
        };
        let api = self.ctx.api.clone();
        self.view.loading = true;
        self.spawn(async move {
            match api.quotation_detail(&id).await {
                Ok(rows) => UiMessage::QuotationLoaded { quotation_id: id, rows },
                Err(e) => UiMessage::LoadError(e.user_message("Failed to load quotation")),
            }
        });
    }

    // ========================================================================
    // Customers
    // ========================================================================

    pub fn begin_customer_edit(&mut self, customer: &Customer) {
        match self.customers.begin_edit(customer.cus_id) {
            Ok(()) => self.customer_dialog = CustomerDialog::edit(customer),
            Err(e) => self.error_message = Some(e.user_message("Another customer is being edited")),
        }
    }

    pub fn cancel_customer_dialog(&mut self) {
        self.customers.end_edit();
        self.customer_dialog.reset();
    }

    pub fn save_customer(&mut self) {
        let dialog = &mut self.customer_dialog;
        dialog.errors = dialog.info.validate();
        if !dialog.errors.is_empty() {
            return;
        }
        dialog.saving = true;

        let api = self.ctx.api.clone();
        let user_code = self.ctx.salesperson_code();

        if let Some(base) = &dialog.base {
            let updated = dialog.info.apply_to(base);
            let body = UpdateCustomer {
                customer: updated.clone(),
                updated_by: user_code,
                updated_date: today(),
            };
            self.spawn(async move {
                match api.update_customer(&body).await {
                    Ok(_) => UiMessage::CustomerChanged(Mutation::Updated(updated), "Customer updated".to_string()),
                    Err(e) => UiMessage::OperationFailed(e.user_message("Error updating customer. Please try again.")),
                }
            });
        } else {
            let body = CreateCustomer {
                customer_info: dialog.info.clone(),
                createdby: user_code,
            };
            self.spawn(async move {
                match api.create_customer(&body).await {
                    Ok(_) => UiMessage::CustomerChanged(Mutation::Created, "Customer added".to_string()),
                    Err(e) => UiMessage::OperationFailed(e.user_message("Error adding customer. Please try again.")),
                }
            });
        }
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub fn begin_item_edit(&mut self, item: &Item) {
        match self.items.begin_edit(item.item_code.clone()) {
            Ok(()) => self.item_dialog = ItemDialog::edit(item),
            Err(e) => self.error_message = Some(e.user_message("Another item is being edited")),
        }
    }

    pub fn cancel_item_dialog(&mut self) {
        self.items.end_edit();
        self.item_dialog.reset();
    }

    pub fn save_item(&mut self) {
        let dialog = &mut self.item_dialog;
        dialog.errors = dialog.info.validate();
        if !dialog.errors.is_empty() {
            return;
        }

        let api = self.ctx.api.clone();
        let user_code = self.ctx.salesperson_code();

        if let Some(base) = &dialog.base {
            let updated = match dialog.info.apply_to(base) {
                Ok(item) => item,
                Err(e) => {
                    self.error_message = Some(e.user_message("Invalid item"));
                    return;
                }
            };
            dialog.saving = true;
            let body = UpdateItem {
                item: updated.clone(),
                updated_by: user_code,
                updated_date: today(),
            };
            self.spawn(async move {
                match api.update_item(&body).await {
                    Ok(_) => UiMessage::ItemChanged(Mutation::Updated(updated), "Item updated".to_string()),
                    Err(e) => UiMessage::OperationFailed(e.user_message("Error updating item. Please try again.")),
                }
            });
        } else {
            dialog.saving = true;
            let body = CreateItem {
                item_info: dialog.info.clone(),
                createdby: user_code,
            };
            self.spawn(async move {
                match api.create_item(&body).await {
                    Ok(_) => UiMessage::ItemChanged(Mutation::Created, "Item added".to_string()),
                    Err(e) => UiMessage::OperationFailed(e.user_message("Error adding item. Please try again.")),
                }
            });
        }
    }

    // ========================================================================
    // Sales persons
    // ========================================================================

    pub fn begin_salesperson_edit(&mut self, sp: &SalesPerson) {
        match self.salespersons.begin_edit(sp.sales_p_code.clone()) {
            Ok(()) => self.salesperson_dialog = SalesPersonDialog::edit(sp),
            Err(e) => self.error_message = Some(e.user_message("Another sales person is being edited")),
        }
    }

    pub fn cancel_salesperson_dialog(&mut self) {
        self.salespersons.end_edit();
        self.salesperson_dialog.reset();
    }

    pub fn save_salesperson(&mut self) {
        let dialog = &mut self.salesperson_dialog;
        dialog.errors = dialog.form.validate();
        if !dialog.errors.is_empty() {
            return;
        }
        dialog.saving = true;

        let api = self.ctx.api.clone();
        if let Some(code) = &dialog.code {
            let updated = dialog.form.apply_to(code);
            self.spawn(async move {
                match api.update_salesperson(&updated).await {
                    Ok(_) => UiMessage::SalesPersonChanged(Mutation::Updated(updated), "Sales person updated".to_string()),
                    Err(e) => UiMessage::OperationFailed(e.user_message("Error updating sales person. Please try again.")),
                }
            });
        } else {
            let body = dialog.form.clone();
            self.spawn(async move {
                match api.create_salesperson(&body).await {
                    Ok(_) => UiMessage::SalesPersonChanged(Mutation::Created, "Sales person added".to_string()),
                    Err(e) => UiMessage::OperationFailed(e.user_message("Error adding sales person. Please try again.")),
                }
            });
        }
    }

    // ========================================================================
    // Delete
    // ========================================================================

    pub fn confirm_delete(&mut self, target: DeleteTarget) {
        self.delete_target = Some(target);
    }

    fn execute_delete(&mut self, target: DeleteTarget) {
        let api = self.ctx.api.clone();
        let record = target.record();
        info!("Deleting {} {}", record, target.name());

        match target {
            DeleteTarget::Customer { id, code, .. } => self.spawn(async move {
                match api.delete_customer(&code).await {
                    Ok(_) => UiMessage::CustomerChanged(Mutation::Deleted(id), "Customer deleted".to_string()),
                    Err(e) => UiMessage::OperationFailed(e.delete_message(record)),
                }
            }),
            DeleteTarget::Item { code, .. } => self.spawn(async move {
                match api.delete_item(&code).await {
                    Ok(_) => UiMessage::ItemChanged(Mutation::Deleted(code), "Item deleted".to_string()),
                    Err(e) => UiMessage::OperationFailed(e.delete_message(record)),
                }
            }),
            DeleteTarget::SalesPerson { code, .. } => self.spawn(async move {
                match api.delete_salesperson(&code).await {
                    Ok(_) => UiMessage::SalesPersonChanged(Mutation::Deleted(code), "Sales person deleted".to_string()),
                    Err(e) => UiMessage::OperationFailed(e.delete_message(record)),
                }
            }),
            DeleteTarget::Quotation { code, .. } => self.spawn(async move {
                match api.delete_quotation(&code).await {
                    Ok(_) => UiMessage::QuotationDeleted(code),
                    Err(e) => UiMessage::OperationFailed(e.delete_message(record)),
                }
            }),
        }
    }

    // ========================================================================
    // Quotations
    // ========================================================================

    pub fn submit_new_quotation(&mut self) {
        let state = &mut self.new_quotation;
        state.errors = state.draft.validate();
        if !state.errors.is_empty() {
            return;
        }
        state.saving = true;

        let body = state.draft.to_payload(&self.ctx.salesperson_code());
        let api = self.ctx.api.clone();
        self.spawn(async move {
            match api.create_quotation(&body).await {
                Ok(msg) => UiMessage::QuotationCreated(
                    msg.message
                        .unwrap_or_else(|| "Quotation created successfully".to_string()),
                ),
                Err(e) => UiMessage::OperationFailed(e.user_message("Error creating quotation. Please try again.")),
            }
        });
    }

    pub fn begin_quotation_edit(&mut self) {
        let Some(actor) = self.ctx.actor() else {
            return;
        };
        if let Some(editor) = self.view.editor.as_mut() {
            match editor.begin_edit(&actor) {
                Ok(()) => self.view.inputs = editor.lines().iter().map(LineInputs::of).collect(),
                Err(e) => self.error_message = Some(e.user_message("This quotation cannot be edited")),
            }
        }
    }

    pub fn cancel_quotation_edit(&mut self) {
        if let Some(editor) = self.view.editor.as_mut() {
            editor.cancel();
            self.view.inputs = editor.lines().iter().map(LineInputs::of).collect();
        }
        self.view.errors = FieldErrors::new();
    }

    pub fn save_quotation(&mut self) {
        let Some(editor) = self.view.editor.as_ref() else {
            return;
        };
        self.view.errors = editor.validate();
        if !self.view.errors.is_empty() {
            return;
        }
        let body = editor.to_update_payload();
        let api = self.ctx.api.clone();
        self.view.saving = true;
        self.spawn(async move {
            match api.update_quotation(&body).await {
                Ok(msg) => UiMessage::QuotationSaved(
                    msg.message
                        .unwrap_or_else(|| "Quotation updated successfully".to_string()),
                ),
                Err(e) => UiMessage::OperationFailed(e.user_message("Error updating quotation. Please try again.")),
            }
        });
    }

    /// Run a status-changing action from the detail view.
    pub fn run_status_action(&mut self, action: Action, reason: Option<String>) {
        let (Some(editor), Some(actor)) = (self.view.editor.as_ref(), self.ctx.actor()) else {
            return;
        };
        let request = match editor.status_request(action, &actor, reason.as_deref()) {
            Ok(request) => request,
            Err(e) => {
                self.error_message = Some(e.user_message("This action is not available"));
                return;
            }
        };
        let id = editor.header().quotation_id.clone();
        let api = self.ctx.api.clone();
        self.view.saving = true;
        self.view.status_dialog = None;
        info!("{} quotation {}", action, editor.header().quotation_code);

        self.spawn(async move {
            let result = match &request {
                StatusRequest::Submit(body) => api.submit(&id, body).await,
                StatusRequest::Decide(body) => api.update_status(&id, body).await,
            };
            match result {
                Ok(msg) => UiMessage::QuotationStatusChanged(
                    msg.message
                        .unwrap_or_else(|| format!("Quotation {}", past_tense(action))),
                ),
                Err(e) => UiMessage::OperationFailed(e.user_message("Error updating quotation status. Please try again.")),
            }
        });
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Ask for a location and write a workbook there.
    pub fn export_with<F>(&mut self, prefix: &str, write: F)
    where
        F: FnOnce(&std::path::Path) -> Result<(), rust_xlsxwriter::XlsxError>,
    {
        let filename = crate::export::generate_export_filename(prefix);
        let Some(path) = crate::export::show_save_dialog(&filename) else {
            return;
        };

        match write(&path).map_err(AppError::from) {
            Ok(()) => {
                info!("Exported {}", path.display());
                self.success_message = Some(format!("Exported to: {}", path.display()));
            }
            Err(e) => {
                error!("Export failed: {}", e);
                self.error_message = Some(format!("Export failed: {}", e));
            }
        }
    }

    // ========================================================================
    // Message handling
    // ========================================================================

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok((session, msg)) = self.rx.try_recv() {
            if session != self.session {
                debug!("Dropping result from session {}", session);
                continue;
            }
            self.handle_message(msg);
        }
    }

    fn handle_message(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::LoggedIn { user, remember } => {
                self.logging_in = false;
                self.login_form.password.clear();
                if let Err(e) = self.ctx.login(user, remember) {
                    warn!("Failed to persist session: {}", e);
                }
                self.current_panel = Panel::Dashboard;
                self.load_dashboard();
            }
            UiMessage::LoginFailed(message) => {
                self.logging_in = false;
                self.login_errors.add("credentials", message);
            }
            UiMessage::PasswordChanged(message) => {
                self.password_saving = false;
                self.password_form = PasswordForm::default();
                self.success_message = Some(message);
            }

            UiMessage::CustomersLoaded(rows) => self.customers.set_items(rows),
            UiMessage::ItemsLoaded(rows) => self.items.set_items(rows),
            UiMessage::SalesPersonsLoaded(rows) => self.salespersons.set_items(rows),
            UiMessage::QuotationsLoaded(rows) => self.quotations.set_items(rows),
            UiMessage::CompaniesLoaded(rows) => self.companies = rows,
            UiMessage::QuotationLoaded { quotation_id, rows } => {
                if self.view.quotation_id.as_deref() != Some(quotation_id.as_str()) {
                    debug!("Dropping detail for quotation {} no longer open", quotation_id);
                    return;
                }
                self.view.loading = false;
                match QuotationEditor::from_rows(&rows) {
                    Ok(editor) => {
                        self.view.inputs = editor.lines().iter().map(LineInputs::of).collect();
                        self.view.editor = Some(editor);
                    }
                    Err(e) => self.error_message = Some(e.user_message("Quotation not found")),
                }
            }
            UiMessage::StatusCountsLoaded(counts) => {
                self.dashboard.counts = Some(counts);
                self.dashboard.loaded_at = Some(Local::now());
            }
            UiMessage::MonthlyLoaded(rows) => self.dashboard.monthly = rows,
            UiMessage::WeeklyLoaded(rows) => self.dashboard.weekly = rows,
            UiMessage::LoadError(message) => {
                self.customers.set_loading(false);
                self.items.set_loading(false);
                self.salespersons.set_loading(false);
                self.quotations.set_loading(false);
                self.view.loading = false;
                error!("{}", message);
                self.error_message = Some(message);
            }

            UiMessage::CustomerChanged(mutation, message) => {
                if self.customers.reconcile(mutation) == Reconciled::RefetchRequired {
                    self.load_customers();
                }
                self.customer_dialog.reset();
                self.success_message = Some(message);
            }
            UiMessage::ItemChanged(mutation, message) => {
                if self.items.reconcile(mutation) == Reconciled::RefetchRequired {
                    self.load_items();
                }
                self.item_dialog.reset();
                self.success_message = Some(message);
            }
            UiMessage::SalesPersonChanged(mutation, message) => {
                if self.salespersons.reconcile(mutation) == Reconciled::RefetchRequired {
                    self.load_salespersons();
                }
                self.salesperson_dialog.reset();
                self.success_message = Some(message);
            }
            UiMessage::QuotationCreated(message) => {
                self.new_quotation = NewQuotationState::default();
                self.success_message = Some(message);
                self.navigate(Panel::Quotations);
            }
            UiMessage::QuotationSaved(message) | UiMessage::QuotationStatusChanged(message) => {
                self.view.saving = false;
                self.success_message = Some(message);
                self.load_quotation();
            }
            UiMessage::QuotationDeleted(code) => {
                self.quotations.reconcile(Mutation::Deleted(code));
                self.success_message = Some("Quotation deleted".to_string());
                if self.current_panel == Panel::QuotationView {
                    self.view = QuotationViewState::default();
                    self.navigate(Panel::Quotations);
                }
            }
            UiMessage::ConnectionTested(result) => {
                self.api_dialog.testing = false;
                self.api_dialog.result = Some(result);
            }
            UiMessage::OperationFailed(message) => {
                self.customer_dialog.saving = false;
                self.item_dialog.saving = false;
                self.salesperson_dialog.saving = false;
                self.new_quotation.saving = false;
                self.view.saving = false;
                self.password_saving = false;
                error!("{}", message);
                self.error_message = Some(message);
            }
        }
    }

    /// Apply due debounced searches; returns the soonest pending one.
    fn tick_searches(&mut self) -> Option<std::time::Duration> {
        let now = Instant::now();
        match self.current_panel {
            Panel::Customers => {
                self.customers.tick(now);
                self.customers.pending_search(now)
            }
            Panel::Items => {
                self.items.tick(now);
                self.items.pending_search(now)
            }
            Panel::SalesPersons => {
                self.salespersons.tick(now);
                self.salespersons.pending_search(now)
            }
            Panel::Quotations => {
                self.quotations.tick(now);
                self.quotations.pending_search(now)
            }
            _ => None,
        }
    }

    fn is_busy(&self) -> bool {
        self.logging_in
            || self.customers.is_loading()
            || self.items.is_loading()
            || self.salespersons.is_loading()
            || self.quotations.is_loading()
            || self.view.loading
            || self.view.saving
            || self.new_quotation.saving
            || self.password_saving
            || self.api_dialog.testing
    }

    // ========================================================================
    // Chrome
    // ========================================================================

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("Go", |ui| {
                    for panel in [
                        Panel::Dashboard,
                        Panel::Quotations,
                        Panel::NewQuotation,
                        Panel::Customers,
                        Panel::Items,
                        Panel::SalesPersons,
                        Panel::Reports,
                    ] {
                        if ui.button(panel.name()).clicked() {
                            self.navigate(panel);
                            ui.close();
                        }
                    }
                });
                ui.menu_button("Settings", |ui| {
                    if ui.button("API Connection").clicked() {
                        self.api_dialog = ApiDialog::open(&self.ctx.config.api);
                        ui.close();
                    }
                });
                ui.menu_button("Account", |ui| {
                    if ui.button("Change Password").clicked() {
                        self.navigate(Panel::ChangePassword);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Logout").clicked() {
                        self.logout();
                        ui.close();
                    }
                });
            });
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(user) = self.ctx.user() {
                        ui.colored_label(colors::SUCCESS, "●");
                        ui.label(format!("{} ({}, {})", user.sales_p_name, user.sales_p_code, user.sales_p_type));
                    }
                    ui.separator();
                    ui.label(RichText::new(self.ctx.api.base_url()).weak());

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.is_busy() {
                            ui.spinner();
                            ui.label("Working...");
                        }
                    });
                });
            });
    }

    fn show_message_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, &message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        } else if let Some(message) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, &message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }
    }

    fn show_delete_dialog(&mut self, ctx: &egui::Context) {
        let Some(target) = self.delete_target.clone() else {
            return;
        };

        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "Are you sure you want to delete {} \"{}\"?",
                    target.record(),
                    target.name()
                ));
                ui.label(RichText::new("This action cannot be undone.").weak());
                ui.add_space(15.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.delete_target = None;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui
                            .button(RichText::new("Delete").color(colors::ERROR))
                            .clicked()
                        {
                            self.delete_target = None;
                            self.execute_delete(target.clone());
                        }
                    });
                });
            });
    }

    // ========================================================================
    // API settings
    // ========================================================================

    fn test_api_connection(&mut self) {
        let base_url = self.api_dialog.api.base_url();
        self.api_dialog.testing = true;
        self.api_dialog.result = None;
        self.spawn(async move {
            let result = match ApiClient::new(&base_url) {
                Ok(api) => match api.test_connection().await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err("Server responded with an error".to_string()),
                    Err(e) => Err(e.to_string()),
                },
                Err(e) => Err(e.to_string()),
            };
            UiMessage::ConnectionTested(result)
        });
    }

    /// Validate, write the config file and switch the client to the new URL.
    fn save_api_config(&mut self) -> Result<(), String> {
        let config = AppConfig {
            api: self.api_dialog.api.clone(),
            ui: self.ctx.config.ui.clone(),
        };
        config.validate().map_err(|e| e.to_string())?;
        let api = ApiClient::new(&config.api.base_url()).map_err(|e| e.to_string())?;
        config.save(&self.config_path).map_err(|e| e.to_string())?;

        info!("API endpoint changed to {}", api.base_url());
        self.ctx.api = api;
        self.ctx.config = config;
        Ok(())
    }

    fn show_api_dialog(&mut self, ctx: &egui::Context) {
        if !self.api_dialog.is_open {
            return;
        }

        let mut open = true;
        egui::Window::new("API Connection")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_space(10.0);
                api_config_grid(ui, "api_dialog_grid", &mut self.api_dialog.api, &mut self.api_dialog.port_input);
                ui.add_space(5.0);
                ui.label(RichText::new(self.api_dialog.api.base_url()).weak());
                ui.add_space(15.0);

                ui.horizontal(|ui| {
                    let testing = self.api_dialog.testing;
                    if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
                        self.test_api_connection();
                    }

                    ui.add_space(10.0);

                    if testing {
                        ui.spinner();
                        ui.label("Testing...");
                    } else if let Some(result) = &self.api_dialog.result {
                        match result {
                            Ok(()) => {
                                ui.colored_label(colors::SUCCESS, "Connection successful!");
                            }
                            Err(e) => {
                                ui.colored_label(colors::ERROR, format!("Failed: {}", e));
                            }
                        }
                    }
                });

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.api_dialog.is_open = false;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Save").clicked() {
                            match self.save_api_config() {
                                Ok(()) => {
                                    self.api_dialog.is_open = false;
                                    self.success_message = Some("Connection settings saved".to_string());
                                }
                                Err(e) => {
                                    error!("Failed to save config: {}", e);
                                    self.error_message = Some(e);
                                }
                            }
                        }
                    });
                });
            });

        if !open {
            self.api_dialog.is_open = false;
        }
    }
}

/// Protocol, host, port and prefix inputs. Shared with the setup wizard.
pub fn api_config_grid(ui: &mut egui::Ui, id: &str, api: &mut ApiConfig, port_input: &mut String) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Protocol:");
            ui.horizontal(|ui| {
                for protocol in ["http", "https"] {
                    if ui.selectable_label(api.protocol == protocol, protocol).clicked() {
                        api.protocol = protocol.to_string();
                    }
                }
            });
            ui.end_row();

            ui.label("Host:");
            ui.text_edit_singleline(&mut api.host);
            ui.end_row();

            ui.label("Port:");
            if ui.text_edit_singleline(port_input).changed()
                && let Ok(p) = port_input.trim().parse()
            {
                api.port = p;
            }
            ui.end_row();

            ui.label("Path prefix:");
            ui.add(egui::TextEdit::singleline(&mut api.prefix).hint_text("optional, e.g. /api"));
            ui.end_row();
        });
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        if self.is_busy() {
            ctx.request_repaint();
        }

        if !self.ctx.is_logged_in() {
            egui::CentralPanel::default().show(ctx, |ui| login::show(self, ui));
            self.show_message_dialogs(ctx);
            return;
        }

        if let Some(due) = self.tick_searches() {
            ctx.request_repaint_after(due);
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let go_back = match self.current_panel {
                Panel::Dashboard => {
                    if let Some(next) = dashboard::show(self, ui) {
                        self.navigate(next);
                    }
                    false
                }
                Panel::Customers => customer_panel::show(self, ui),
                Panel::Items => item_panel::show(self, ui),
                Panel::SalesPersons => salesperson_panel::show(self, ui),
                Panel::Quotations => quotations_panel::show(self, ui),
                Panel::NewQuotation => new_quotation::show(self, ui),
                Panel::QuotationView => quotation_view::show(self, ui),
                Panel::Reports => reports_panel::show(self, ui),
                Panel::ChangePassword => password_panel::show(self, ui),
            };
            if go_back {
                let parent = match self.current_panel {
                    Panel::NewQuotation | Panel::QuotationView => Panel::Quotations,
                    _ => Panel::Dashboard,
                };
                self.navigate(parent);
            }
        });

        self.show_api_dialog(ctx);
        self.show_delete_dialog(ctx);
        self.show_message_dialogs(ctx);
    }
}

/// `YYYY-MM-DD` for audit fields.
fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn past_tense(action: Action) -> &'static str {
    match action {
        Action::Submit => "submitted",
        Action::Resubmit => "resubmitted",
        Action::Approve | Action::ReApprove => "approved",
        Action::Reject => "rejected",
        Action::Edit => "updated",
        Action::Delete => "deleted",
        Action::Print => "exported",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuotationStatus;
    use crate::session::SessionStore;

    fn app(dir: &tempfile::TempDir) -> App {
        let store = SessionStore::new(dir.path().join("session.json"));
        let ctx = AppContext::init(AppConfig::default(), store).unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();
        App::new(ctx, dir.path().join("config.toml"), rt)
    }

    fn detail(quotation_id: &str, code: &str) -> Vec<QuotationDetailRow> {
        vec![QuotationDetailRow {
            quotation_id: quotation_id.to_string(),
            quotation_code: code.to_string(),
            quotation_status: QuotationStatus::Saved,
            item_id: "IT-1".to_string(),
            item_name: "Router".to_string(),
            item_quantity: 1,
            quotation_unit_price: 100.0,
            ..Default::default()
        }]
    }

    fn deliver(app: &mut App, msg: UiMessage) {
        app.tx.send((app.session, msg)).unwrap();
        app.poll_async_results();
    }

    #[test]
    fn test_late_detail_for_previous_quotation_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.view.quotation_id = Some("B".to_string());
        app.view.loading = true;

        deliver(
            &mut app,
            UiMessage::QuotationLoaded {
                quotation_id: "A".to_string(),
                rows: detail("A", "Q-A"),
            },
        );
        assert!(app.view.editor.is_none());
        assert!(app.view.loading);

        deliver(
            &mut app,
            UiMessage::QuotationLoaded {
                quotation_id: "B".to_string(),
                rows: detail("B", "Q-B"),
            },
        );
        let editor = app.view.editor.as_ref().unwrap();
        assert_eq!(editor.header().quotation_code, "Q-B");
        assert!(!app.view.loading);
    }

    #[test]
    fn test_results_issued_before_logout_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        let customer = Customer {
            cus_id: 1,
            cus_code: "C001".to_string(),
            cus_name: "Acme Lanka".to_string(),
            ..Default::default()
        };
        let stale = app.session;
        app.tx.send((stale, UiMessage::CustomersLoaded(vec![customer.clone()]))).unwrap();

        app.logout();
        app.poll_async_results();
        assert!(app.customers.items().is_empty());

        deliver(&mut app, UiMessage::CustomersLoaded(vec![customer]));
        assert_eq!(app.customers.items().len(), 1);
    }
}
