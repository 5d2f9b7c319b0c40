//! REST client for the quotation backend.

use crate::error::{AppError, Result};
use crate::models::{
    ApiMessage, ChangePasswordRequest, Company, CreateCustomer, CreateItem, CreateQuotation, Customer, Item,
    LoginRequest, LoginResponse, QuotationDetailRow, QuotationSummary, SalesPerson, SalesPersonForm,
    StatusCounts, StatusUpdate, SubmitStatus, UpdateCustomer, UpdateItem, UpdateQuotation, User, WeeklyCount,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Backend API client.
///
/// Cheap to clone; clones share one connection pool. No request timeout is
/// set, a request either completes or fails at the transport level.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - Backend root (e.g., "http://192.168.1.20:5000")
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base_url)
    }

    /// Attach the salesperson scope used by list endpoints for members.
    fn scoped(request: RequestBuilder, cp_code: Option<&str>) -> RequestBuilder {
        match cp_code {
            Some(code) if !code.is_empty() => request.query(&[("cp_code", code)]),
            _ => request,
        }
    }

    // ---------------------------------------------------------------------
    // Auth
    // ---------------------------------------------------------------------

    /// Authenticate and return the session user.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.client.post(self.url("/v1/api/login")).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Login refused with HTTP {status}");
            return Err(AppError::LoginFailed(
                extract_message(&text).unwrap_or_else(|| "Unable to log in. Please try again.".to_string()),
            ));
        }

        let parsed: LoginResponse = serde_json::from_str(&text)?;
        match (parsed.success, parsed.user) {
            (true, Some(user)) => {
                debug!("Logged in as {}", user.sales_p_code);
                Ok(user)
            }
            (_, _) => Err(AppError::LoginFailed(
                parsed
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Invalid username or password.".to_string()),
            )),
        }
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<ApiMessage> {
        self.mutate(self.client.post(self.url("/v1/api/change-password")).json(request))
            .await
    }

    /// Test connection to the backend by fetching the company lookup.
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self.client.get(self.url("/v1/api/company")).send().await?;
        Ok(response.status().is_success())
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    pub async fn companies(&self) -> Result<Vec<Company>> {
        self.fetch(self.client.get(self.url("/v1/api/company"))).await
    }

    // ---------------------------------------------------------------------
    // Customers
    // ---------------------------------------------------------------------

    pub async fn customers(&self, cp_code: Option<&str>) -> Result<Vec<Customer>> {
        let request = Self::scoped(self.client.get(self.url("/v1/customers")), cp_code);
        self.fetch(request).await
    }

    pub async fn create_customer(&self, body: &CreateCustomer) -> Result<ApiMessage> {
        self.mutate(self.client.post(self.url("/v1/customers")).json(body)).await
    }

    /// Update by numeric id.
    pub async fn update_customer(&self, body: &UpdateCustomer) -> Result<ApiMessage> {
        let path = format!("/v1/customers/{}", body.customer.cus_id);
        self.mutate(self.client.put(self.url(&path)).json(body)).await
    }

    /// Delete by customer code.
    pub async fn delete_customer(&self, cus_code: &str) -> Result<ApiMessage> {
        let path = format!("/v1/customers/{cus_code}");
        self.mutate(self.client.delete(self.url(&path))).await
    }

    // ---------------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------------

    pub async fn items(&self) -> Result<Vec<Item>> {
        self.fetch(self.client.get(self.url("/v1/items"))).await
    }

    pub async fn create_item(&self, body: &CreateItem) -> Result<ApiMessage> {
        self.mutate(self.client.post(self.url("/v1/items")).json(body)).await
    }

    pub async fn update_item(&self, body: &UpdateItem) -> Result<ApiMessage> {
        let path = format!("/v1/items/{}", body.item.item_code);
        self.mutate(self.client.put(self.url(&path)).json(body)).await
    }

    pub async fn delete_item(&self, item_code: &str) -> Result<ApiMessage> {
        let path = format!("/v1/items/{item_code}");
        self.mutate(self.client.delete(self.url(&path))).await
    }

    // ---------------------------------------------------------------------
    // Salespersons
    // ---------------------------------------------------------------------

    pub async fn salespersons(&self) -> Result<Vec<SalesPerson>> {
        self.fetch(self.client.get(self.url("/v1/salespersons"))).await
    }

    pub async fn create_salesperson(&self, body: &SalesPersonForm) -> Result<ApiMessage> {
        self.mutate(self.client.post(self.url("/v1/salespersons")).json(body)).await
    }

    pub async fn update_salesperson(&self, body: &SalesPerson) -> Result<ApiMessage> {
        let path = format!("/v1/salespersons/{}", body.sales_p_code);
        self.mutate(self.client.put(self.url(&path)).json(body)).await
    }

    pub async fn delete_salesperson(&self, sales_p_code: &str) -> Result<ApiMessage> {
        let path = format!("/v1/salespersons/{sales_p_code}");
        self.mutate(self.client.delete(self.url(&path))).await
    }

    // ---------------------------------------------------------------------
    // Quotations
    // ---------------------------------------------------------------------

    pub async fn quotations(&self, cp_code: Option<&str>) -> Result<Vec<QuotationSummary>> {
        let request = Self::scoped(self.client.get(self.url("/v1/quotations")), cp_code);
        self.fetch(request).await
    }

    /// One row per line item, header fields repeated on each.
    pub async fn quotation_detail(&self, quotation_id: &str) -> Result<Vec<QuotationDetailRow>> {
        let path = format!("/v1/quotations/{quotation_id}");
        let rows: Vec<QuotationDetailRow> = self.fetch(self.client.get(self.url(&path))).await?;
        if rows.is_empty() {
            return Err(AppError::not_found(format!("Quotation {quotation_id}")));
        }
        Ok(rows)
    }

    pub async fn create_quotation(&self, body: &CreateQuotation) -> Result<ApiMessage> {
        self.mutate(self.client.post(self.url("/v1/quotations")).json(body)).await
    }

    pub async fn update_quotation(&self, body: &UpdateQuotation) -> Result<ApiMessage> {
        self.mutate(self.client.put(self.url("/v1/quotations/")).json(body)).await
    }

    pub async fn delete_quotation(&self, quotation_code: &str) -> Result<ApiMessage> {
        let request = self
            .client
            .delete(self.url("/v1/quotations/"))
            .query(&[("qcode", quotation_code)]);
        self.mutate(request).await
    }

    /// Approve or reject.
    pub async fn update_status(&self, quotation_id: &str, body: &StatusUpdate) -> Result<ApiMessage> {
        let path = format!("/v1/quotations/update/{quotation_id}");
        self.mutate(self.client.put(self.url(&path)).json(body)).await
    }

    /// Submit or resubmit.
    pub async fn submit(&self, quotation_id: &str, body: &SubmitStatus) -> Result<ApiMessage> {
        let path = format!("/v1/quotations/submit/{quotation_id}");
        self.mutate(self.client.put(self.url(&path)).json(body)).await
    }

    // ---------------------------------------------------------------------
    // Aggregates
    // ---------------------------------------------------------------------

    pub async fn weekly_counts(&self) -> Result<Vec<WeeklyCount>> {
        self.fetch(self.client.get(self.url("/v1/quotations/weekly-count")))
            .await
    }

    pub async fn status_counts(&self, cp_code: Option<&str>) -> Result<StatusCounts> {
        let request = Self::scoped(self.client.get(self.url("/v1/quotations/counts")), cp_code);
        self.fetch(request).await
    }

    pub async fn quotations_by_month(&self, cp_code: Option<&str>) -> Result<Vec<QuotationSummary>> {
        let request = Self::scoped(self.client.get(self.url("/v1/quotations/by-month")), cp_code);
        self.fetch(request).await
    }

    // ---------------------------------------------------------------------
    // Transport helpers
    // ---------------------------------------------------------------------

    /// Send a read request and decode its JSON body.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("GET {url} failed with HTTP {status}");
            return Err(status_error(status, &text));
        }

        debug!("GET {url} -> {} bytes", text.len());
        serde_json::from_str(&text).map_err(|e| AppError::parse(format!("Unexpected response from {url}: {e}")))
    }

    /// Send a mutation and interpret `{ success, message }`.
    async fn mutate(&self, request: RequestBuilder) -> Result<ApiMessage> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Mutation on {url} failed with HTTP {status}");
            return Err(status_error(status, &text));
        }

        let message = if text.trim().is_empty() {
            ApiMessage::default()
        } else {
            // Some endpoints answer with a bare string or an unrelated object.
            serde_json::from_str::<ApiMessage>(&text).unwrap_or_default()
        };

        if !message.success {
            warn!("Mutation on {url} rejected: {:?}", message.message);
            return Err(AppError::Rejected(message.message));
        }

        debug!("Mutation on {url} succeeded");
        Ok(message)
    }
}

/// Map a non-success status to an error, keeping the backend message.
fn status_error(status: StatusCode, body: &str) -> AppError {
    let message = extract_message(body);
    if status == StatusCode::CONFLICT {
        AppError::Conflict(message)
    } else {
        AppError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Pull `message` out of a JSON error body.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/v1/items"), "http://localhost:5000/v1/items");
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(extract_message(r#"{"message":"Code exists"}"#).as_deref(), Some("Code exists"));
        assert_eq!(extract_message(r#"{"message":""}"#), None);
        assert_eq!(extract_message("<html>"), None);
    }

    #[test]
    fn test_status_error_conflict() {
        let err = status_error(StatusCode::CONFLICT, r#"{"message":"in use"}"#);
        assert!(err.is_conflict());

        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(matches!(err, AppError::Api { status: 500, message: None }));
    }
}
