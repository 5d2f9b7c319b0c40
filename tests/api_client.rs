//! ApiClient against a mocked backend.

use quotation_desk::AppError;
use quotation_desk::client::ApiClient;
use quotation_desk::models::{QuotationStatus, SalesPersonType};
use quotation_desk::quote::QuotationEditor;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri()).unwrap()
}

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api/login"))
        .and(body_partial_json(json!({"username": "kamal"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": {
                "user_id": 7,
                "sales_p_name": "Kamal Perera",
                "user_salesp_code": "SP02",
                "user_sales_p_type": "A"
            }
        })))
        .mount(&server)
        .await;

    let user = client(&server).await.login("kamal", "secret123").await.unwrap();

    assert_eq!(user.user_id, "7");
    assert_eq!(user.sales_p_code, "SP02");
    assert_eq!(user.sales_p_type, SalesPersonType::Approver);
}

#[tokio::test]
async fn test_login_refused_keeps_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Account locked"})))
        .mount(&server)
        .await;

    let err = client(&server).await.login("kamal", "wrong").await.unwrap_err();

    assert!(matches!(err, AppError::LoginFailed(ref m) if m == "Account locked"));
}

#[tokio::test]
async fn test_login_without_user_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let err = client(&server).await.login("kamal", "wrong").await.unwrap_err();

    assert_eq!(err.user_message("fallback"), "Invalid username or password.");
}

#[tokio::test]
async fn test_customers_scoped_by_salesperson() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .and(query_param("cp_code", "SP05"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"cus_id": 1, "cus_code": "C001", "cus_name": "Acme Lanka", "cus_addr": "Colombo"},
            {"cus_id": "2", "cus_code": "C002", "cus_name": "Blue Ocean", "contact_p_no": null}
        ])))
        .mount(&server)
        .await;

    let customers = client(&server).await.customers(Some("SP05")).await.unwrap();

    assert_eq!(customers.len(), 2);
    assert_eq!(customers[1].cus_id, 2);
    assert_eq!(customers[1].contact_p_no, "");
}

#[tokio::test]
async fn test_delete_referenced_customer_is_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/customers/C001"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "in use"})))
        .mount(&server)
        .await;

    let err = client(&server).await.delete_customer("C001").await.unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.delete_message("customer"), "This customer is associated with other data.");
}

#[tokio::test]
async fn test_mutation_rejected_by_success_flag() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/items/IT-9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": false, "message": "Item is locked"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).await.delete_item("IT-9").await.unwrap_err();

    assert!(matches!(err, AppError::Rejected(Some(ref m)) if m == "Item is locked"));
    assert_eq!(err.user_message("fallback"), "Item is locked");
}

#[tokio::test]
async fn test_mutation_with_empty_body_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/quotations/"))
        .and(query_param("qcode", "Q-0042"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client(&server).await.delete_quotation("Q-0042").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_quotation_detail_builds_editor() {
    let server = MockServer::start().await;
    let header = json!({
        "quotation_id": 42,
        "quotation_code": "Q-0042",
        "quotation_name": "Server refresh",
        "quotation_date": "2026-03-02",
        "quotation_status": "3",
        "cus_name": "Acme Lanka",
        "sp_code": "SP05",
        "created_by": "SP05",
        "title": "Sir/Madam"
    });
    let mut first = header.clone();
    first["item_id"] = json!("IT-1");
    first["item_name"] = json!("Rack server");
    first["quotation_unit_price"] = json!("1000.00");
    first["quotation_item_vat"] = json!(18);
    first["item_quantity"] = json!(2);
    let mut second = header;
    second["item_id"] = json!("IT-2");
    second["item_name"] = json!("Install");
    second["quotation_unit_price"] = json!(0);
    second["item_quantity"] = json!(1);

    Mock::given(method("GET"))
        .and(path("/v1/quotations/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([first, second])))
        .mount(&server)
        .await;

    let rows = client(&server).await.quotation_detail("42").await.unwrap();
    let editor = QuotationEditor::from_rows(&rows).unwrap();

    assert_eq!(editor.header().quotation_code, "Q-0042");
    assert_eq!(editor.status(), QuotationStatus::Approved);
    assert_eq!(editor.lines().len(), 2);
    assert!((editor.grand_total() - 2360.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_quotation_detail_empty_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/quotations/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client(&server).await.quotation_detail("99").await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}
