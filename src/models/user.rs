//! Logged-in user and auth DTOs.

use super::SalesPersonType;
use serde::{Deserialize, Serialize};

/// User returned by the login endpoint and persisted for "Remember me".
///
/// The backend emits the salesperson columns under two spellings
/// (`user_salesp_code` / `sales_p_code`, `user_sales_p_type` / `sales_p_type`);
/// either is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawUser")]
pub struct User {
    pub user_id: String,
    pub sales_p_name: String,
    pub sales_p_code: String,
    pub sales_p_type: SalesPersonType,
}

#[derive(Deserialize)]
struct RawUser {
    #[serde(default, deserialize_with = "super::de::id")]
    user_id: String,
    #[serde(default, deserialize_with = "super::de::text")]
    sales_p_name: String,
    #[serde(default, deserialize_with = "super::de::text")]
    user_salesp_code: String,
    #[serde(default, deserialize_with = "super::de::text")]
    sales_p_code: String,
    #[serde(default, deserialize_with = "super::de::optional_role")]
    user_sales_p_type: Option<SalesPersonType>,
    #[serde(default, deserialize_with = "super::de::optional_role")]
    sales_p_type: Option<SalesPersonType>,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        let sales_p_code = if raw.user_salesp_code.is_empty() {
            raw.sales_p_code
        } else {
            raw.user_salesp_code
        };
        Self {
            user_id: raw.user_id,
            sales_p_name: raw.sales_p_name,
            sales_p_code,
            sales_p_type: raw.sales_p_type.or(raw.user_sales_p_type).unwrap_or_default(),
        }
    }
}

impl User {
    pub fn is_approver(&self) -> bool {
        self.sales_p_type.is_approver()
    }
}

/// Body of `POST /v1/api/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of `POST /v1/api/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /v1/api/change-password`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub user_id: String,
    pub current_password: String,
    pub new_password: String,
}

/// Login form contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

/// Change-password form contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordForm {
    pub fn to_request(&self, user_id: &str) -> ChangePasswordRequest {
        ChangePasswordRequest {
            user_id: user_id.to_string(),
            current_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_columns() {
        let json = r#"{"user_id":7,"sales_p_name":"Ruwan","user_salesp_code":"SP07","user_sales_p_type":"A"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_id, "7");
        assert_eq!(user.sales_p_code, "SP07");
        assert!(user.is_approver());
    }

    #[test]
    fn test_both_spellings_present() {
        let json = r#"{"user_id":"7","sales_p_name":"Ruwan","user_salesp_code":"SP07","sales_p_code":"SP07","sales_p_type":"M","user_sales_p_type":"M"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.sales_p_code, "SP07");
        assert!(!user.is_approver());
    }

    #[test]
    fn test_blank_type_falls_back_to_prefixed_column() {
        let json = r#"{"user_id":9,"sales_p_name":"Nimal","sales_p_code":"SP09","sales_p_type":"","user_sales_p_type":"A"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_approver());

        let json = r#"{"user_id":9,"sales_p_name":"Nimal","sales_p_code":"SP09","sales_p_type":null,"user_sales_p_type":"X"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(!user.is_approver());
    }

    #[test]
    fn test_persisted_form_reloads() {
        let user = User {
            user_id: "3".to_string(),
            sales_p_name: "Dilani".to_string(),
            sales_p_code: "SP03".to_string(),
            sales_p_type: SalesPersonType::Approver,
        };
        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_change_password_body() {
        let body = ChangePasswordRequest {
            user_id: "3".to_string(),
            current_password: "old".to_string(),
            new_password: "newpass123".to_string(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["userId"], "3");
        assert_eq!(value["currentPassword"], "old");
        assert_eq!(value["newPassword"], "newpass123");
    }
}
