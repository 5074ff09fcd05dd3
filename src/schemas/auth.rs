use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(max = 128))]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation() {
        let ok = SignupRequest {
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            password: "correct horse".to_string(),
            full_name: None,
        };
        assert!(ok.validate().is_ok());

        let bad = SignupRequest {
            email: "not-an-email".to_string(),
            username: "ab".to_string(),
            password: "short".to_string(),
            full_name: None,
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_login_requires_password() {
        let login = LoginRequest {
            email: "ada@example.com".to_string(),
            password: String::new(),
        };
        assert!(login.validate().unwrap_err().field_errors().contains_key("password"));
    }
}
