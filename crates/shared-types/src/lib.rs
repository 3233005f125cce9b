use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Email/password pair submitted to `/signup` and `/login`.
///
/// Missing or `null` fields deserialize as empty strings so the server can
/// answer with a field-specific validation message instead of a decode failure.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account as returned to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub data: String,
}

/// Error body used by every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let creds: Credentials = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert_eq!(creds.email, "a@b.com");
        assert!(creds.password.is_empty());
    }

    #[test]
    fn null_fields_become_empty() {
        let creds: Credentials =
            serde_json::from_str(r#"{"email":"a@b.com","password":null}"#).unwrap();
        assert_eq!(creds.email, "a@b.com");
        assert!(creds.password.is_empty());

        let creds: Credentials = serde_json::from_str(r#"{"email":null}"#).unwrap();
        assert!(creds.email.is_empty());

        assert!(serde_json::from_str::<Credentials>(r#"{"email":5}"#).is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("a@b.com", "pw123");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("a@b.com"));
        assert!(!printed.contains("pw123"));
    }

    #[test]
    fn user_response_has_no_password_field() {
        let body = serde_json::to_value(UserResponse {
            id: 1,
            email: "a@b.com".to_string(),
        })
        .unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["id"], 1);
    }
}
