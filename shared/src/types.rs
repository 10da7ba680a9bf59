//! API request and response types

use serde::{Deserialize, Serialize};

/// Role of the administrator tier
pub const ROLE_ADMIN: i16 = 1;
/// Role of the standard customer tier
pub const ROLE_CUSTOMER: i16 = 2;

/// Returns true if the role id refers to a known role
pub fn is_known_role(role: i16) -> bool {
    role == ROLE_ADMIN || role == ROLE_CUSTOMER
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    /// Postal address, optional; stored as an empty string when absent
    #[serde(default)]
    pub address: Option<String>,
    pub email: String,
    pub password: String,
    /// Role override; defaults to the customer tier when absent
    #[serde(default)]
    pub role: Option<i16>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update. Identity and role are deliberately not
/// expressible here: only these three fields are mutable through the
/// profile path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Public view of a user account. Never carries credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub email: String,
    pub role: i16,
}

/// Successful register/login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

/// The identity triple asserted by a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSubject {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    pub role: i16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles() {
        assert!(is_known_role(ROLE_ADMIN));
        assert!(is_known_role(ROLE_CUSTOMER));
        assert!(!is_known_role(0));
        assert!(!is_known_role(3));
    }

    #[test]
    fn test_update_request_defaults_to_empty() {
        let req: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none());
        assert!(req.address.is_none());
        assert!(req.email.is_none());
    }

    #[test]
    fn test_token_subject_wire_names() {
        let subject = TokenSubject {
            user_id: 7,
            email: "ana@x.com".to_string(),
            role: ROLE_CUSTOMER,
        };
        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["email"], "ana@x.com");
        assert_eq!(json["role"], 2);
    }
}
