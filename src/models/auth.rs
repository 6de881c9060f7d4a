use serde::{Deserialize, Serialize};

/// Account role as issued by the backend. Each role owns one dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Faculty,
    Student,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUPER_ADMIN" => Some(Role::SuperAdmin),
            "ADMIN" => Some(Role::Admin),
            "FACULTY" => Some(Role::Faculty),
            "STUDENT" => Some(Role::Student),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Faculty => "FACULTY",
            Role::Student => "STUDENT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Administrator",
            Role::Faculty => "Faculty",
            Role::Student => "Student",
        }
    }

    /// Landing page of this role's dashboard.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::SuperAdmin => "/super-admin",
            Role::Admin => "/admin",
            Role::Faculty => "/faculty",
            Role::Student => "/student",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub role: String,
    #[serde(default)]
    pub redirect_to: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub institute_id: Option<String>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_backend_names() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Faculty, Role::Student] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("faculty"), Some(Role::Faculty));
        assert_eq!(Role::parse("JANITOR"), None);
    }

    #[test]
    fn token_response_defaults() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "role": "ADMIN"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.user_id, None);
    }
}
