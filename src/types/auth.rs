// src/types/auth.rs
use chrono::{DateTime, NaiveDateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

// ===== Request payloads =====

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp_code: String,
    pub new_password: String,
}

// ===== Responses =====

/// Login/register response as the API sends it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "userID", default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Acknowledgement returned by the password-reset endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// A saved, authenticated session
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub role: Option<Role>,
    pub expires_at: Option<String>,
}

impl AuthSession {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| jwt_expiry(&self.token))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// ISO-8601 with or without offset; a bare timestamp is taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT. The signature is not checked: the server is the authority.
pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    data.claims
        .exp
        .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn test_auth_response_accepts_numeric_user_id() {
        let raw = r#"{"token":"t","userID":42,"email":"a@b.co","fullName":"A B","role":"Student","expiresAt":"2030-01-01T00:00:00Z"}"#;
        let parsed: AuthResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.user_id.as_deref(), Some("42"));
        assert_eq!(parsed.full_name.as_deref(), Some("A B"));

        let raw = r#"{"token":"t","userID":"u-1"}"#;
        let parsed: AuthResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.user_id.as_deref(), Some("u-1"));
        assert!(parsed.role.is_none());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Student".parse::<Role>(), Ok(Role::Student));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("Teacher".parse::<Role>().is_err());
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let with_offset = parse_timestamp("2030-01-01T10:00:00+02:00").unwrap();
        assert_eq!(with_offset.to_rfc3339(), "2030-01-01T08:00:00+00:00");

        let bare = parse_timestamp("2030-01-01T10:00:00.1234567").unwrap();
        assert_eq!(bare.format("%H:%M").to_string(), "10:00");

        assert!(parse_timestamp("tomorrow").is_none());
    }

    #[test]
    fn test_jwt_expiry_fallback() {
        #[derive(Serialize)]
        struct Claims {
            sub: String,
            exp: i64,
            aud: String,
        }

        let token = encode(
            &Header::default(),
            &Claims {
                sub: "42".into(),
                exp: 1_900_000_000,
                aud: "masar".into(),
            },
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap();

        let session = AuthSession {
            token,
            user_id: "42".into(),
            email: "a@b.co".into(),
            full_name: "A".into(),
            role: Some(Role::Student),
            expires_at: None,
        };

        assert_eq!(session.expires_at().unwrap().timestamp(), 1_900_000_000);
        assert!(jwt_expiry("opaque-token").is_none());
    }
}
