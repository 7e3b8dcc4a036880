use actix_web::HttpResponse;
use std::fmt;

/// Error taxonomy shared by every service. Each variant knows the HTTP
/// status it maps to; handlers only log and convert.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Malformed or missing field, client-fixable (400)
    Validation(String),
    /// Email already registered (400)
    DuplicateEmail,
    /// Phone number already registered (400)
    DuplicatePhone,
    /// Username owned by a different user (400)
    UsernameTaken,
    /// Bad credentials (401) - never distinguishes missing account from wrong password
    InvalidCredentials,
    /// Entity absent (404)
    NotFound(String),
    /// Storage or unexpected failure (500) - logged, not detailed to the caller
    Database(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(msg) => write!(f, "{}", msg),
            ServiceError::DuplicateEmail => write!(f, "Email already registered"),
            ServiceError::DuplicatePhone => write!(f, "Phone number already registered"),
            ServiceError::UsernameTaken => write!(f, "Username already taken"),
            ServiceError::InvalidCredentials => write!(f, "Incorrect email or password"),
            ServiceError::NotFound(what) => write!(f, "{} not found", what),
            ServiceError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_)
            | ServiceError::DuplicateEmail
            | ServiceError::DuplicatePhone
            | ServiceError::UsernameTaken => 400,
            ServiceError::InvalidCredentials => 401,
            ServiceError::NotFound(_) => 404,
            ServiceError::Database(_) => 500,
        }
    }

    /// Standard error envelope: `{"success": false, "error": "..."}`
    pub fn to_http_response(&self) -> HttpResponse {
        let body = serde_json::json!({
            "success": false,
            "error": match self {
                // Storage details stay in the logs
                ServiceError::Database(_) => "Internal server error".to_string(),
                other => other.to_string(),
            }
        });

        match self {
            ServiceError::Validation(_)
            | ServiceError::DuplicateEmail
            | ServiceError::DuplicatePhone
            | ServiceError::UsernameTaken => HttpResponse::BadRequest().json(body),
            ServiceError::InvalidCredentials => HttpResponse::Unauthorized().json(body),
            ServiceError::NotFound(_) => HttpResponse::NotFound().json(body),
            ServiceError::Database(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}

/// Extracts the duplicate-key (E11000) message from a write error, if any.
/// The unique indexes are the authoritative duplicate signal; the message
/// names the violated index so callers can map it to the right variant.
pub fn duplicate_key_message(err: &mongodb::error::Error) -> Option<String> {
    if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we)) =
        &*err.kind
    {
        if we.code == 11000 {
            return Some(we.message.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(ServiceError::Validation("bad".into()).status_code(), 400);
        assert_eq!(ServiceError::DuplicateEmail.status_code(), 400);
        assert_eq!(ServiceError::DuplicatePhone.status_code(), 400);
        assert_eq!(ServiceError::UsernameTaken.status_code(), 400);
        assert_eq!(ServiceError::InvalidCredentials.status_code(), 401);
        assert_eq!(ServiceError::NotFound("Profile".into()).status_code(), 404);
        assert_eq!(ServiceError::Database("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_credentials_message_does_not_leak_cause() {
        // Same message whether the account is missing or the password is wrong
        assert_eq!(
            ServiceError::InvalidCredentials.to_string(),
            "Incorrect email or password"
        );
    }

    #[test]
    fn test_not_found_names_the_entity() {
        assert_eq!(
            ServiceError::NotFound("Profile".into()).to_string(),
            "Profile not found"
        );
    }
}
