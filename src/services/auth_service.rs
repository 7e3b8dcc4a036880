use crate::{
    database::MongoDB,
    models::{User, UserResponse},
    utils::error::{duplicate_key_message, ServiceError},
    utils::validators,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user_id (hex)
    pub email: String,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
    pub access_token: String,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_profile_complete: Option<bool>,
}

// Type aliases for API documentation
pub type SignupResponse = AuthResponse;
pub type SigninResponse = AuthResponse;

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tapzx-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "tapzx-api".to_string())
}

fn get_token_expire_minutes() -> i64 {
    std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30)
}

// Generate JWT access token
pub fn generate_jwt(user_id: &str, email: &str) -> Result<String, ServiceError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::minutes(get_token_expire_minutes())).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| ServiceError::Database(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Field validation for signup. Returns the normalized (lowercased email,
/// cleaned phone) pair ready for storage.
pub fn validate_signup(request: &SignupRequest) -> Result<(String, String), ServiceError> {
    if request.full_name.trim().len() < 2 || request.full_name.len() > 100 {
        return Err(ServiceError::Validation(
            "Full name must be between 2 and 100 characters".to_string(),
        ));
    }

    let email = request.email.trim().to_lowercase();
    if !validators::validate_email(&email) {
        return Err(ServiceError::Validation("Invalid email format".to_string()));
    }

    let phone = validators::normalize_phone(&request.phone_number);
    if !validators::validate_phone(&phone) {
        return Err(ServiceError::Validation(
            "Invalid phone number format".to_string(),
        ));
    }

    if request.password.len() < 8 {
        return Err(ServiceError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if request.password != request.confirm_password {
        return Err(ServiceError::Validation(
            "Passwords do not match".to_string(),
        ));
    }

    Ok((email, phone))
}

// User registration
pub async fn register(db: &MongoDB, request: &SignupRequest) -> Result<AuthResponse, ServiceError> {
    let (email, phone) = validate_signup(request)?;

    let collection = db.collection::<User>("users");

    // Pre-checks for friendly messages; the unique indexes remain the
    // authoritative enforcement on the insert below.
    if collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?
        .is_some()
    {
        return Err(ServiceError::DuplicateEmail);
    }

    if collection
        .find_one(doc! { "phone_number": &phone })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?
        .is_some()
    {
        return Err(ServiceError::DuplicatePhone);
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| ServiceError::Database(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        id: None,
        full_name: request.full_name.trim().to_string(),
        email: email.clone(),
        phone_number: phone,
        password_hash,
        created_at: BsonDateTime::now(),
        is_profile_complete: false,
    };

    let insert_result = collection.insert_one(&new_user).await.map_err(|e| {
        // A concurrent signup may slip past the pre-checks; the index
        // violation tells us which field collided.
        match duplicate_key_message(&e) {
            Some(msg) if msg.contains("phone_number") => ServiceError::DuplicatePhone,
            Some(_) => ServiceError::DuplicateEmail,
            None => ServiceError::Database(format!("Failed to create user: {}", e)),
        }
    })?;

    let user_id = insert_result
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .ok_or_else(|| ServiceError::Database("Insert returned no ObjectId".to_string()))?;

    let access_token = generate_jwt(&user_id, &email)?;

    log::info!("✅ User registered successfully: {}", email);

    Ok(AuthResponse {
        success: true,
        message: "User created successfully".to_string(),
        user_id,
        access_token,
        token_type: "bearer".to_string(),
        is_profile_complete: None,
    })
}

// User login
pub async fn login(db: &MongoDB, request: &SigninRequest) -> Result<AuthResponse, ServiceError> {
    let collection = db.collection::<User>("users");

    let email = request.email.trim().to_lowercase();

    let user = collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?
        // Missing account and wrong password collapse to the same error
        .ok_or(ServiceError::InvalidCredentials)?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| ServiceError::Database(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(ServiceError::InvalidCredentials);
    }

    let user_id = user
        .id
        .map(|oid| oid.to_hex())
        .ok_or_else(|| ServiceError::Database("Stored user has no id".to_string()))?;

    let access_token = generate_jwt(&user_id, &user.email)?;

    Ok(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user_id,
        access_token,
        token_type: "bearer".to_string(),
        is_profile_complete: Some(user.is_profile_complete),
    })
}

/// Point lookup by id. Shared by the other stores for the
/// "user must exist" precondition.
pub async fn get_user(db: &MongoDB, user_id: &str) -> Result<User, ServiceError> {
    let oid = ObjectId::parse_str(user_id)
        .map_err(|_| ServiceError::Validation("Invalid user ID".to_string()))?;

    db.collection::<User>("users")
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?
        .ok_or_else(|| ServiceError::NotFound("User".to_string()))
}

// Get current user info (no hash)
pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<UserResponse, ServiceError> {
    let user = get_user(db, user_id).await?;
    Ok(UserResponse::from(&user))
}

/// Delete the account and everything keyed to it (links, profile, user).
pub async fn delete_user_account(db: &MongoDB, user_id: &str) -> Result<(), ServiceError> {
    log::info!("🗑️ Deleting account for user_id: {}", user_id);

    let oid = ObjectId::parse_str(user_id)
        .map_err(|_| ServiceError::Validation("Invalid user ID".to_string()))?;

    let links = db.collection::<mongodb::bson::Document>("links");
    links
        .delete_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(format!("Failed to delete links: {}", e)))?;

    let profiles = db.collection::<mongodb::bson::Document>("profiles");
    profiles
        .delete_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(format!("Failed to delete profile: {}", e)))?;

    let users = db.collection::<User>("users");
    let result = users
        .delete_one(doc! { "_id": oid })
        .await
        .map_err(|e| ServiceError::Database(format!("Failed to delete user: {}", e)))?;

    if result.deleted_count == 0 {
        log::warn!("⚠️ User {} not found in database", user_id);
        return Err(ServiceError::NotFound("User".to_string()));
    }

    log::info!("🎉 Account and all data successfully deleted for user {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_request() -> SignupRequest {
        SignupRequest {
            full_name: "Joe Doe".to_string(),
            email: "Joe@Example.com".to_string(),
            phone_number: "+1 (555) 123-4567".to_string(),
            password: "supersecret".to_string(),
            confirm_password: "supersecret".to_string(),
        }
    }

    #[test]
    fn test_signup_normalizes_email_and_phone() {
        let (email, phone) = validate_signup(&signup_request()).unwrap();
        assert_eq!(email, "joe@example.com");
        assert_eq!(phone, "+15551234567");
    }

    #[test]
    fn test_signup_rejects_short_password() {
        let mut request = signup_request();
        request.password = "short".to_string();
        request.confirm_password = "short".to_string();
        assert!(matches!(
            validate_signup(&request),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_signup_rejects_password_mismatch() {
        let mut request = signup_request();
        request.confirm_password = "different1".to_string();
        assert!(matches!(
            validate_signup(&request),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_signup_rejects_bad_email_and_name() {
        let mut request = signup_request();
        request.email = "not-an-email".to_string();
        assert!(validate_signup(&request).is_err());

        let mut request = signup_request();
        request.full_name = "J".to_string();
        assert!(validate_signup(&request).is_err());
    }

    #[test]
    fn test_jwt_round_trip() {
        let user_id = ObjectId::new().to_hex();
        let token = generate_jwt(&user_id, "joe@example.com").unwrap();

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "joe@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = generate_jwt(&ObjectId::new().to_hex(), "joe@example.com").unwrap();
        let tampered = format!("{}x", token);
        assert!(verify_token(&tampered).is_err());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_register_duplicate_email_different_casing() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/tapzx_test".to_string());
        let db = crate::database::MongoDB::new(&uri).await.unwrap();

        // Unique email/phone per run - the collection persists between runs
        let suffix = ObjectId::new().to_hex();
        let digits = Utc::now().timestamp_micros() % 1_000_000_000;

        let mut first = signup_request();
        first.email = format!("A.{}@b.com", suffix);
        first.phone_number = format!("+15{:09}", digits);
        register(&db, &first).await.unwrap();

        let mut second = signup_request();
        second.email = format!("a.{}@b.com", suffix);
        second.phone_number = format!("+16{:09}", digits);
        assert_eq!(
            register(&db, &second).await.unwrap_err(),
            ServiceError::DuplicateEmail
        );
    }
}
