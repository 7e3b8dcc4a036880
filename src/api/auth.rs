use crate::services::auth_service::{AuthResponse, SigninRequest, SignupRequest};
use crate::{database::MongoDB, middleware::auth::authenticated_claims, services::auth_service};
use actix_web::{web, HttpRequest, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error or duplicate email/phone")
    )
)]
pub async fn signup(db: web::Data<MongoDB>, request: web::Json<SignupRequest>) -> HttpResponse {
    log::info!("📝 POST /auth/signup - email: {}", request.email);

    match auth_service::register(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Signup successful: {}", request.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {}", request.email, e);
            e.to_http_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    tag = "Auth",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn signin(db: web::Data<MongoDB>, request: web::Json<SigninRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/signin - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Signin successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Signin failed: {} - {}", request.email, e);
            e.to_http_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verify-token",
    tag = "Auth",
    responses(
        (status = 200, description = "Token verdict, valid or not")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify_token(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("✓ POST /auth/verify-token");

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "));

    if let Some(token) = token {
        if let Ok(claims) = auth_service::verify_token(token) {
            // Surface the completion flag alongside the verdict so the
            // app can route straight to onboarding
            if let Ok(user) = auth_service::get_current_user(&db, &claims.sub).await {
                return HttpResponse::Ok().json(serde_json::json!({
                    "valid": true,
                    "user_id": user.id,
                    "email": user.email,
                    "is_profile_complete": user.is_profile_complete
                }));
            }
        }
    }

    HttpResponse::Ok().json(serde_json::json!({ "valid": false }))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user information"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("👤 GET /auth/me");

    let Some(claims) = authenticated_claims(&req) else {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "error": "Missing authorization token"
        }));
    };

    match auth_service::get_current_user(&db, &claims.sub).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": user
        })),
        Err(e) => {
            log::error!("❌ Failed to get user {}: {}", claims.sub, e);
            e.to_http_response()
        }
    }
}
