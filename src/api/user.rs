use crate::services::user_service::{self, CompleteUserProfile};
use crate::{
    database::MongoDB,
    middleware::auth::authenticated_claims,
    services::auth_service,
};
use actix_web::{web, HttpRequest, HttpResponse};

fn missing_token() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "success": false,
        "error": "Missing authorization token"
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/complete-profile",
    tag = "User",
    responses(
        (status = 200, description = "User with optional links and profile", body = CompleteUserProfile),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_complete_profile(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("👤 GET /user/complete-profile");

    let Some(claims) = authenticated_claims(&req) else {
        return missing_token();
    };

    match user_service::resolve_complete(&db, &claims.sub).await {
        Ok(composite) => HttpResponse::Ok().json(composite),
        Err(e) => {
            log::error!("❌ Complete profile failed for {}: {}", claims.sub, e);
            e.to_http_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/user/public/username/{username}",
    tag = "User",
    params(
        ("username" = String, Path, description = "Public username, case-insensitive")
    ),
    responses(
        (status = 200, description = "Public card data", body = CompleteUserProfile),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_public_profile_by_username(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let username = path.into_inner();
    log::info!("🌐 GET /user/public/username/{}", username);

    match user_service::resolve_by_username(&db, &username).await {
        Ok(composite) => HttpResponse::Ok().json(composite),
        Err(e) => e.to_http_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/user/public/{user_id}",
    tag = "User",
    params(
        ("user_id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Public card data", body = CompleteUserProfile),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_public_profile(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("🌐 GET /user/public/{}", user_id);

    match user_service::resolve_complete(&db, &user_id).await {
        Ok(composite) => HttpResponse::Ok().json(composite),
        Err(e) => e.to_http_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/user/account",
    tag = "User",
    responses(
        (status = 200, description = "Account and all associated data deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_account(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("🗑️ DELETE /user/account");

    let Some(claims) = authenticated_claims(&req) else {
        return missing_token();
    };

    match auth_service::delete_user_account(&db, &claims.sub).await {
        Ok(()) => {
            log::info!("✅ Account deleted successfully: {}", claims.sub);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Account deleted successfully"
            }))
        }
        Err(e) => {
            log::error!("❌ Failed to delete account {}: {}", claims.sub, e);
            e.to_http_response()
        }
    }
}
