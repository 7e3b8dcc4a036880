use crate::services::profile_service::{self, UpsertProfileRequest, UpsertProfileResponse};
use crate::{database::MongoDB, middleware::auth::authenticated_claims};
use actix_web::{web, HttpRequest, HttpResponse};

fn missing_token() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "success": false,
        "error": "Missing authorization token"
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile",
    tag = "Profile",
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile saved, returns the derived profile URL", body = UpsertProfileResponse),
        (status = 400, description = "Validation error or username taken"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upsert_profile(
    db: web::Data<MongoDB>,
    req: HttpRequest,
    request: web::Json<UpsertProfileRequest>,
) -> HttpResponse {
    log::info!("📝 POST /profile - username: {}", request.username);

    let Some(claims) = authenticated_claims(&req) else {
        return missing_token();
    };

    match profile_service::upsert_profile(&db, &claims.sub, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Profile upsert failed for {}: {}", claims.sub, e);
            e.to_http_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Caller's profile"),
        (status = 404, description = "Profile not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_my_profile(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("👤 GET /profile");

    let Some(claims) = authenticated_claims(&req) else {
        return missing_token();
    };

    match profile_service::get_profile(&db, &claims.sub).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": profile
        })),
        Err(e) => e.to_http_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/username/{username}",
    tag = "Profile",
    params(
        ("username" = String, Path, description = "Public username, case-insensitive")
    ),
    responses(
        (status = 200, description = "Profile for the given username"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile_by_username(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let username = path.into_inner();
    log::info!("🔍 GET /profile/username/{}", username);

    match profile_service::get_profile_by_username(&db, &username).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": profile
        })),
        Err(e) => e.to_http_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/check-username/{username}",
    tag = "Profile",
    params(
        ("username" = String, Path, description = "Candidate username")
    ),
    responses(
        (status = 200, description = "Availability verdict; format-invalid names carry a message")
    )
)]
pub async fn check_username(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let username = path.into_inner();
    log::info!("🔍 GET /profile/check-username/{}", username);

    match profile_service::check_username_availability(&db, &username).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/{user_id}",
    tag = "Profile",
    params(
        ("user_id" = String, Path, description = "Owning user id")
    ),
    responses(
        (status = 200, description = "Profile for the given user"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile_by_user_id(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("👤 GET /profile/{}", user_id);

    if mongodb::bson::oid::ObjectId::parse_str(&user_id).is_err() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Invalid user ID"
        }));
    }

    match profile_service::get_profile(&db, &user_id).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": profile
        })),
        Err(e) => e.to_http_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Profile deleted, completion flag cleared"),
        (status = 404, description = "Profile not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_profile(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("🗑️ DELETE /profile");

    let Some(claims) = authenticated_claims(&req) else {
        return missing_token();
    };

    match profile_service::delete_profile(&db, &claims.sub).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Profile deleted successfully"
        })),
        Err(e) => {
            log::warn!("❌ Profile delete failed for {}: {}", claims.sub, e);
            e.to_http_response()
        }
    }
}
