use crate::services::links_service::{self, UpsertLinksRequest, UpsertLinksResponse};
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
    path = "/api/v1/links",
    tag = "Links",
    request_body = UpsertLinksRequest,
    responses(
        (status = 200, description = "Links saved", body = UpsertLinksResponse),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upsert_links(
    db: web::Data<MongoDB>,
    req: HttpRequest,
    request: web::Json<UpsertLinksRequest>,
) -> HttpResponse {
    log::info!("📝 POST /links");

    let Some(claims) = authenticated_claims(&req) else {
        return missing_token();
    };

    match links_service::upsert_links(&db, &claims.sub, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Links upsert failed for {}: {}", claims.sub, e);
            e.to_http_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/links",
    tag = "Links",
    responses(
        (status = 200, description = "Caller's links"),
        (status = 404, description = "Links not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_my_links(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("🔗 GET /links");

    let Some(claims) = authenticated_claims(&req) else {
        return missing_token();
    };

    match links_service::get_links(&db, &claims.sub).await {
        Ok(links) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "links": links
        })),
        Err(e) => e.to_http_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/links/{user_id}",
    tag = "Links",
    params(
        ("user_id" = String, Path, description = "Owning user id")
    ),
    responses(
        (status = 200, description = "Links for the given user"),
        (status = 404, description = "Links not found")
    )
)]
pub async fn get_links_by_user_id(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("🔗 GET /links/{}", user_id);

    if mongodb::bson::oid::ObjectId::parse_str(&user_id).is_err() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Invalid user ID"
        }));
    }

    match links_service::get_links(&db, &user_id).await {
        Ok(links) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "links": links
        })),
        Err(e) => e.to_http_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/links",
    tag = "Links",
    responses(
        (status = 200, description = "Links deleted"),
        (status = 404, description = "Links not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_links(db: web::Data<MongoDB>, req: HttpRequest) -> HttpResponse {
    log::info!("🗑️ DELETE /links");

    let Some(claims) = authenticated_claims(&req) else {
        return missing_token();
    };

    match links_service::delete_links(&db, &claims.sub).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Links deleted successfully"
        })),
        Err(e) => {
            log::warn!("❌ Links delete failed for {}: {}", claims.sub, e);
            e.to_http_response()
        }
    }
}
