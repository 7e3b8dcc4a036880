// ==================== LINKS MANAGEMENT ====================
// One optional link-set per user. Every save replaces the whole record:
// fields omitted from the request are stored as null, not merged.

use crate::{
    database::MongoDB,
    models::{Links, LinksResponse},
    services::auth_service,
    utils::error::ServiceError,
};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, Default, utoipa::ToSchema)]
pub struct UpsertLinksRequest {
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub facebook: Option<String>,
    pub youtube: Option<String>,
    pub tiktok: Option<String>,
    pub github: Option<String>,
    pub discord: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UpsertLinksResponse {
    pub success: bool,
    pub message: String,
    pub links: LinksResponse,
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /links - Creates or fully replaces the caller's link-set
pub async fn upsert_links(
    db: &MongoDB,
    user_id: &str,
    request: &UpsertLinksRequest,
) -> Result<UpsertLinksResponse, ServiceError> {
    log::info!("📝 Upserting links for user {}", user_id);

    // The link-set is keyed to an existing user
    auth_service::get_user(db, user_id).await?;

    let collection = db.collection::<Links>("links");

    let existing = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

    let now = BsonDateTime::now();
    // id stays None so the $set document never touches the immutable _id
    let links = Links {
        id: None,
        user_id: user_id.to_string(),
        website: request.website.clone(),
        email: request.email.clone(),
        phone: request.phone.clone(),
        whatsapp: request.whatsapp.clone(),
        instagram: request.instagram.clone(),
        twitter: request.twitter.clone(),
        linkedin: request.linkedin.clone(),
        facebook: request.facebook.clone(),
        youtube: request.youtube.clone(),
        tiktok: request.tiktok.clone(),
        github: request.github.clone(),
        discord: request.discord.clone(),
        created_at: existing.as_ref().map(|l| l.created_at).unwrap_or(now),
        updated_at: now,
    };

    let message = match existing {
        Some(_) => {
            // Full-field replace keeps one record per user; a save with
            // omitted fields wipes the previous values on purpose.
            let update = doc! { "$set": mongodb::bson::to_document(&links)
                .map_err(|e| ServiceError::Database(e.to_string()))? };
            collection
                .update_one(doc! { "user_id": user_id }, update)
                .await
                .map_err(|e| ServiceError::Database(format!("Failed to update links: {}", e)))?;
            "Links updated successfully"
        }
        None => {
            collection
                .insert_one(&links)
                .await
                .map_err(|e| ServiceError::Database(format!("Failed to create links: {}", e)))?;
            "Links created successfully"
        }
    };

    log::info!("✅ {} for user {}", message, user_id);

    // Re-read so the response carries the store-generated id
    let saved = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?
        .ok_or_else(|| ServiceError::Database("Links vanished after upsert".to_string()))?;

    Ok(UpsertLinksResponse {
        success: true,
        message: message.to_string(),
        links: LinksResponse::from(&saved),
    })
}

/// GET /links - Fetches the link-set for a user
pub async fn get_links(db: &MongoDB, user_id: &str) -> Result<LinksResponse, ServiceError> {
    let collection = db.collection::<Links>("links");

    let links = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?
        .ok_or_else(|| ServiceError::NotFound("Links".to_string()))?;

    Ok(LinksResponse::from(&links))
}

/// DELETE /links - Removes the caller's link-set
pub async fn delete_links(db: &MongoDB, user_id: &str) -> Result<(), ServiceError> {
    log::info!("🗑️  Deleting links for user {}", user_id);

    let collection = db.collection::<Links>("links");

    let result = collection
        .delete_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

    if result.deleted_count == 0 {
        return Err(ServiceError::NotFound("Links".to_string()));
    }

    log::info!("✅ Links deleted for user {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/tapzx_test".to_string());
        MongoDB::new(&uri).await.unwrap()
    }

    async fn register_test_user(db: &MongoDB) -> String {
        let suffix = ObjectId::new().to_hex();
        let digits = chrono::Utc::now().timestamp_micros() % 1_000_000_000;
        let request = auth_service::SignupRequest {
            full_name: "Links Tester".to_string(),
            email: format!("links.{}@example.com", suffix),
            phone_number: format!("+17{:09}", digits),
            password: "supersecret".to_string(),
            confirm_password: "supersecret".to_string(),
        };
        auth_service::register(db, &request).await.unwrap().user_id
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_second_save_overwrites_omitted_fields() {
        let db = test_db().await;
        let user_id = register_test_user(&db).await;

        let first = UpsertLinksRequest {
            website: Some("https://example.com".to_string()),
            github: Some("joedoe".to_string()),
            ..Default::default()
        };
        upsert_links(&db, &user_id, &first).await.unwrap();

        // Second save omits github - it must not carry forward
        let second = UpsertLinksRequest {
            website: Some("https://example.org".to_string()),
            ..Default::default()
        };
        let response = upsert_links(&db, &user_id, &second).await.unwrap();

        assert_eq!(response.links.website.as_deref(), Some("https://example.org"));
        assert_eq!(response.links.github, None);

        // Still exactly one record
        let count = db
            .collection::<Links>("links")
            .count_documents(doc! { "user_id": &user_id })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_upsert_requires_existing_user() {
        let db = test_db().await;
        let ghost = ObjectId::new().to_hex();

        let result = upsert_links(&db, &ghost, &UpsertLinksRequest::default()).await;
        assert_eq!(result.unwrap_err(), ServiceError::NotFound("User".to_string()));
    }
}
