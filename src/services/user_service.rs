// ==================== PUBLIC RESOLVER ====================
// Read-only composition of user + profile + links for the public card
// page and the authenticated "my full data" view. Never mutates.

use crate::{
    database::MongoDB,
    models::{Links, LinksResponse, Profile, ProfileResponse, UserResponse},
    services::{auth_service, profile_service},
    utils::error::ServiceError,
};
use mongodb::bson::doc;
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CompleteUserProfile {
    pub success: bool,
    pub user: UserResponse,
    pub links: Option<LinksResponse>,
    pub profile: Option<ProfileResponse>,
}

async fn find_links(db: &MongoDB, user_id: &str) -> Result<Option<Links>, ServiceError> {
    db.collection::<Links>("links")
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))
}

async fn find_profile(db: &MongoDB, user_id: &str) -> Result<Option<Profile>, ServiceError> {
    db.collection::<Profile>("profiles")
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))
}

/// Composite keyed by user id. Links and profile are independently
/// optional - a fresh user has neither.
pub async fn resolve_complete(
    db: &MongoDB,
    user_id: &str,
) -> Result<CompleteUserProfile, ServiceError> {
    let user = auth_service::get_user(db, user_id).await?;

    let links = find_links(db, user_id).await?;
    let profile = find_profile(db, user_id).await?;

    Ok(CompleteUserProfile {
        success: true,
        user: UserResponse::from(&user),
        links: links.as_ref().map(LinksResponse::from),
        profile: profile.as_ref().map(ProfileResponse::from),
    })
}

/// Composite keyed by username: the public card page. A profile whose
/// user_id no longer resolves is an internal-consistency fault, not a
/// client 404.
pub async fn resolve_by_username(
    db: &MongoDB,
    username: &str,
) -> Result<CompleteUserProfile, ServiceError> {
    let profile = profile_service::find_profile_by_username(db, username)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Profile".to_string()))?;

    let user = match auth_service::get_user(db, &profile.user_id).await {
        Ok(user) => user,
        Err(ServiceError::NotFound(_)) | Err(ServiceError::Validation(_)) => {
            log::error!(
                "❌ Profile '{}' references missing user {}",
                profile.username,
                profile.user_id
            );
            return Err(ServiceError::Database(format!(
                "Dangling user reference for profile '{}'",
                profile.username
            )));
        }
        Err(e) => return Err(e),
    };

    let links = find_links(db, &profile.user_id).await?;

    Ok(CompleteUserProfile {
        success: true,
        user: UserResponse::from(&user),
        links: links.as_ref().map(LinksResponse::from),
        profile: Some(ProfileResponse::from(&profile)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::links_service::{self, UpsertLinksRequest};
    use crate::services::profile_service::UpsertProfileRequest;
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
            full_name: "Resolver Tester".to_string(),
            email: format!("resolver.{}@example.com", suffix),
            phone_number: format!("+19{:09}", digits),
            password: "supersecret".to_string(),
            confirm_password: "supersecret".to_string(),
        };
        auth_service::register(db, &request).await.unwrap().user_id
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_resolve_complete_with_neither_links_nor_profile() {
        let db = test_db().await;
        let user_id = register_test_user(&db).await;

        let composite = resolve_complete(&db, &user_id).await.unwrap();
        assert_eq!(composite.user.id, user_id);
        assert!(composite.links.is_none());
        assert!(composite.profile.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_resolve_by_username_composes_all_three() {
        let db = test_db().await;
        let user_id = register_test_user(&db).await;
        let username = format!("r-{}", &ObjectId::new().to_hex()[..20]);

        crate::services::profile_service::upsert_profile(
            &db,
            &user_id,
            &UpsertProfileRequest {
                username: username.clone(),
                organization_name: "Acme Corp".to_string(),
                bio: "Cards.".to_string(),
                location: "Lisbon".to_string(),
                profile_image: None,
            },
        )
        .await
        .unwrap();

        links_service::upsert_links(
            &db,
            &user_id,
            &UpsertLinksRequest {
                github: Some("joedoe".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // Mixed-case lookup resolves the lowercased name
        let composite = resolve_by_username(&db, &username.to_uppercase())
            .await
            .unwrap();
        assert_eq!(composite.user.id, user_id);
        assert_eq!(
            composite.profile.as_ref().unwrap().profile_url,
            format!("tapzx.app/{}", username)
        );
        assert_eq!(
            composite.links.as_ref().unwrap().github.as_deref(),
            Some("joedoe")
        );
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_unknown_username_is_not_found() {
        let db = test_db().await;
        let ghost = format!("g-{}", &ObjectId::new().to_hex()[..20]);

        assert_eq!(
            resolve_by_username(&db, &ghost).await.unwrap_err(),
            ServiceError::NotFound("Profile".to_string())
        );
    }
}
