// ==================== PROFILE MANAGEMENT ====================
// One profile per user, globally unique username, derived profile URL.
// The profile upsert is the only path that sets is_profile_complete and
// the profile delete is the only path that clears it.

use crate::{
    database::MongoDB,
    models::{profile_url_for, Profile, ProfileResponse, User},
    services::auth_service,
    utils::error::{duplicate_key_message, ServiceError},
    utils::validators,
};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpsertProfileRequest {
    pub username: String,
    pub organization_name: String,
    pub bio: String,
    pub location: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UpsertProfileResponse {
    pub success: bool,
    pub message: String,
    pub profile_url: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UsernameAvailabilityResponse {
    pub success: bool,
    pub username: String,
    pub available: bool,
    /// Set when the name is unavailable for a format reason rather than
    /// being taken - the dual signal callers rely on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Field validation for the profile upsert. Returns the lowercased
/// username ready for storage.
pub fn validate_profile(request: &UpsertProfileRequest) -> Result<String, ServiceError> {
    if !validators::validate_username(&request.username) {
        return Err(ServiceError::Validation(
            "Username must be 3-30 characters: letters, numbers, underscores, and hyphens"
                .to_string(),
        ));
    }
    let username = request.username.to_lowercase();

    if request.organization_name.trim().len() < 2 || request.organization_name.len() > 100 {
        return Err(ServiceError::Validation(
            "Organization name must be between 2 and 100 characters".to_string(),
        ));
    }

    if request.location.trim().len() < 2 || request.location.len() > 100 {
        return Err(ServiceError::Validation(
            "Location must be between 2 and 100 characters".to_string(),
        ));
    }

    if !validators::validate_bio(&request.bio) {
        return Err(ServiceError::Validation(
            "Bio cannot exceed 150 words".to_string(),
        ));
    }

    Ok(username)
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /profile - Creates or updates the caller's profile and flips the
/// owner's completion flag. Returns the derived profile URL.
pub async fn upsert_profile(
    db: &MongoDB,
    user_id: &str,
    request: &UpsertProfileRequest,
) -> Result<UpsertProfileResponse, ServiceError> {
    log::info!("📝 Upserting profile for user {}", user_id);

    // 1. The profile is keyed to an existing user
    let user = auth_service::get_user(db, user_id).await?;

    // 2. Normalize and validate fields
    let username = validate_profile(request)?;

    let collection = db.collection::<Profile>("profiles");

    // 3. Username uniqueness, excluding the caller's own profile so a
    //    self-rename to the same name stays an update, not a conflict
    let taken_by_other = collection
        .find_one(doc! { "username": &username, "user_id": { "$ne": user_id } })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;
    if taken_by_other.is_some() {
        return Err(ServiceError::UsernameTaken);
    }

    // 4. Derived URL - a pure function of the username, recomputed every save
    let profile_url = profile_url_for(&username);

    let existing = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

    let now = BsonDateTime::now();
    let profile = Profile {
        id: None,
        user_id: user_id.to_string(),
        username: username.clone(),
        organization_name: request.organization_name.trim().to_string(),
        bio: request.bio.clone(),
        location: request.location.trim().to_string(),
        profile_image: request.profile_image.clone(),
        profile_url: profile_url.clone(),
        created_at: existing.as_ref().map(|p| p.created_at).unwrap_or(now),
        updated_at: now,
    };

    // 5. Upsert keyed by user_id. A concurrent claim of the same username
    //    surfaces as a duplicate-key error from profiles(username).
    let message = match existing {
        Some(_) => {
            let update = doc! { "$set": mongodb::bson::to_document(&profile)
                .map_err(|e| ServiceError::Database(e.to_string()))? };
            collection
                .update_one(doc! { "user_id": user_id }, update)
                .await
                .map_err(map_profile_write_error)?;
            "Profile updated successfully"
        }
        None => {
            collection
                .insert_one(&profile)
                .await
                .map_err(map_profile_write_error)?;
            "Profile created successfully"
        }
    };

    // 6. Completion flag side effect - not atomic with the write above;
    //    a failure here surfaces as a 500 and leaves the flag stale
    let user_oid = user
        .id
        .ok_or_else(|| ServiceError::Database("Stored user has no id".to_string()))?;
    db.collection::<User>("users")
        .update_one(
            doc! { "_id": user_oid },
            doc! { "$set": { "is_profile_complete": true } },
        )
        .await
        .map_err(|e| ServiceError::Database(format!("Failed to update completion flag: {}", e)))?;

    log::info!("✅ {} for user {} ({})", message, user_id, profile_url);

    Ok(UpsertProfileResponse {
        success: true,
        message: message.to_string(),
        profile_url,
    })
}

fn map_profile_write_error(e: mongodb::error::Error) -> ServiceError {
    match duplicate_key_message(&e) {
        Some(msg) if msg.contains("username") => ServiceError::UsernameTaken,
        _ => ServiceError::Database(format!("Failed to save profile: {}", e)),
    }
}

/// GET /profile - Fetches a profile by the owning user id
pub async fn get_profile(db: &MongoDB, user_id: &str) -> Result<ProfileResponse, ServiceError> {
    let profile = db
        .collection::<Profile>("profiles")
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?
        .ok_or_else(|| ServiceError::NotFound("Profile".to_string()))?;

    Ok(ProfileResponse::from(&profile))
}

/// GET /profile/username/{username} - Public lookup by username
pub async fn get_profile_by_username(
    db: &MongoDB,
    username: &str,
) -> Result<ProfileResponse, ServiceError> {
    let profile = find_profile_by_username(db, username)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Profile".to_string()))?;

    Ok(ProfileResponse::from(&profile))
}

/// Raw lookup shared with the public resolver.
pub async fn find_profile_by_username(
    db: &MongoDB,
    username: &str,
) -> Result<Option<Profile>, ServiceError> {
    db.collection::<Profile>("profiles")
        .find_one(doc! { "username": username.to_lowercase() })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))
}

/// GET /profile/check-username/{username} - Availability probe. A name
/// that fails format validation reports unavailable together with the
/// format message instead of a bare boolean.
pub async fn check_username_availability(
    db: &MongoDB,
    username: &str,
) -> Result<UsernameAvailabilityResponse, ServiceError> {
    let lowercased = username.to_lowercase();

    if !validators::validate_username(&lowercased) {
        return Ok(UsernameAvailabilityResponse {
            success: true,
            username: lowercased,
            available: false,
            message: Some(
                "Username must be 3-30 characters: letters, numbers, underscores, and hyphens"
                    .to_string(),
            ),
        });
    }

    let existing = db
        .collection::<Profile>("profiles")
        .find_one(doc! { "username": &lowercased })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

    Ok(UsernameAvailabilityResponse {
        success: true,
        username: lowercased,
        available: existing.is_none(),
        message: None,
    })
}

/// DELETE /profile - Removes the profile and clears the owner's
/// completion flag (Complete -> Incomplete transition).
pub async fn delete_profile(db: &MongoDB, user_id: &str) -> Result<(), ServiceError> {
    log::info!("🗑️  Deleting profile for user {}", user_id);

    let result = db
        .collection::<Profile>("profiles")
        .delete_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

    if result.deleted_count == 0 {
        return Err(ServiceError::NotFound("Profile".to_string()));
    }

    if let Ok(oid) = ObjectId::parse_str(user_id) {
        db.collection::<User>("users")
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "is_profile_complete": false } },
            )
            .await
            .map_err(|e| {
                ServiceError::Database(format!("Failed to clear completion flag: {}", e))
            })?;
    }

    log::info!("✅ Profile deleted for user {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_request(username: &str) -> UpsertProfileRequest {
        UpsertProfileRequest {
            username: username.to_string(),
            organization_name: "Acme Corp".to_string(),
            bio: "Building digital business cards.".to_string(),
            location: "Lisbon".to_string(),
            profile_image: None,
        }
    }

    #[test]
    fn test_validate_profile_lowercases_username() {
        assert_eq!(validate_profile(&profile_request("JoeDoe")).unwrap(), "joedoe");
    }

    #[test]
    fn test_validate_profile_rejects_bad_fields() {
        assert!(validate_profile(&profile_request("ab")).is_err());
        assert!(validate_profile(&profile_request("a!b")).is_err());

        let mut request = profile_request("joedoe");
        request.organization_name = "A".to_string();
        assert!(validate_profile(&request).is_err());

        let mut request = profile_request("joedoe");
        request.location = "X".to_string();
        assert!(validate_profile(&request).is_err());

        let mut request = profile_request("joedoe");
        request.bio = vec!["word"; 151].join(" ");
        assert!(validate_profile(&request).is_err());
    }

    mod with_database {
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
                full_name: "Profile Tester".to_string(),
                email: format!("profile.{}@example.com", suffix),
                phone_number: format!("+18{:09}", digits),
                password: "supersecret".to_string(),
                confirm_password: "supersecret".to_string(),
            };
            auth_service::register(db, &request).await.unwrap().user_id
        }

        fn unique_username() -> String {
            // Usernames cap at 30 chars; an ObjectId hex is 24
            format!("u-{}", &ObjectId::new().to_hex()[..20])
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_username_conflict_and_self_rename() {
            let db = test_db().await;
            let user_a = register_test_user(&db).await;
            let user_b = register_test_user(&db).await;
            let username = unique_username();

            // A claims the name
            let response = upsert_profile(&db, &user_a, &profile_request(&username))
                .await
                .unwrap();
            assert_eq!(response.profile_url, format!("tapzx.app/{}", username));

            // B cannot take it
            assert_eq!(
                upsert_profile(&db, &user_b, &profile_request(&username))
                    .await
                    .unwrap_err(),
                ServiceError::UsernameTaken
            );

            // A re-saving the same name is an update, not a conflict
            assert!(upsert_profile(&db, &user_a, &profile_request(&username))
                .await
                .is_ok());
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_profile_url_follows_username_change() {
            let db = test_db().await;
            let user_id = register_test_user(&db).await;

            upsert_profile(&db, &user_id, &profile_request(&unique_username()))
                .await
                .unwrap();

            let renamed = unique_username();
            let response = upsert_profile(&db, &user_id, &profile_request(&renamed))
                .await
                .unwrap();
            assert_eq!(response.profile_url, format!("tapzx.app/{}", renamed));

            let profile = get_profile(&db, &user_id).await.unwrap();
            assert_eq!(profile.username, renamed);
            assert_eq!(profile.profile_url, format!("tapzx.app/{}", renamed));
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_completion_flag_lifecycle() {
            let db = test_db().await;
            let user_id = register_test_user(&db).await;

            let user = auth_service::get_user(&db, &user_id).await.unwrap();
            assert!(!user.is_profile_complete);

            upsert_profile(&db, &user_id, &profile_request(&unique_username()))
                .await
                .unwrap();
            let user = auth_service::get_user(&db, &user_id).await.unwrap();
            assert!(user.is_profile_complete);

            delete_profile(&db, &user_id).await.unwrap();
            let user = auth_service::get_user(&db, &user_id).await.unwrap();
            assert!(!user.is_profile_complete);

            // Re-creating flips it back
            upsert_profile(&db, &user_id, &profile_request(&unique_username()))
                .await
                .unwrap();
            let user = auth_service::get_user(&db, &user_id).await.unwrap();
            assert!(user.is_profile_complete);
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_availability_dual_signal() {
            let db = test_db().await;

            // Format-invalid: unavailable with a message, not a bare boolean
            let bad = check_username_availability(&db, "a!").await.unwrap();
            assert!(!bad.available);
            assert!(bad.message.is_some());

            // Unclaimed valid name: available
            let free = check_username_availability(&db, &unique_username())
                .await
                .unwrap();
            assert!(free.available);
            assert!(free.message.is_none());

            // Claimed name: unavailable
            let user_id = register_test_user(&db).await;
            let username = unique_username();
            upsert_profile(&db, &user_id, &profile_request(&username))
                .await
                .unwrap();
            let taken = check_username_availability(&db, &username).await.unwrap();
            assert!(!taken.available);
        }
    }
}
