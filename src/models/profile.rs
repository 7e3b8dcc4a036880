use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Base of every derived profile URL.
pub const PROFILE_URL_BASE: &str = "tapzx.app";

/// Document in the "profiles" collection. One per user; `username` is
/// unique across all profiles and always stored lowercased.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Profile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Unique back-reference to the owning user
    pub user_id: String,
    pub username: String,
    pub organization_name: String,
    pub bio: String,
    pub location: String,
    pub profile_image: Option<String>,
    /// Always `tapzx.app/{username}` - recomputed on every save, never
    /// stored inconsistently with `username`
    pub profile_url: String,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

/// Derives the public URL from a (lowercased) username.
pub fn profile_url_for(username: &str) -> String {
    format!("{}/{}", PROFILE_URL_BASE, username)
}

#[derive(Debug, Serialize, Clone, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub organization_name: String,
    pub bio: String,
    pub location: String,
    pub profile_image: Option<String>,
    pub profile_url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        ProfileResponse {
            id: profile.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            user_id: profile.user_id.clone(),
            username: profile.username.clone(),
            organization_name: profile.organization_name.clone(),
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            profile_image: profile.profile_image.clone(),
            profile_url: profile.profile_url.clone(),
            created_at: profile
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            updated_at: profile
                .updated_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_is_pure_function_of_username() {
        assert_eq!(profile_url_for("joe"), "tapzx.app/joe");
        assert_eq!(profile_url_for("joe_doe-99"), "tapzx.app/joe_doe-99");
    }
}
