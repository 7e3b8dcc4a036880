use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Document in the "users" collection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub full_name: String,
    /// Unique, stored lowercased
    pub email: String,
    /// Unique, normalized to digits and an optional leading `+`
    pub phone_number: String,
    /// bcrypt hash - the plaintext is never persisted
    pub password_hash: String,
    pub created_at: BsonDateTime,
    /// True exactly while a profile exists for this user
    #[serde(default)]
    pub is_profile_complete: bool,
}

/// User shape surfaced over HTTP (never includes the hash)
#[derive(Debug, Serialize, Clone, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: String,
    pub is_profile_complete: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            created_at: user
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            is_profile_complete: user.is_profile_complete,
        }
    }
}
