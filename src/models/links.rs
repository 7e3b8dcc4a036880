use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Document in the "links" collection. At most one per user - every save
/// replaces the whole set of optional fields, omitted ones included.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Links {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Unique back-reference to the owning user (lookup key, not ownership)
    pub user_id: String,
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
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

#[derive(Debug, Serialize, Clone, utoipa::ToSchema)]
pub struct LinksResponse {
    pub id: String,
    pub user_id: String,
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
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Links> for LinksResponse {
    fn from(links: &Links) -> Self {
        LinksResponse {
            id: links.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            user_id: links.user_id.clone(),
            website: links.website.clone(),
            email: links.email.clone(),
            phone: links.phone.clone(),
            whatsapp: links.whatsapp.clone(),
            instagram: links.instagram.clone(),
            twitter: links.twitter.clone(),
            linkedin: links.linkedin.clone(),
            facebook: links.facebook.clone(),
            youtube: links.youtube.clone(),
            tiktok: links.tiktok.clone(),
            github: links.github.clone(),
            discord: links.discord.clone(),
            created_at: links
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            updated_at: links
                .updated_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}
