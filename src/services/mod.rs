pub mod auth_service;
pub mod links_service;
pub mod profile_service;
pub mod user_service;
