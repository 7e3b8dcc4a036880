mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Tapzx Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection (owns open/close for the process;
    // unique indexes are created here before any request is served)
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000") // Frontend Web (Expo)
            .allowed_origin("http://localhost:8081")
            .allowed_origin("http://localhost:19006")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://127.0.0.1:8081")
            .allowed_origin("http://127.0.0.1:19006")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth endpoints
            .service(
                web::scope("/api/v1/auth")
                    .route("/signup", web::post().to(api::auth::signup))
                    .route("/signin", web::post().to(api::auth::signin))
                    .route("/verify-token", web::post().to(api::auth::verify_token))
                    .service(
                        web::resource("/me")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::auth::get_me)),
                    ),
            )
            // Links: one record per user, public read by user id
            .service(
                web::scope("/api/v1/links")
                    .service(
                        web::resource("")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::post().to(api::links::upsert_links))
                            .route(web::get().to(api::links::get_my_links))
                            .route(web::delete().to(api::links::delete_links)),
                    )
                    // MUST stay last (catch-all)
                    .route("/{user_id}", web::get().to(api::links::get_links_by_user_id)),
            )
            // Profile: unique username, derived URL, completion flag
            .service(
                web::scope("/api/v1/profile")
                    .service(
                        web::resource("")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::post().to(api::profile::upsert_profile))
                            .route(web::get().to(api::profile::get_my_profile))
                            .route(web::delete().to(api::profile::delete_profile)),
                    )
                    .route(
                        "/username/{username}",
                        web::get().to(api::profile::get_profile_by_username),
                    )
                    .route(
                        "/check-username/{username}",
                        web::get().to(api::profile::check_username),
                    )
                    // MUST stay last (catch-all)
                    .route("/{user_id}", web::get().to(api::profile::get_profile_by_user_id)),
            )
            // User composites + account deletion
            .service(
                web::scope("/api/v1/user")
                    .service(
                        web::resource("/complete-profile")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::user::get_complete_profile)),
                    )
                    .service(
                        web::resource("/account")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::delete().to(api::user::delete_account)),
                    )
                    .route(
                        "/public/username/{username}",
                        web::get().to(api::user::get_public_profile_by_username),
                    )
                    .route("/public/{user_id}", web::get().to(api::user::get_public_profile)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
