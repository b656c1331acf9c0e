//! HTTP handlers and route configuration.

mod account;
mod auth;
mod health;
mod posts;
mod reset;
mod views;


use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/profile-pics/{file}", web::get().to(account::profile_picture))
            .route(
                "/users/{username}/posts",
                web::get().to(posts::list_user_posts),
            )
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/reset-password", web::post().to(reset::request_reset))
                    .service(
                        web::resource("/reset-password/{token}")
                            .route(web::get().to(reset::check_reset_token))
                            .route(web::post().to(reset::complete_reset)),
                    ),
            )
            .service(
                web::resource("/account")
                    .route(web::get().to(account::get_account))
                    .route(web::put().to(account::update_account)),
            )
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list_posts))
                    .route(web::post().to(posts::create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(posts::get_post))
                    .route(web::put().to(posts::update_post))
                    .route(web::delete().to(posts::delete_post)),
            ),
    );
}

/// Request body limit for JSON; base64 profile pictures need headroom.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(4 * 1024 * 1024)
        .error_handler(|err, _req| {
            let detail = err.to_string();
            crate::middleware::error::AppError::BadRequest(detail).into()
        })
}
