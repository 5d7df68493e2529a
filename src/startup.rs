use actix_web::{middleware::Logger, web, App, HttpServer};
use actix_web::dev::Server;
use sqlx::PgPool;
use std::net::TcpListener;

use crate::auth::Role;
use crate::configuration::JwtSettings;
use crate::error::{AppError, ValidationError};
use crate::logger::LoggerMiddleware;
use crate::middleware::{JwtMiddleware, RoleGate};
use crate::routes::{
    admin_signup, create_quiz, get_quiz, health_check, list_quizzes, login, student_signup,
    submit_answers, update_quiz,
};

/// Malformed or incomplete JSON bodies become 400s in the standard envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(ValidationError::MalformedBody(err.to_string())).into()
    })
}

/// Non-numeric quiz ids are a validation failure, not a missing route.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::Validation(ValidationError::InvalidFormat(format!("quiz_id ({})", err))).into()
    })
}

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_config: JwtSettings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let jwt_config_data = web::Data::new(jwt_config.clone());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(connection.clone())
            .app_data(jwt_config_data.clone())
            .app_data(json_config())
            .app_data(path_config())

            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/signup", web::post().to(student_signup))
            .route("/login", web::post().to(login))
            .route("/admin/signup", web::post().to(admin_signup))
            .route("/admin/login", web::post().to(login))

            // Protected routes; the last `wrap` runs first, so the token is
            // verified before the role and both before any extractor
            .service(
                web::scope("/admin/quizzes")
                    .wrap(RoleGate::new(Role::Admin))
                    .wrap(JwtMiddleware::new(jwt_config.clone()))
                    .route("", web::post().to(create_quiz))
                    .route("/{quiz_id}", web::put().to(update_quiz)),
            )
            .service(
                web::scope("/quizzes")
                    .wrap(JwtMiddleware::new(jwt_config.clone()))
                    .route("", web::get().to(list_quizzes))
                    .route("/submit", web::post().to(submit_answers))
                    .route("/{quiz_id}", web::get().to(get_quiz)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
