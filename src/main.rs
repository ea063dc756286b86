use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpResponse, HttpServer, Responder};
use dotenv::dotenv;

mod config;
mod dates;
mod db;
mod errors;
mod jobs;
mod jwt_auth_middleware;
mod mail;
mod repository;
mod routes;
#[cfg(test)]
mod test_utils;
mod token;

use crate::db::get_db_conn;
use crate::mail::Mailer;
use crate::repository::postgres_repository::PostgresRepository;
use config::Config;

pub struct AppState {
    repo: PostgresRepository,
    env: Config,
    mailer: Mailer,
}

impl AppState {
    pub async fn new(env_config: &Config) -> Self {
        let db = get_db_conn(env_config).await;
        let mailer = match Mailer::new(env_config) {
            Ok(mailer) => mailer,
            Err(e) => {
                log::error!("mailer setup error 🔥: {:?}", e);
                std::process::exit(1);
            }
        };

        Self {
            repo: PostgresRepository::new(db),
            env: env_config.clone(),
            mailer,
        }
    }
}

async fn health_checker_handler() -> impl Responder {
    const MESSAGE: &str = "Up and running!";

    HttpResponse::Ok().json(serde_json::json!({"message": MESSAGE}))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv().ok();

    let config = Config::init();

    let email_sender =
        match jobs::persistent_jobs::start_processing_email_queue(&config.redis_url).await {
            Ok(email_sender) => email_sender,
            Err(e) => {
                log::error!("Error while starting email queue: {:?}", e);
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "Error while starting email queue",
                ));
            }
        };

    let app_data = AppState::new(&config).await;
    let app_data = web::Data::new(app_data);
    let client_origin = config.client_origin.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&client_origin)
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .supports_credentials();

        App::new()
            .wrap(cors)
            .app_data(app_data.clone())
            .app_data(web::Data::new(email_sender.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                // schema failures (missing field, bad type, bad date) all
                // surface as the localized validation error
                log::info!("Rejected payload: {}", err);
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest()
                        .json(serde_json::json!({"error": "Erro de validação"})),
                )
                .into()
            }))
            .route("/health-checker", web::get().to(health_checker_handler))
            .configure(routes::app_routes)
    })
    .bind(format!("{}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}
