use actix_web::web;

pub mod appointments;
pub mod authentication;

use crate::routes::appointments::routes as appointment_routes;
use crate::routes::authentication::routes as session_routes;

pub fn app_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users").route(web::post().to(session_routes::register_user_handler)),
    )
    .service(
        web::resource("/sessions").route(web::post().to(session_routes::login_user_handler)),
    )
    .service(
        web::scope("/appointments")
            .service(
                web::resource("")
                    .route(web::get().to(appointment_routes::index_handler))
                    .route(web::post().to(appointment_routes::store_handler)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::delete().to(appointment_routes::delete_handler)),
            ),
    );
}
