use actix_web::{
    cookie::{time::Duration as ActixWebDuration, Cookie},
    web, HttpResponse,
};

use super::models::{LoginUserPayload, RegisterUserPayload, SessionResponse, UserResponse};
use crate::errors::CustomError;
use crate::repository::users::UserRepository;
use crate::token::generate_jwt_token;
use crate::AppState;

pub async fn register_user_handler(
    body: web::Json<RegisterUserPayload>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
    let user = data.repo.create_user(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

pub async fn login_user_handler(
    body: web::Json<LoginUserPayload>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
    let user = data.repo.get_user_and_check_password(body.into_inner()).await?;

    let token = generate_jwt_token(user.id, data.env.jwt_max_age, &data.env.jwt_secret).map_err(
        |e| {
            log::error!("Error while generating session token: {:?}", e);
            CustomError::InternalError
        },
    )?;

    let access_cookie = Cookie::build("access_token", token.clone())
        .path("/")
        .max_age(ActixWebDuration::new(data.env.jwt_max_age * 60, 0))
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok().cookie(access_cookie).json(SessionResponse {
        user: UserResponse::from(user),
        token,
    }))
}
