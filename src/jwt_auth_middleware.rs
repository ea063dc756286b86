use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};

use crate::errors::CustomError;
use crate::token::verify_jwt_token;
use crate::AppState;

/// Extractor that resolves the requesting user id from the session token,
/// taken from the `access_token` cookie or an `Authorization: Bearer`
/// header. Handlers that take this guard are authenticated routes.
pub struct JwtMiddleware {
    pub user_id: i32,
}

impl FromRequest for JwtMiddleware {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user_id(req).map(|user_id| JwtMiddleware { user_id }))
    }
}

fn extract_user_id(req: &HttpRequest) -> Result<i32, actix_web::Error> {
    let unauthorized = || CustomError::Unauthorized {
        message: "Token inválido".to_string(),
    };

    let data = req
        .app_data::<web::Data<AppState>>()
        .ok_or(CustomError::InternalError)?;

    let token = req
        .cookie("access_token")
        .map(|c| c.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_string)
        })
        .ok_or_else(unauthorized)?;

    let claims = verify_jwt_token(&data.env.jwt_secret, &token).map_err(|e| {
        log::info!("Error while verifying access token: {:?}", e);
        unauthorized()
    })?;

    Ok(claims.sub)
}
