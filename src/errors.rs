use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::{Display, Error};

/// errors visible by the user
#[derive(Debug, Display, Error, PartialEq)]
pub enum CustomError {
    #[display(fmt = "{}", message)]
    Validation { message: String },
    #[display(fmt = "{}", message)]
    Unauthorized { message: String },
    #[display(fmt = "{}", message)]
    Conflict { message: String },
    #[display(fmt = "{}", message)]
    NotFound { message: String },
    #[display(fmt = "Erro interno do servidor")]
    InternalError,
}

impl CustomError {
    pub fn convert_to_user_error(e: sqlx::Error) -> CustomError {
        match e {
            sqlx::Error::RowNotFound => CustomError::InternalError,
            sqlx::Error::ColumnDecode { .. } => CustomError::InternalError,
            sqlx::Error::Decode(_) => CustomError::InternalError,
            sqlx::Error::PoolTimedOut => CustomError::InternalError,
            sqlx::Error::PoolClosed => CustomError::InternalError,
            sqlx::Error::WorkerCrashed => CustomError::InternalError,
            _ => CustomError::InternalError,
        }
    }
}

impl ResponseError for CustomError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::Validation { .. } => StatusCode::BAD_REQUEST,
            CustomError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            CustomError::Conflict { .. } => StatusCode::BAD_REQUEST,
            CustomError::NotFound { .. } => StatusCode::NOT_FOUND,
            CustomError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for CustomError {
    fn from(e: sqlx::Error) -> CustomError {
        CustomError::convert_to_user_error(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let validation = CustomError::Validation {
            message: "Erro de validação".to_string(),
        };
        let unauthorized = CustomError::Unauthorized {
            message: "Acesso restrito".to_string(),
        };
        let conflict = CustomError::Conflict {
            message: "Sem vagas para essa data, marque outra".to_string(),
        };
        let not_found = CustomError::NotFound {
            message: "Agendamento não encontrado".to_string(),
        };

        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(conflict.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            CustomError::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_carries_the_localized_message() {
        let err = CustomError::Conflict {
            message: "Sem vagas para essa data, marque outra".to_string(),
        };
        assert_eq!(err.to_string(), "Sem vagas para essa data, marque outra");
    }

    #[test]
    fn sqlx_errors_collapse_to_internal() {
        assert_eq!(
            CustomError::from(sqlx::Error::RowNotFound),
            CustomError::InternalError
        );
        assert_eq!(
            CustomError::from(sqlx::Error::PoolTimedOut),
            CustomError::InternalError
        );
    }
}
