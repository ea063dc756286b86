use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};

use super::models::User;
use super::postgres_repository::PostgresRepository;
use crate::errors::CustomError;
use crate::routes::authentication::models::{LoginUserPayload, RegisterUserPayload};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn create_user(&self, body: RegisterUserPayload) -> Result<User, CustomError>;

    async fn get_user_and_check_password(
        &self,
        body: LoginUserPayload,
    ) -> Result<User, CustomError>;

    async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, CustomError>;

    /// Looks the user up only among service providers. Booking against a
    /// regular customer id must fail.
    async fn get_provider_by_id(&self, provider_id: i32) -> Result<Option<User>, CustomError>;
}

#[async_trait::async_trait]
impl UserRepository for PostgresRepository {
    async fn create_user(&self, body: RegisterUserPayload) -> Result<User, CustomError> {
        let salt = SaltString::generate(&mut OsRng);
        let hashed_password = Argon2::default()
            .hash_password(body.password.as_bytes(), &salt)
            .map_err(|e| {
                log::error!("Error while hashing password: {:?}", e);
                CustomError::InternalError
            })?
            .to_string();

        let query_result = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(body.name.to_string())
        .bind(body.email.to_lowercase())
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await;

        match query_result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CustomError::Validation {
                    message: "Usuário já existe".to_string(),
                })
            }
            Err(e) => {
                log::error!("Error creating user: {:?}", e);
                Err(CustomError::InternalError)
            }
        }
    }

    async fn get_user_and_check_password(
        &self,
        body: LoginUserPayload,
    ) -> Result<User, CustomError> {
        let query_result = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(body.email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        let user = match query_result {
            Some(user) => user,
            None => {
                log::info!("User not found for login attempt");
                return Err(CustomError::Unauthorized {
                    message: "E-mail ou senha inválidos".to_string(),
                });
            }
        };

        if !check_user_password(&user, &body.password) {
            return Err(CustomError::Unauthorized {
                message: "E-mail ou senha inválidos".to_string(),
            });
        }
        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, CustomError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_provider_by_id(&self, provider_id: i32) -> Result<Option<User>, CustomError> {
        let provider =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND provider = TRUE")
                .bind(provider_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(provider)
    }
}

fn check_user_password(user: &User, password: &str) -> bool {
    let Some(user_password) = user.password_hash.as_deref() else {
        return false;
    };
    PasswordHash::new(user_password)
        .and_then(|parsed_hash| Argon2::default().verify_password(password.as_bytes(), &parsed_hash))
        .is_ok()
}
