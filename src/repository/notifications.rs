use super::models::Notification;
use super::postgres_repository::PostgresRepository;
use crate::errors::CustomError;

#[async_trait::async_trait]
pub trait NotificationRepository {
    /// In-app notification for the provider, created as a booking side
    /// effect.
    async fn create_notification(
        &self,
        content: &str,
        user_id: i32,
    ) -> Result<Notification, CustomError>;
}

#[async_trait::async_trait]
impl NotificationRepository for PostgresRepository {
    async fn create_notification(
        &self,
        content: &str,
        user_id: i32,
    ) -> Result<Notification, CustomError> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (content, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(content)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }
}
