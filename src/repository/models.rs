use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::dates;

#[derive(Debug, Deserialize, FromRow, Serialize, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub provider: bool,
    pub avatar_id: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, FromRow, Serialize, Clone)]
pub struct Appointment {
    pub id: i32,
    pub user_id: i32,
    pub provider_id: i32,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn past(&self) -> bool {
        self.date < Utc::now()
    }

    pub fn cancelable(&self) -> bool {
        self.canceled_at.is_none()
            && !dates::is_within_cancellation_window(self.date, Utc::now())
    }
}

/// One row of the listing query: an appointment joined with its provider
/// and the provider's avatar. The avatar join is optional.
#[derive(Debug, FromRow, Clone)]
pub struct AppointmentWithProvider {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub provider_id: i32,
    pub provider_name: String,
    pub avatar_id: Option<i32>,
    pub avatar_path: Option<String>,
}

/// The cancellation view: the appointment plus the names and email needed
/// for the notification mail.
#[derive(Debug, FromRow, Clone)]
pub struct AppointmentDetail {
    pub id: i32,
    pub user_id: i32,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub provider_name: String,
    pub provider_email: String,
    pub user_name: String,
}

#[derive(Debug, Deserialize, FromRow, Serialize, Clone)]
pub struct Notification {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn appointment(date: DateTime<Utc>, canceled_at: Option<DateTime<Utc>>) -> Appointment {
        Appointment {
            id: 1,
            user_id: 1,
            provider_id: 2,
            date,
            canceled_at,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn future_appointment_is_not_past_and_is_cancelable() {
        let a = appointment(Utc::now() + Duration::hours(5), None);
        assert!(!a.past());
        assert!(a.cancelable());
    }

    #[test]
    fn appointment_within_two_hours_is_not_cancelable() {
        let a = appointment(Utc::now() + Duration::minutes(90), None);
        assert!(!a.cancelable());
    }

    #[test]
    fn canceled_appointment_is_never_cancelable() {
        let a = appointment(Utc::now() + Duration::hours(5), Some(Utc::now()));
        assert!(!a.cancelable());
    }

    #[test]
    fn old_appointment_is_past() {
        let a = appointment(Utc::now() - Duration::hours(1), None);
        assert!(a.past());
        assert!(!a.cancelable());
    }
}
