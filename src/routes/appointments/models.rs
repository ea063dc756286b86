use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::repository::models::{Appointment, AppointmentWithProvider};

#[derive(Debug, Deserialize)]
pub struct StoreAppointmentPayload {
    pub provider_id: i32,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub id: i32,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    pub id: i32,
    pub name: String,
    pub avatar: Option<AvatarResponse>,
}

/// Listing projection: the appointment flags plus the provider and avatar.
#[derive(Debug, Serialize)]
pub struct AppointmentListItem {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub past: bool,
    pub cancelable: bool,
    pub provider: ProviderResponse,
}

impl AppointmentListItem {
    pub fn from_row(row: AppointmentWithProvider, app_url: &str) -> Self {
        let now = Utc::now();
        let avatar = match (row.avatar_id, row.avatar_path) {
            (Some(id), Some(path)) => Some(AvatarResponse {
                id,
                url: format!("{}/files/{}", app_url, path),
                path,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            date: row.date,
            past: row.date < now,
            cancelable: row.canceled_at.is_none()
                && !dates::is_within_cancellation_window(row.date, now),
            provider: ProviderResponse {
                id: row.provider_id,
                name: row.provider_name,
                avatar,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub id: i32,
    pub user_id: i32,
    pub provider_id: i32,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub past: bool,
    pub cancelable: bool,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            past: appointment.past(),
            cancelable: appointment.cancelable(),
            id: appointment.id,
            user_id: appointment.user_id,
            provider_id: appointment.provider_id,
            date: appointment.date,
            canceled_at: appointment.canceled_at,
        }
    }
}
