use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::dates;
use crate::errors::CustomError;
use crate::jobs::persistent_jobs::{CancellationMail, CancellationQueue};
use crate::mail::{CancellationContext, CancellationSender};
use crate::repository::appointments::{AppointmentRepository, PAGE_SIZE};
use crate::repository::models::{
    Appointment, AppointmentDetail, AppointmentWithProvider, Notification, User,
};
use crate::repository::notifications::NotificationRepository;
use crate::repository::users::UserRepository;
use crate::routes::authentication::models::{LoginUserPayload, RegisterUserPayload};

pub fn user(id: i32, name: &str, provider: bool) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@exemplo.com", name.to_lowercase()),
        password_hash: None,
        provider,
        avatar_id: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn appointment(id: i32, user_id: i32, provider_id: i32, date: DateTime<Utc>) -> Appointment {
    Appointment {
        id,
        user_id,
        provider_id,
        date,
        canceled_at: None,
        created_at: None,
        updated_at: None,
    }
}

/// In-memory stand-in for the Postgres repository. Mirrors the storage
/// guarantees the real one gets from the database: the unique slot index
/// and the guarded cancellation update.
#[derive(Default)]
pub struct MockRepository {
    pub users: Vec<User>,
    pub appointments: Mutex<Vec<Appointment>>,
    pub notifications: Mutex<Vec<Notification>>,
}

impl MockRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn with_appointment(self, appointment: Appointment) -> Self {
        self.appointments.lock().unwrap().push(appointment);
        self
    }

    pub fn appointment_by_id(&self, id: i32) -> Option<Appointment> {
        self.appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl UserRepository for MockRepository {
    async fn create_user(&self, body: RegisterUserPayload) -> Result<User, CustomError> {
        let mut created = user(self.users.len() as i32 + 1, &body.name, false);
        created.email = body.email.to_lowercase();
        Ok(created)
    }

    async fn get_user_and_check_password(
        &self,
        body: LoginUserPayload,
    ) -> Result<User, CustomError> {
        self.users
            .iter()
            .find(|u| u.email == body.email.to_lowercase())
            .cloned()
            .ok_or_else(|| CustomError::Unauthorized {
                message: "E-mail ou senha inválidos".to_string(),
            })
    }

    async fn get_user_by_id(&self, user_id: i32) -> Result<Option<User>, CustomError> {
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn get_provider_by_id(&self, provider_id: i32) -> Result<Option<User>, CustomError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.id == provider_id && u.provider)
            .cloned())
    }
}

#[async_trait::async_trait]
impl AppointmentRepository for MockRepository {
    async fn list_for_user(
        &self,
        user_id: i32,
        page: i64,
    ) -> Result<Vec<AppointmentWithProvider>, CustomError> {
        let offset = ((page - 1) * PAGE_SIZE) as usize;
        let mut rows: Vec<Appointment> = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && a.canceled_at.is_none())
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.date);

        Ok(rows
            .into_iter()
            .skip(offset)
            .take(PAGE_SIZE as usize)
            .map(|a| {
                let provider = self.users.iter().find(|u| u.id == a.provider_id);
                AppointmentWithProvider {
                    id: a.id,
                    date: a.date,
                    canceled_at: a.canceled_at,
                    provider_id: a.provider_id,
                    provider_name: provider.map(|p| p.name.clone()).unwrap_or_default(),
                    avatar_id: None,
                    avatar_path: None,
                }
            })
            .collect())
    }

    async fn create_appointment(
        &self,
        user_id: i32,
        provider_id: i32,
        date: DateTime<Utc>,
    ) -> Result<Appointment, CustomError> {
        let slot = dates::start_of_hour(date)?;
        let mut appointments = self.appointments.lock().unwrap();
        let taken = appointments.iter().any(|a| {
            a.provider_id == provider_id
                && a.canceled_at.is_none()
                && dates::start_of_hour(a.date) == Ok(slot)
        });
        if taken {
            return Err(CustomError::Conflict {
                message: "Sem vagas para essa data, marque outra".to_string(),
            });
        }

        let created = appointment(appointments.len() as i32 + 1, user_id, provider_id, date);
        appointments.push(created.clone());
        Ok(created)
    }

    async fn get_appointment_detail(
        &self,
        id: i32,
    ) -> Result<Option<AppointmentDetail>, CustomError> {
        let appointments = self.appointments.lock().unwrap();
        let Some(a) = appointments.iter().find(|a| a.id == id) else {
            return Ok(None);
        };

        let provider = self.users.iter().find(|u| u.id == a.provider_id);
        let owner = self.users.iter().find(|u| u.id == a.user_id);
        Ok(Some(AppointmentDetail {
            id: a.id,
            user_id: a.user_id,
            date: a.date,
            canceled_at: a.canceled_at,
            provider_name: provider.map(|p| p.name.clone()).unwrap_or_default(),
            provider_email: provider.map(|p| p.email.clone()).unwrap_or_default(),
            user_name: owner.map(|u| u.name.clone()).unwrap_or_default(),
        }))
    }

    async fn cancel_appointment(&self, id: i32) -> Result<Option<Appointment>, CustomError> {
        let now = Utc::now();
        let mut appointments = self.appointments.lock().unwrap();
        let Some(a) = appointments.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if a.canceled_at.is_some() || dates::is_within_cancellation_window(a.date, now) {
            return Ok(None);
        }

        a.canceled_at = Some(now);
        Ok(Some(a.clone()))
    }
}

#[async_trait::async_trait]
impl NotificationRepository for MockRepository {
    async fn create_notification(
        &self,
        content: &str,
        user_id: i32,
    ) -> Result<Notification, CustomError> {
        let mut notifications = self.notifications.lock().unwrap();
        let notification = Notification {
            id: notifications.len() as i32 + 1,
            content: content.to_string(),
            user_id,
            read: false,
            created_at: None,
        };
        notifications.push(notification.clone());
        Ok(notification)
    }
}

#[derive(Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<(String, CancellationContext)>>,
}

#[async_trait::async_trait]
impl CancellationSender for MockMailer {
    async fn send_cancellation(
        &self,
        to: &str,
        context: &CancellationContext,
    ) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push((to.to_string(), context.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockQueue {
    pub jobs: Vec<CancellationMail>,
}

#[async_trait::async_trait]
impl CancellationQueue for MockQueue {
    async fn enqueue(&mut self, job: CancellationMail) -> anyhow::Result<()> {
        self.jobs.push(job);
        Ok(())
    }
}
