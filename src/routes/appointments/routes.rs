use actix_web::{web, HttpResponse};
use apalis::redis::RedisStorage;
use chrono::Utc;

use super::models::{AppointmentListItem, AppointmentResponse, ListQuery, StoreAppointmentPayload};
use crate::dates;
use crate::errors::CustomError;
use crate::jobs::persistent_jobs::{CancellationMail, CancellationQueue};
use crate::jwt_auth_middleware::JwtMiddleware;
use crate::mail::{CancellationContext, CancellationSender};
use crate::repository::appointments::AppointmentRepository;
use crate::repository::notifications::NotificationRepository;
use crate::repository::users::UserRepository;
use crate::AppState;

pub async fn index_handler(
    auth_guard: JwtMiddleware,
    query: web::Query<ListQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
    let page = query.page.unwrap_or(1).max(1);

    let rows = data.repo.list_for_user(auth_guard.user_id, page).await?;
    let appointments: Vec<AppointmentListItem> = rows
        .into_iter()
        .map(|row| AppointmentListItem::from_row(row, &data.env.app_url))
        .collect();

    Ok(HttpResponse::Ok().json(appointments))
}

pub async fn store_handler(
    auth_guard: JwtMiddleware,
    body: web::Json<StoreAppointmentPayload>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
    let appointment = book_appointment(&data.repo, auth_guard.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

pub async fn delete_handler(
    auth_guard: JwtMiddleware,
    path: web::Path<i32>,
    data: web::Data<AppState>,
    sender: web::Data<RedisStorage<CancellationMail>>,
) -> Result<HttpResponse, CustomError> {
    let mut sender = (**sender).clone();
    let appointment = cancel_booking(
        &data.repo,
        &data.mailer,
        &mut sender,
        auth_guard.user_id,
        path.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(appointment))
}

/// Booking flow: provider check, past-date check, then the insert. The
/// availability check lives in the storage layer (unique slot index), and
/// the stored date keeps the minutes the client sent.
async fn book_appointment<R>(
    repo: &R,
    user_id: i32,
    payload: StoreAppointmentPayload,
) -> Result<AppointmentResponse, CustomError>
where
    R: UserRepository + AppointmentRepository + NotificationRepository + Sync,
{
    let provider = repo
        .get_provider_by_id(payload.provider_id)
        .await?
        .ok_or_else(|| CustomError::Unauthorized {
            message: "Acesso restrito".to_string(),
        })?;

    let hour_start = dates::start_of_hour(payload.date)?;
    if hour_start < Utc::now() {
        return Err(CustomError::Validation {
            message: "Data inválida para agendamento!".to_string(),
        });
    }

    // resolved before the insert so a bad requester cannot leave a booked
    // row behind
    let user = repo
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| CustomError::Unauthorized {
            message: "Token inválido".to_string(),
        })?;

    let appointment = repo
        .create_appointment(user_id, provider.id, payload.date)
        .await?;

    let content = format!(
        "Novo agendamento de {} para {}",
        user.name,
        dates::format_pt(hour_start)
    );
    repo.create_notification(&content, provider.id).await?;

    Ok(AppointmentResponse::from(appointment))
}

/// Cancellation flow: ownership and window checks, the guarded update,
/// then one synchronous mail send plus one enqueue for redundant async
/// delivery.
async fn cancel_booking<R, M, Q>(
    repo: &R,
    mailer: &M,
    queue: &mut Q,
    user_id: i32,
    id: i32,
) -> Result<AppointmentResponse, CustomError>
where
    R: AppointmentRepository + Sync,
    M: CancellationSender + Sync,
    Q: CancellationQueue + Send,
{
    let detail = repo
        .get_appointment_detail(id)
        .await?
        .ok_or_else(|| CustomError::NotFound {
            message: "Agendamento não encontrado".to_string(),
        })?;

    if detail.user_id != user_id {
        return Err(CustomError::Unauthorized {
            message: "Você não tem permissão".to_string(),
        });
    }

    if detail.canceled_at.is_some() {
        return Err(CustomError::Validation {
            message: "Este agendamento já foi cancelado.".to_string(),
        });
    }

    if dates::is_within_cancellation_window(detail.date, Utc::now()) {
        return Err(CustomError::Validation {
            message: "Você não pode cancelar o agendamento a menos de 2 horas.".to_string(),
        });
    }

    // The guarded update re-checks the window and canceled_at in the
    // storage layer, so a concurrent cancel of the same row leaves one
    // winner.
    let appointment = repo
        .cancel_appointment(detail.id)
        .await?
        .ok_or_else(|| CustomError::Validation {
            message: "Você não pode cancelar o agendamento a menos de 2 horas.".to_string(),
        })?;

    let to = format!("{} <{}>", detail.provider_name, detail.provider_email);
    let context = CancellationContext {
        provider: detail.provider_name.clone(),
        user: detail.user_name.clone(),
        date: dates::format_pt(detail.date),
    };

    mailer.send_cancellation(&to, &context).await.map_err(|e| {
        log::error!("Error sending cancellation mail: {:?}", e);
        CustomError::InternalError
    })?;

    // redundant async delivery through the durable queue
    if let Err(e) = queue.enqueue(CancellationMail { to, context }).await {
        log::error!("Failed to push cancellation mail to queue: {}", e);
        return Err(CustomError::InternalError);
    }

    Ok(AppointmentResponse::from(appointment))
}
