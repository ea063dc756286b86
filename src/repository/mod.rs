pub mod appointments;
pub mod models;
pub mod notifications;
pub mod postgres_repository;
pub mod users;
