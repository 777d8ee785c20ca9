pub mod appointments;
pub mod auth;
pub mod availability;
pub mod calendar;
pub mod health;
pub mod lifecycle;
