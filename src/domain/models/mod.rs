pub mod appointment;
pub mod auth;
pub mod availability;
pub mod job;
pub mod time_range;
pub mod user;
