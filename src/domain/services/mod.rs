pub mod auth_service;
pub mod availability_editor;
pub mod booking_selector;
pub mod calendar;
pub mod lifecycle;
pub mod overlap;
pub mod registration;
pub mod rut;
