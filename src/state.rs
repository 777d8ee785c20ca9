use std::sync::Arc;
use crate::domain::ports::{
    AppointmentRepository, AuthRepository, AvailabilityRepository, JobRepository, UserRepository,
};
use crate::domain::services::{
    auth_service::AuthService,
    availability_editor::AvailabilityEditor,
    booking_selector::BookingSelector,
    lifecycle::LifecycleTracker,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_service: Arc<AuthService>,
    pub availability_editor: Arc<AvailabilityEditor>,
    pub booking_selector: Arc<BookingSelector>,
    pub lifecycle: Arc<LifecycleTracker>,
}

impl AppState {
    pub fn assemble(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        auth_repo: Arc<dyn AuthRepository>,
        availability_repo: Arc<dyn AvailabilityRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
        job_repo: Arc<dyn JobRepository>,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(auth_repo, &config));
        let availability_editor = Arc::new(AvailabilityEditor::new(availability_repo.clone()));
        let booking_selector = Arc::new(BookingSelector::new(
            user_repo.clone(),
            availability_repo,
            appointment_repo.clone(),
            config.default_duration_min,
        ));
        let lifecycle = Arc::new(LifecycleTracker::new(appointment_repo, job_repo));

        Self {
            config,
            user_repo,
            auth_service,
            availability_editor,
            booking_selector,
            lifecycle,
        }
    }
}
