use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use crate::domain::{
    models::{
        appointment::{Appointment, AppointmentStatus},
        job::{Job, JobStatus},
    },
    ports::{AppointmentRepository, JobRepository},
};
use crate::error::AppError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
pub const RATING_COMMENT_MIN_LEN: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("The {party} cannot {action}")]
    NotAllowed { action: Action, party: Party },
    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: Action, state: LifecycleState },
    #[error("Invalid rating: {0}")]
    InvalidRating(String),
    #[error("Invalid job proposal: {0}")]
    InvalidProposal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Client,
    Provider,
}

impl Party {
    pub fn of(appointment: &Appointment, user_id: &str) -> Option<Party> {
        if appointment.provider_id == user_id {
            Some(Party::Provider)
        } else if appointment.client_id == user_id {
            Some(Party::Client)
        } else {
            None
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Client => write!(f, "client"),
            Party::Provider => write!(f, "provider"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Accept,
    Reject,
    ProposeJob,
    AcceptProposal,
    Finalize,
    Confirm,
    Rate,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Accept,
        Action::Reject,
        Action::ProposeJob,
        Action::AcceptProposal,
        Action::Finalize,
        Action::Confirm,
        Action::Rate,
    ];

    pub fn actor(&self) -> Party {
        match self {
            Action::Accept | Action::Reject | Action::ProposeJob | Action::Finalize => Party::Provider,
            Action::AcceptProposal | Action::Confirm | Action::Rate => Party::Client,
        }
    }

    fn target(&self) -> LifecycleState {
        let accepted_with = |job| LifecycleState { appointment: AppointmentStatus::Accepted, job: Some(job) };
        match self {
            Action::Accept => LifecycleState { appointment: AppointmentStatus::Accepted, job: None },
            Action::Reject => LifecycleState { appointment: AppointmentStatus::Rejected, job: None },
            Action::ProposeJob => accepted_with(JobStatus::Proposed),
            Action::AcceptProposal => accepted_with(JobStatus::Accepted),
            Action::Finalize => accepted_with(JobStatus::Finalized),
            Action::Confirm => accepted_with(JobStatus::Confirmed),
            Action::Rate => accepted_with(JobStatus::Rated),
        }
    }

    fn source(&self) -> LifecycleState {
        let accepted_with = |job| LifecycleState { appointment: AppointmentStatus::Accepted, job: Some(job) };
        match self {
            Action::Accept | Action::Reject => LifecycleState { appointment: AppointmentStatus::Pending, job: None },
            Action::ProposeJob => LifecycleState { appointment: AppointmentStatus::Accepted, job: None },
            Action::AcceptProposal => accepted_with(JobStatus::Proposed),
            Action::Finalize => accepted_with(JobStatus::Accepted),
            Action::Confirm => accepted_with(JobStatus::Finalized),
            Action::Rate => accepted_with(JobStatus::Confirmed),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Accept => "accept the appointment",
            Action::Reject => "reject the appointment",
            Action::ProposeJob => "propose a job",
            Action::AcceptProposal => "accept the job proposal",
            Action::Finalize => "finalize the job",
            Action::Confirm => "confirm the job",
            Action::Rate => "rate the job",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleState {
    pub appointment: AppointmentStatus,
    pub job: Option<JobStatus>,
}

impl LifecycleState {
    pub fn of(appointment: &Appointment, job: Option<&Job>) -> Self {
        Self { appointment: appointment.status, job: job.map(|j| j.status) }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.job {
            Some(job) => write!(f, "job is {}", job.as_str()),
            None => write!(f, "appointment is {}", self.appointment.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied(LifecycleState),
    AlreadyApplied,
}

pub fn apply(state: LifecycleState, action: Action, party: Party) -> Result<Outcome, LifecycleError> {
    if action.actor() != party {
        return Err(LifecycleError::NotAllowed { action, party });
    }
    if state == action.source() {
        return Ok(Outcome::Applied(action.target()));
    }
    if state == action.target() {
        return Ok(Outcome::AlreadyApplied);
    }
    Err(LifecycleError::InvalidTransition { action, state })
}

pub fn available_actions(state: LifecycleState, party: Party) -> Vec<Action> {
    Action::ALL.into_iter()
        .filter(|a| a.actor() == party && a.source() == state)
        .collect()
}

pub fn validate_rating(score: i32, comment: Option<&str>) -> Result<Option<String>, LifecycleError> {
    if !(MIN_RATING..=MAX_RATING).contains(&score) {
        return Err(LifecycleError::InvalidRating(format!("score must be between {} and {}", MIN_RATING, MAX_RATING)));
    }
    match comment.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(None),
        Some(c) if c.chars().count() < RATING_COMMENT_MIN_LEN => Err(LifecycleError::InvalidRating(
            format!("comment must have at least {} characters", RATING_COMMENT_MIN_LEN)
        )),
        Some(c) => Ok(Some(c.to_string())),
    }
}

pub fn validate_proposal(description: &str, agreed_price: i64) -> Result<(), LifecycleError> {
    if description.trim().is_empty() {
        return Err(LifecycleError::InvalidProposal("description is required".into()));
    }
    if agreed_price <= 0 {
        return Err(LifecycleError::InvalidProposal("price must be positive".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Neutral,
    Warning,
    Danger,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

pub fn badge(state: LifecycleState) -> Badge {
    use AppointmentStatus as A;
    use JobStatus as J;

    let (label, tone) = match (state.appointment, state.job) {
        (A::Pending, None) => ("Pending", BadgeTone::Warning),
        (A::Rejected, None) => ("Rejected", BadgeTone::Danger),
        (A::Accepted, None) => ("Accepted", BadgeTone::Info),
        (A::Accepted, Some(J::Proposed)) => ("Job proposed", BadgeTone::Info),
        (A::Accepted, Some(J::Accepted)) => ("Job in progress", BadgeTone::Info),
        (A::Accepted, Some(J::Finalized)) => ("Awaiting payment", BadgeTone::Warning),
        (A::Accepted, Some(J::Confirmed)) => ("Paid", BadgeTone::Success),
        (A::Accepted, Some(J::Rated)) => ("Completed", BadgeTone::Success),
        _ => ("Pending", BadgeTone::Neutral),
    };
    Badge { label: label.to_string(), tone }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentView {
    pub appointment: Appointment,
    pub job: Option<Job>,
    pub party: Party,
    pub badge: Badge,
    pub actions: Vec<Action>,
}

impl AppointmentView {
    pub fn build(appointment: Appointment, job: Option<Job>, party: Party) -> Self {
        let state = LifecycleState::of(&appointment, job.as_ref());
        Self {
            badge: badge(state),
            actions: available_actions(state, party),
            appointment,
            job,
            party,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    Accept,
    Reject,
    ProposeJob { description: String, terms: Option<String>, agreed_price: i64 },
    AcceptProposal,
    Finalize,
    Confirm,
    Rate { score: i32, comment: Option<String> },
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::Accept => Action::Accept,
            Command::Reject => Action::Reject,
            Command::ProposeJob { .. } => Action::ProposeJob,
            Command::AcceptProposal => Action::AcceptProposal,
            Command::Finalize => Action::Finalize,
            Command::Confirm => Action::Confirm,
            Command::Rate { .. } => Action::Rate,
        }
    }
}

pub struct LifecycleTracker {
    appointments: Arc<dyn AppointmentRepository>,
    jobs: Arc<dyn JobRepository>,
}

impl LifecycleTracker {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, jobs: Arc<dyn JobRepository>) -> Self {
        Self { appointments, jobs }
    }

    pub async fn views_for(&self, user_id: &str) -> Result<Vec<AppointmentView>, AppError> {
        let appointments = self.appointments.list_for_user(user_id).await?;
        let mut jobs: HashMap<String, Job> = self.jobs.list_for_user(user_id).await?
            .into_iter()
            .map(|j| (j.appointment_id.clone(), j))
            .collect();

        Ok(appointments.into_iter().filter_map(|appt| {
            let party = Party::of(&appt, user_id)?;
            let job = jobs.remove(&appt.id);
            Some(AppointmentView::build(appt, job, party))
        }).collect())
    }

    async fn load(&self, appointment_id: &str, user_id: &str) -> Result<(Appointment, Option<Job>, Party), AppError> {
        let appointment = self.appointments.find_by_id(appointment_id).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;
        let party = Party::of(&appointment, user_id)
            .ok_or(AppError::Forbidden("Not a party to this appointment".into()))?;
        let job = self.jobs.find_by_appointment(appointment_id).await?;
        Ok((appointment, job, party))
    }

    pub async fn view(&self, appointment_id: &str, user_id: &str) -> Result<AppointmentView, AppError> {
        let (appointment, job, party) = self.load(appointment_id, user_id).await?;
        Ok(AppointmentView::build(appointment, job, party))
    }

    pub async fn perform(&self, appointment_id: &str, user_id: &str, command: Command) -> Result<Vec<AppointmentView>, AppError> {
        let (appointment, job, party) = self.load(appointment_id, user_id).await?;
        let action = command.action();
        let state = LifecycleState::of(&appointment, job.as_ref());

        let next = match apply(state, action, party)? {
            Outcome::AlreadyApplied => {
                info!(appointment_id, ?action, "Lifecycle action already applied");
                return self.views_for(user_id).await;
            }
            Outcome::Applied(next) => next,
        };

        match (command, job) {
            (Command::Accept | Command::Reject, _) => {
                let updated = self.appointments
                    .update_status(appointment_id, state.appointment, next.appointment)
                    .await?;
                if !updated {
                    return Err(AppError::Conflict("Appointment was modified concurrently".into()));
                }
            }
            (Command::ProposeJob { description, terms, agreed_price }, _) => {
                validate_proposal(&description, agreed_price)?;
                let terms = terms.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
                let job = Job::propose(appointment_id.to_string(), description.trim().to_string(), terms, agreed_price);
                self.jobs.create(&job).await?;
            }
            (command, Some(mut job)) => {
                let expected = job.status;
                if let Command::Rate { score, comment } = &command {
                    job.rating_comment = validate_rating(*score, comment.as_deref())?;
                    job.rating = Some(*score);
                }
                if let Some(status) = next.job {
                    job.status = status;
                }
                job.updated_at = chrono::Utc::now();
                if !self.jobs.update(&job, expected).await? {
                    return Err(AppError::Conflict("Job was modified concurrently".into()));
                }
            }
            (_, None) => return Err(AppError::Internal),
        }

        info!(appointment_id, ?action, %party, "Lifecycle action applied");
        self.views_for(user_id).await
    }
}
