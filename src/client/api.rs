use std::sync::Arc;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;
use crate::api::dtos::{
    requests::{
        CalendarQuery, CreateAppointmentRequest, CreateAvailabilityRequest, LoginRequest,
        ProposeJobRequest, RateJobRequest, RefreshRequest, RegisterRequest, UpdateProfileRequest,
    },
    responses::CalendarResponse,
};
use crate::domain::models::{
    auth::{AuthResponse, UserProfile},
    availability::AvailabilityBlock,
    time_range::TimeRange,
    user::UserRole,
};
use crate::domain::services::{
    booking_selector::{MAX_DURATION_MIN, MAX_WINDOW_DAYS},
    lifecycle::{validate_proposal, validate_rating, AppointmentView, Command},
    overlap::{check_candidate, CalendarEntry},
};
use super::error::ClientError;
use super::session::{SessionContext, SessionStore};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ChamBeeClient {
    http: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl ChamBeeClient {
    pub fn new(base_url: &str, store: Arc<dyn SessionStore>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    pub fn session(&self) -> Result<Option<SessionContext>, ClientError> {
        self.store.load()
    }

    fn require_session(&self) -> Result<SessionContext, ClientError> {
        self.store.load()?.ok_or(ClientError::NotLoggedIn)
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let session = self.require_session()?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(session.access_token))
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        Err(Self::failure(status, resp).await)
    }

    async fn failure(status: StatusCode, resp: Response) -> ClientError {
        if status == StatusCode::UNAUTHORIZED {
            return ClientError::Unauthorized;
        }
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
        };
        ClientError::Api { status: status.as_u16(), message }
    }

    async fn send<B: Serialize, T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError> {
        let mut req = self.authed(method, path)?;
        if let Some(body) = body {
            req = req.json(body);
        }
        Self::decode(req.send().await?).await
    }

    async fn start_session(&self, resp: Response) -> Result<SessionContext, ClientError> {
        let auth: AuthResponse = Self::decode(resp).await?;
        let session = SessionContext::from(auth);
        self.store.save(&session)?;
        debug!(user_id = session.user_id(), "Session stored");
        Ok(session)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<SessionContext, ClientError> {
        let resp = self.http.post(self.url("/auth/register")).json(request).send().await?;
        self.start_session(resp).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionContext, ClientError> {
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        let resp = self.http.post(self.url("/auth/login")).json(&body).send().await?;
        self.start_session(resp).await
    }

    pub async fn refresh(&self) -> Result<SessionContext, ClientError> {
        let session = self.require_session()?;
        let body = RefreshRequest { refresh_token: session.refresh_token };
        let resp = self.http.post(self.url("/auth/refresh")).json(&body).send().await?;
        match self.start_session(resp).await {
            Err(ClientError::Unauthorized) => {
                self.store.clear()?;
                Err(ClientError::Unauthorized)
            }
            other => other,
        }
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let Some(session) = self.store.load()? else {
            return Ok(());
        };
        let body = RefreshRequest { refresh_token: session.refresh_token };
        let resp = self.http.post(self.url("/auth/logout")).json(&body).send().await?;
        self.store.clear()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Self::failure(status, resp).await);
        }
        Ok(())
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        self.send::<(), _>(Method::GET, "/auth/me", None).await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<UserProfile, ClientError> {
        let profile: UserProfile = self.send(Method::PUT, "/auth/me", Some(request)).await?;
        if let Some(mut session) = self.store.load()? {
            session.profile = profile.clone();
            self.store.save(&session)?;
        }
        Ok(profile)
    }

    pub async fn calendar(&self, provider_id: &str, query: &CalendarQuery) -> Result<CalendarResponse, ClientError> {
        let mut req = self.http.get(self.url(&format!("/providers/{}/calendar", provider_id))).query(query);
        if let Some(session) = self.store.load()? {
            req = req.bearer_auth(session.access_token);
        }
        Self::decode(req.send().await?).await
    }

    pub async fn my_availability(&self) -> Result<Vec<AvailabilityBlock>, ClientError> {
        self.send::<(), _>(Method::GET, "/availability", None).await
    }

    pub async fn create_availability(&self, range: TimeRange, is_blockout: bool, now: DateTime<Utc>) -> Result<Vec<AvailabilityBlock>, ClientError> {
        let session = self.require_session()?;
        if session.role() != UserRole::Provider {
            return Err(ClientError::Validation("Only providers can edit availability".into()));
        }
        if range.starts_before(now) {
            return Err(ClientError::Validation("Cannot create availability in the past".into()));
        }

        let body = CreateAvailabilityRequest { start_time: range.start, end_time: range.end, is_blockout };
        self.send(Method::POST, "/availability", Some(&body)).await
    }

    pub async fn delete_availability(&self, block_id: &str) -> Result<Vec<AvailabilityBlock>, ClientError> {
        self.send::<(), _>(Method::DELETE, &format!("/availability/{}", block_id), None).await
    }

    pub async fn request_appointment(
        &self,
        provider_id: &str,
        start: DateTime<Utc>,
        duration_minutes: i32,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<AppointmentView, ClientError> {
        if !(1..=MAX_DURATION_MIN).contains(&duration_minutes) {
            return Err(ClientError::Validation(format!("Duration must be between 1 and {} minutes", MAX_DURATION_MIN)));
        }
        let candidate = TimeRange::from_duration(start, duration_minutes as i64)?;
        check_candidate(&candidate, now, &[])?;
        self.require_session()?;

        let first_day = candidate.start.date_naive();
        let span = (candidate.end.date_naive() - first_day).num_days() as u32 + 1;
        let calendar = self.calendar(provider_id, &CalendarQuery {
            date: Some(first_day),
            tz: Some("UTC".to_string()),
            days: Some(span.min(MAX_WINDOW_DAYS)),
        }).await?;

        let entries: Vec<CalendarEntry> = calendar.events.iter().map(CalendarEntry::from).collect();
        check_candidate(&candidate, now, &entries)?;

        let body = CreateAppointmentRequest {
            provider_id: provider_id.to_string(),
            start_time: candidate.start,
            duration_minutes: Some(duration_minutes),
            notes,
        };
        self.send(Method::POST, "/appointments", Some(&body)).await
    }

    pub async fn appointments(&self) -> Result<Vec<AppointmentView>, ClientError> {
        self.send::<(), _>(Method::GET, "/appointments", None).await
    }

    pub async fn appointment(&self, appointment_id: &str) -> Result<AppointmentView, ClientError> {
        self.send::<(), _>(Method::GET, &format!("/appointments/{}", appointment_id), None).await
    }

    pub async fn perform(&self, appointment_id: &str, command: Command) -> Result<Vec<AppointmentView>, ClientError> {
        let base = format!("/appointments/{}", appointment_id);
        match command {
            Command::Accept => self.send::<(), _>(Method::POST, &format!("{}/accept", base), None).await,
            Command::Reject => self.send::<(), _>(Method::POST, &format!("{}/reject", base), None).await,
            Command::ProposeJob { description, terms, agreed_price } => {
                validate_proposal(&description, agreed_price)?;
                let body = ProposeJobRequest { description, terms, agreed_price };
                self.send(Method::POST, &format!("{}/job", base), Some(&body)).await
            }
            Command::AcceptProposal => self.send::<(), _>(Method::POST, &format!("{}/job/accept", base), None).await,
            Command::Finalize => self.send::<(), _>(Method::POST, &format!("{}/job/finalize", base), None).await,
            Command::Confirm => self.send::<(), _>(Method::POST, &format!("{}/job/confirm", base), None).await,
            Command::Rate { score, comment } => {
                validate_rating(score, comment.as_deref())?;
                let body = RateJobRequest { score, comment };
                self.send(Method::POST, &format!("{}/job/rate", base), Some(&body)).await
            }
        }
    }

    pub async fn export_ics(&self, appointment_id: &str) -> Result<String, ClientError> {
        let resp = self.authed(Method::GET, &format!("/appointments/{}/ics", appointment_id))?
            .send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::failure(status, resp).await);
        }
        Ok(resp.text().await?)
    }
}
