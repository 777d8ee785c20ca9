use std::sync::Arc;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::domain::{
    models::{
        appointment::{Appointment, AppointmentStatus, NewAppointmentParams},
        availability::AvailabilityBlock,
        time_range::TimeRange,
        user::UserRole,
    },
    ports::{AppointmentRepository, AvailabilityRepository, UserRepository},
    services::overlap::{check_candidate, entries_for, CalendarEntry, EntryKind},
};
use crate::error::AppError;

pub const MAX_DURATION_MIN: i32 = 12 * 60;
pub const MAX_WINDOW_DAYS: u32 = 62;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Available,
    OccupiedPending,
    OccupiedConfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDisplay {
    Background,
    Solid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: EventKind,
    pub display: EventDisplay,
    pub editable: bool,
    pub mine: bool,
}

impl CalendarEvent {
    fn occupied(id: String, title: &str, range: TimeRange, kind: EventKind, mine: bool) -> Self {
        Self {
            id,
            title: title.to_string(),
            start: range.start,
            end: range.end,
            kind,
            display: EventDisplay::Solid,
            editable: false,
            mine,
        }
    }
}

impl From<&CalendarEvent> for CalendarEntry {
    fn from(event: &CalendarEvent) -> Self {
        let kind = match event.kind {
            EventKind::Available => EntryKind::OpenBlock,
            EventKind::OccupiedPending => EntryKind::Appointment(AppointmentStatus::Pending),
            EventKind::OccupiedConfirmed => EntryKind::Appointment(AppointmentStatus::Accepted),
        };
        Self { range: TimeRange { start: event.start, end: event.end }, kind }
    }
}

pub fn project_calendar(blocks: &[AvailabilityBlock], appointments: &[Appointment], viewer: Option<&str>) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = blocks.iter().map(|b| {
        if b.is_blockout {
            CalendarEvent::occupied(b.id.clone(), "Blocked", b.range(), EventKind::OccupiedConfirmed, false)
        } else {
            CalendarEvent {
                id: b.id.clone(),
                title: "Available".to_string(),
                start: b.start_time,
                end: b.end_time,
                kind: EventKind::Available,
                display: EventDisplay::Background,
                editable: false,
                mine: false,
            }
        }
    }).collect();

    for appt in appointments {
        let mine = viewer.is_some_and(|v| v == appt.client_id);
        match appt.status {
            AppointmentStatus::Pending => events.push(
                CalendarEvent::occupied(appt.id.clone(), "Pending", appt.range(), EventKind::OccupiedPending, mine)
            ),
            AppointmentStatus::Accepted => events.push(
                CalendarEvent::occupied(appt.id.clone(), "Booked", appt.range(), EventKind::OccupiedConfirmed, mine)
            ),
            AppointmentStatus::Rejected => {}
        }
    }

    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
    events
}

/// First valid local instant of `date`. Zones that switch to DST at
/// midnight skip 00:00, so later hours are tried.
fn local_day_start(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    (0..3).find_map(|hour| {
        let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
        tz.from_local_datetime(&date.and_time(time)).earliest()
    }).map(|dt| dt.with_timezone(&Utc))
}

pub fn calendar_window(date: NaiveDate, tz: Tz, days: u32) -> Result<TimeRange, AppError> {
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(AppError::Validation(format!("days must be between 1 and {}", MAX_WINDOW_DAYS)));
    }
    let end_date = date.checked_add_days(chrono::Days::new(days as u64))
        .ok_or(AppError::Validation("Date out of range".into()))?;

    let start = local_day_start(date, tz)
        .ok_or(AppError::Validation("Invalid local date".into()))?;
    let end = local_day_start(end_date, tz)
        .ok_or(AppError::Validation("Invalid local date".into()))?;

    Ok(TimeRange::new(start, end)?)
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub provider_id: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

pub struct BookingSelector {
    users: Arc<dyn UserRepository>,
    availability: Arc<dyn AvailabilityRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    default_duration_min: i32,
}

impl BookingSelector {
    pub fn new(
        users: Arc<dyn UserRepository>,
        availability: Arc<dyn AvailabilityRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        default_duration_min: i32,
    ) -> Self {
        Self { users, availability, appointments, default_duration_min }
    }

    async fn ensure_provider(&self, provider_id: &str) -> Result<(), AppError> {
        match self.users.find_by_id(provider_id).await? {
            Some(user) if user.role == UserRole::Provider => Ok(()),
            _ => Err(AppError::NotFound("Provider not found".into())),
        }
    }

    pub async fn calendar(&self, provider_id: &str, window: TimeRange, viewer: Option<&str>) -> Result<Vec<CalendarEvent>, AppError> {
        self.ensure_provider(provider_id).await?;

        let blocks = self.availability.list_by_range(provider_id, window.start, window.end).await?;
        let appointments = self.appointments.list_by_provider_range(provider_id, window.start, window.end).await?;

        Ok(project_calendar(&blocks, &appointments, viewer))
    }

    pub async fn request_appointment(&self, client_id: &str, request: BookingRequest, now: DateTime<Utc>) -> Result<Appointment, AppError> {
        let duration = request.duration_minutes.unwrap_or(self.default_duration_min);
        if duration <= 0 || duration > MAX_DURATION_MIN {
            return Err(AppError::Validation(format!("Duration must be between 1 and {} minutes", MAX_DURATION_MIN)));
        }
        let candidate = TimeRange::from_duration(request.start, duration as i64)?;

        if candidate.starts_before(now) {
            return Err(AppError::Validation("Cannot book in the past".into()));
        }

        self.ensure_provider(&request.provider_id).await?;
        if client_id == request.provider_id {
            return Err(AppError::Forbidden("Providers cannot book their own calendar".into()));
        }

        let blocks = self.availability.list_by_range(&request.provider_id, candidate.start, candidate.end).await?;
        let existing = self.appointments.list_by_provider_range(&request.provider_id, candidate.start, candidate.end).await?;

        check_candidate(&candidate, now, &entries_for(&blocks, &existing))?;

        let appointment = Appointment::new(NewAppointmentParams {
            client_id: client_id.to_string(),
            provider_id: request.provider_id,
            range: candidate,
            notes: request.notes,
        });

        match self.appointments.create_if_free(&appointment).await? {
            Some(created) => {
                info!(appointment_id = %created.id, provider_id = %created.provider_id, "Appointment requested");
                Ok(created)
            }
            None => {
                warn!(provider_id = %appointment.provider_id, start = %appointment.start_time, "Booking lost race for slot");
                Err(AppError::Conflict("Selected time slot is no longer available".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
    }

    fn block(id: &str, a: u32, b: u32, is_blockout: bool) -> AvailabilityBlock {
        AvailabilityBlock {
            id: id.into(),
            provider_id: "p".into(),
            start_time: at(a, 0),
            end_time: at(b, 0),
            is_blockout,
            created_at: at(0, 0),
        }
    }

    fn appointment(id: &str, client: &str, h: u32, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.into(),
            client_id: client.into(),
            provider_id: "p".into(),
            start_time: at(h, 0),
            end_time: at(h + 1, 0),
            duration_minutes: 60,
            notes: None,
            status,
            created_at: at(0, 0),
        }
    }

    #[test]
    fn projection_classifies_three_ways() {
        let blocks = vec![block("open", 8, 18, false), block("off", 12, 13, true)];
        let appts = vec![
            appointment("a1", "alice", 9, AppointmentStatus::Pending),
            appointment("a2", "bob", 10, AppointmentStatus::Accepted),
            appointment("a3", "carol", 11, AppointmentStatus::Rejected),
        ];

        let events = project_calendar(&blocks, &appts, Some("alice"));
        let kinds: Vec<(&str, EventKind)> = events.iter().map(|e| (e.id.as_str(), e.kind)).collect();

        assert_eq!(kinds, vec![
            ("open", EventKind::Available),
            ("a1", EventKind::OccupiedPending),
            ("a2", EventKind::OccupiedConfirmed),
            ("off", EventKind::OccupiedConfirmed),
        ]);

        let open = &events[0];
        assert_eq!(open.display, EventDisplay::Background);
        assert!(events[1..].iter().all(|e| e.display == EventDisplay::Solid && !e.editable));
        assert!(events[1].mine);
        assert!(!events[2].mine);
    }

    #[test]
    fn projection_is_stable_for_identical_input() {
        let blocks = vec![block("open", 8, 18, false)];
        let appts = vec![appointment("a1", "alice", 9, AppointmentStatus::Pending)];
        assert_eq!(project_calendar(&blocks, &appts, None), project_calendar(&blocks, &appts, None));
    }

    #[test]
    fn projected_events_still_block_the_same_ranges() {
        use crate::domain::services::overlap::find_conflict;

        let blocks = vec![block("open", 8, 18, false), block("off", 12, 13, true)];
        let appts = vec![appointment("a1", "alice", 9, AppointmentStatus::Pending)];
        let entries: Vec<CalendarEntry> = project_calendar(&blocks, &appts, None)
            .iter().map(CalendarEntry::from).collect();

        let at_nine = TimeRange::new(at(9, 30), at(10, 0)).unwrap();
        let at_ten = TimeRange::new(at(10, 0), at(11, 0)).unwrap();
        let at_noon = TimeRange::new(at(11, 30), at(12, 30)).unwrap();
        assert!(find_conflict(&at_nine, &entries).is_some());
        assert!(find_conflict(&at_ten, &entries).is_none());
        assert!(find_conflict(&at_noon, &entries).is_some());
    }

    #[test]
    fn window_is_computed_in_local_time() {
        let tz: Tz = "America/Santiago".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let window = calendar_window(date, tz, 7).unwrap();

        // Santiago is UTC-4 in June.
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 6, 1, 4, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 6, 8, 4, 0, 0).unwrap());
    }

    #[test]
    fn window_survives_midnight_dst_gap() {
        // Chile springs forward at 00:00 on 2024-09-08.
        let tz: Tz = "America/Santiago".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        let window = calendar_window(date, tz, 1).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 9, 8, 4, 0, 0).unwrap());
    }

    #[test]
    fn window_rejects_out_of_bounds_day_counts() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(calendar_window(date, chrono_tz::UTC, 0).is_err());
        assert!(calendar_window(date, chrono_tz::UTC, MAX_WINDOW_DAYS + 1).is_err());
    }
}
