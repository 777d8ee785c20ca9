use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::domain::models::{
    appointment::{Appointment, AppointmentStatus},
    availability::AvailabilityBlock,
    time_range::TimeRange,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotRejection {
    #[error("Cannot schedule in the past")]
    InPast,
    #[error("Selected range overlaps an occupied slot ({start} - {end})")]
    Conflict { start: DateTime<Utc>, end: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    OpenBlock,
    Blockout,
    Appointment(AppointmentStatus),
}

impl EntryKind {
    pub fn is_blocking(&self) -> bool {
        match self {
            EntryKind::OpenBlock => false,
            EntryKind::Blockout => true,
            EntryKind::Appointment(status) => status.is_blocking(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub range: TimeRange,
    pub kind: EntryKind,
}

impl From<&AvailabilityBlock> for CalendarEntry {
    fn from(block: &AvailabilityBlock) -> Self {
        let kind = if block.is_blockout { EntryKind::Blockout } else { EntryKind::OpenBlock };
        Self { range: block.range(), kind }
    }
}

impl From<&Appointment> for CalendarEntry {
    fn from(appt: &Appointment) -> Self {
        Self { range: appt.range(), kind: EntryKind::Appointment(appt.status) }
    }
}

pub fn entries_for(blocks: &[AvailabilityBlock], appointments: &[Appointment]) -> Vec<CalendarEntry> {
    blocks.iter().map(CalendarEntry::from)
        .chain(appointments.iter().map(CalendarEntry::from))
        .collect()
}

pub fn find_conflict<'a>(candidate: &TimeRange, entries: &'a [CalendarEntry]) -> Option<&'a CalendarEntry> {
    entries.iter().find(|e| e.kind.is_blocking() && e.range.overlaps(candidate))
}

/// A start exactly at `now` is accepted; only strictly earlier starts are past.
pub fn check_candidate(candidate: &TimeRange, now: DateTime<Utc>, entries: &[CalendarEntry]) -> Result<(), SlotRejection> {
    if candidate.starts_before(now) {
        return Err(SlotRejection::InPast);
    }
    if let Some(conflict) = find_conflict(candidate, entries) {
        return Err(SlotRejection::Conflict {
            start: conflict.range.start,
            end: conflict.range.end,
        });
    }
    Ok(())
}
