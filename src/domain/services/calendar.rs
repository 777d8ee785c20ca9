use crate::domain::models::{appointment::Appointment, job::Job};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for one appointment.
pub fn generate_ics(appointment: &Appointment, job: Option<&Job>, counterpart_name: &str) -> String {
    let mut calendar = Calendar::new();

    let summary = match job {
        Some(job) => format!("ChamBee: {}", job.description),
        None => format!("ChamBee appointment with {}", counterpart_name),
    };

    let mut ical_event = IcalEvent::new();
    ical_event
        .summary(&summary)
        .starts(appointment.start_time)
        .ends(appointment.end_time)
        .uid(&appointment.id);

    if let Some(notes) = &appointment.notes {
        ical_event.description(notes);
    }

    calendar.push(ical_event.done());
    calendar.to_string()
}
