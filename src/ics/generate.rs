//! Encoding shift records into a calendar document.

use chrono::{Local, NaiveDateTime};
use icalendar::{Calendar, Component, EventLike, Property, parser::unfold};
use tracing::debug;

use crate::config::CalendarConfig;
use crate::models::ShiftRecord;

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M00";

/// Generates a calendar document stamped with the current local time.
///
/// See [`generate_at`].
pub fn generate(records: &[ShiftRecord], calendar: &CalendarConfig) -> String {
    generate_at(records, calendar, Local::now().naive_local())
}

/// Generates a calendar document with one `VEVENT` per record.
///
/// Only the first entry of each record is written; records without entries
/// are left out. Lines end with `\n` and are never folded. `stamp` becomes
/// every event's `DTSTAMP`, so equal inputs produce identical output.
///
/// # Example
///
/// ```
/// use shift_calendar::config::CalendarConfig;
/// use shift_calendar::ics::generate_at;
/// use shift_calendar::models::{Position, ShiftEntry, ShiftRecord};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// let record = ShiftRecord::single(
///     "42",
///     date,
///     ShiftEntry::new("08:00 - 16:00".parse().unwrap(), Position::Kitchen),
///     "Main Street",
/// );
/// let doc = generate_at(&[record], &CalendarConfig::default(), date.and_hms_opt(0, 0, 0).unwrap());
///
/// assert!(doc.starts_with("BEGIN:VCALENDAR\nVERSION:2.0\n"));
/// assert!(doc.contains("\nDTSTART:20260105T080000\n"));
/// assert!(doc.contains("\nSTATUS:CONFIRMED\n"));
/// assert!(doc.ends_with("END:VCALENDAR"));
/// ```
pub fn generate_at(
    records: &[ShiftRecord],
    calendar: &CalendarConfig,
    stamp: NaiveDateTime,
) -> String {
    let mut cal = Calendar::new();
    cal.append_property(Property::new("METHOD", "PUBLISH"));
    cal.append_property(Property::new(
        "X-WR-CALNAME",
        single_line(&calendar.calendar_name),
    ));

    let dtstamp = stamp.format(TIMESTAMP_FORMAT).to_string();

    for record in records {
        let Some(entry) = record.first_entry() else {
            debug!(id = %record.id, date = %record.date, "Skipping record without entries");
            continue;
        };
        if record.entries.len() > 1 {
            debug!(
                id = %record.id,
                dropped = record.entries.len() - 1,
                "Only the first entry of a day is written to the calendar"
            );
        }

        let (start, end) = entry.time.on(record.date);

        let mut event = icalendar::Event::new();
        event.uid(&external_uid(&record.id, &calendar.uid_domain));
        event.add_property("DTSTAMP", &dtstamp);
        event.add_property("DTSTART", start.format(TIMESTAMP_FORMAT).to_string());
        event.add_property("DTEND", end.format(TIMESTAMP_FORMAT).to_string());
        event.summary(&format!(
            "{} - {}",
            entry.position.code(),
            single_line(&calendar.venue_label)
        ));
        event.location(&single_line(&record.location));
        event.add_property("STATUS", "CONFIRMED");
        cal.push(event.done());
    }

    finish(&cal.done().to_string(), &calendar.product_id)
}

/// Rewrites the crate's output with `\n` line endings, no folding and our
/// own `PRODID`.
fn finish(document: &str, product_id: &str) -> String {
    unfold(document)
        .lines()
        .map(|line| {
            if line.starts_with("PRODID:") {
                format!("PRODID:{}", single_line(product_id))
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces control characters (line breaks included) with spaces.
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// The `UID` written for a record id.
///
/// Ids that already look like calendar UIDs (they contain `@`) are reused
/// verbatim; anything else is wrapped as `shift-{id}@{domain}`, so the same
/// record always gets the same UID. Control characters are dropped so an id
/// can never start a new content line.
///
/// ```
/// use shift_calendar::ics::external_uid;
///
/// assert_eq!(external_uid("abc@google.com", "example.app"), "abc@google.com");
/// assert_eq!(external_uid("1767600000000", "example.app"), "shift-1767600000000@example.app");
/// assert_eq!(external_uid("x\nSUMMARY:LOB", "example.app"), "shift-xSUMMARY:LOB@example.app");
/// ```
pub fn external_uid(id: &str, domain: &str) -> String {
    let id: String = id.chars().filter(|c| !c.is_control()).collect();
    let domain: String = domain.chars().filter(|c| !c.is_control()).collect();
    if id.contains('@') {
        id
    } else {
        format!("shift-{}@{}", id, domain)
    }
}
