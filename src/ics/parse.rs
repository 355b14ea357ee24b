//! Decoding calendar documents into shift records.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::debug;

use crate::config::CalendarConfig;
use crate::models::{Position, ShiftEntry, ShiftRecord, TimeRange};

use super::fields::{EventFields, read_events, unescape_text};

/// Hour at which events without a `DTEND` are taken to end.
pub const FALLBACK_END_HOUR: u32 = 23;

fn fallback_end() -> NaiveTime {
    NaiveTime::from_hms_opt(FALLBACK_END_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Parses every well-formed `VEVENT` in `document` into a [`ShiftRecord`].
///
/// Events missing `DTSTART` or `SUMMARY`, or whose start cannot be decoded,
/// are skipped. The result is sorted by date; events on the same date keep
/// their document order.
///
/// # Example
///
/// ```
/// use shift_calendar::config::CalendarConfig;
/// use shift_calendar::ics::parse;
/// use shift_calendar::models::Position;
///
/// let doc = "BEGIN:VCALENDAR\r\n\
///            BEGIN:VEVENT\r\n\
///            UID:abc@example.com\r\n\
///            DTSTART:20251224T080000\r\n\
///            DTEND:20251224T160000\r\n\
///            SUMMARY:CAS - Main Street\r\n\
///            END:VEVENT\r\n\
///            END:VCALENDAR\r\n";
///
/// let records = parse(doc, &CalendarConfig::default());
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].entries[0].position, Position::Cashier);
/// assert_eq!(records[0].entries[0].time.to_string(), "08:00 - 16:00");
/// ```
pub fn parse(document: &str, calendar: &CalendarConfig) -> Vec<ShiftRecord> {
    let batch = Utc::now().timestamp_millis();

    let mut records: Vec<ShiftRecord> = read_events(document)
        .into_iter()
        .enumerate()
        .filter_map(|(index, fields)| {
            let record = decode_event(&fields, calendar, || format!("shift-{}-{}", batch, index));
            if record.is_none() {
                debug!(index, properties = fields.len(), "Skipping malformed calendar event");
            }
            record
        })
        .collect();

    records.sort_by_key(|r| r.date);
    records
}

/// Builds a record from one event's fields, or `None` if required data is missing.
fn decode_event(
    fields: &EventFields,
    calendar: &CalendarConfig,
    synthesize_id: impl FnOnce() -> String,
) -> Option<ShiftRecord> {
    let start = parse_timestamp(fields.get("DTSTART")?)?;
    let summary = unescape_text(fields.get("SUMMARY")?);

    let end = fields
        .get("DTEND")
        .and_then(parse_timestamp)
        .map(|dt| dt.time())
        .unwrap_or_else(fallback_end);

    let location = fields
        .get("LOCATION")
        .map(unescape_text)
        .unwrap_or_else(|| calendar.default_location.clone());

    let id = fields
        .get("UID")
        .map(str::to_string)
        .unwrap_or_else(synthesize_id);

    let entry = ShiftEntry::new(
        TimeRange::new(start.time(), end),
        Position::from_summary(&summary),
    );

    Some(ShiftRecord::single(id, start.date(), entry, location))
}

/// Decodes a `DATE` or `DATE-TIME` value as naive local time.
///
/// Everything other than digits and `T` is dropped (a trailing `Z`, dashes,
/// colons), then the fields are read by position: `YYYYMMDD`, then `HHMM`.
/// The time starts after the `T`; without one, the digits right after the
/// date are taken as the time. Missing hour and minute default to zero;
/// seconds are ignored. No timezone conversion is performed.
///
/// ```
/// use shift_calendar::ics::parse_timestamp;
///
/// let dt = parse_timestamp("20251224T221500Z").unwrap();
/// assert_eq!(dt.to_string(), "2025-12-24 22:15:00");
///
/// let without_separator = parse_timestamp("20251224080000").unwrap();
/// assert_eq!(without_separator.to_string(), "2025-12-24 08:00:00");
///
/// let date_only = parse_timestamp("20251224").unwrap();
/// assert_eq!(date_only.to_string(), "2025-12-24 00:00:00");
///
/// assert!(parse_timestamp("tomorrow").is_none());
/// ```
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'T')
        .collect();

    let date = cleaned.get(0..8)?;
    if !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = date[0..4].parse().ok()?;
    let month: u32 = date[4..6].parse().ok()?;
    let day: u32 = date[6..8].parse().ok()?;

    let rest = &cleaned[8..];
    let time = rest.strip_prefix('T').unwrap_or(rest);
    let field = |from: usize, to: usize| time.get(from..to)?.parse::<u32>().ok();
    let hour = field(0, 2).unwrap_or(0);
    let minute = field(2, 4).unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}
