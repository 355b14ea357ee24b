//! Event properties read with the `icalendar` parser.
//!
//! [`read_events`] unfolds the document and hands it to
//! [`icalendar::parser::read_calendar`]. Each `VEVENT` becomes an
//! [`EventFields`] list of uppercased names and trimmed raw values. The
//! parser in `parse.rs` decides what the values mean.

use icalendar::parser::{Property, read_calendar, unfold};
use tracing::debug;

/// The properties of one `VEVENT`, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFields {
    properties: Vec<(String, String)>,
}

impl EventFields {
    fn from_properties(properties: &[Property<'_>]) -> Self {
        Self {
            properties: properties
                .iter()
                .map(|p| {
                    (
                        p.name.as_ref().trim().to_ascii_uppercase(),
                        p.val.as_ref().trim().to_string(),
                    )
                })
                .collect(),
        }
    }

    /// The first non-empty value for `name`, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(name) && !value.is_empty())
            .map(|(_, value)| value.as_str())
    }

    /// Number of properties, including repeats.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true when the event carried no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Reads every `VEVENT` in `document`.
///
/// The whole document is parsed first. When that fails, each
/// `BEGIN:VEVENT`..`END:VEVENT` block is parsed on its own and blocks the
/// parser rejects are dropped, so one bad event does not hide the others.
pub fn read_events(document: &str) -> Vec<EventFields> {
    let unfolded = unfold(document);

    if let Ok(calendar) = read_calendar(&unfolded) {
        // read_calendar unwraps a single VCALENDAR; look one level down too
        return calendar
            .components
            .iter()
            .flat_map(|c| std::iter::once(c).chain(c.components.iter()))
            .filter(|c| c.name.as_ref().eq_ignore_ascii_case("VEVENT"))
            .map(|c| EventFields::from_properties(&c.properties))
            .collect();
    }

    debug!("Calendar did not parse as a whole, reading events one at a time");
    event_blocks(&unfolded)
        .iter()
        .enumerate()
        .filter_map(|(index, block)| match read_calendar(block) {
            Ok(parsed) => parsed
                .components
                .iter()
                .find(|c| c.name.as_ref().eq_ignore_ascii_case("VEVENT"))
                .map(|c| EventFields::from_properties(&c.properties)),
            Err(_) => {
                debug!(index, "Skipping unreadable calendar event");
                None
            }
        })
        .collect()
}

/// Splits unfolded text into standalone `VEVENT` blocks.
fn event_blocks(unfolded: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for line in unfolded.lines() {
        let marker = line.trim();
        if marker.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(String::from("BEGIN:VEVENT\r\n"));
        } else if marker.eq_ignore_ascii_case("END:VEVENT") {
            if let Some(mut block) = current.take() {
                block.push_str("END:VEVENT\r\n");
                blocks.push(block);
            }
        } else if let Some(block) = current.as_mut() {
            block.push_str(line);
            block.push_str("\r\n");
        }
    }
    blocks
}

/// Decodes a TEXT value. `\n` and `\N` become a space; any other escaped
/// character stands for itself.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push(' '),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
