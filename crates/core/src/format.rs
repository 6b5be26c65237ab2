//! Plain-text rendering of backend JSON, one function per resource.
//!
//! Missing fields never fail a message; they render as a placeholder. Only a
//! payload of the wrong overall shape is a [`FormatError`].

use serde_json::Value;
use thiserror::Error;

use crate::announce::AnnouncementDraft;
use crate::catalog::Resource;

pub const LIST_PREVIEW: usize = 10;
pub const GROUP_PREVIEW: usize = 3;

const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN: &str = "Unknown";
const NO_ID: &str = "No ID";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    Items { text: String, count: usize },
    Empty(&'static str),
}

impl Rendered {
    pub fn text(&self) -> &str {
        match self {
            Self::Items { text, .. } => text.as_str(),
            Self::Empty(text) => *text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Items { text, .. } => text,
            Self::Empty(text) => text.to_owned(),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Self::Items { count, .. } => *count,
            Self::Empty(_) => 0,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected a list of {resource}, got {found}")]
    NotAList { resource: &'static str, found: &'static str },
    #[error("expected a {resource} record, got {found}")]
    NotARecord { resource: &'static str, found: &'static str },
}

pub fn format_announcements(payload: &Value) -> Result<Rendered, FormatError> {
    render_list(Resource::Announcements, payload, |items| {
        preview_lines(items, LIST_PREVIEW, "", |item| {
            let message = field(item, "message")
                .or_else(|| field(item, "body"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_owned());
            format!(
                "{} - {}: {message}",
                field_or(item, "branch", NOT_AVAILABLE),
                field_or(item, "year", NOT_AVAILABLE)
            )
        })
    })
}

pub fn format_events(payload: &Value) -> Result<Rendered, FormatError> {
    render_list(Resource::Events, payload, |items| {
        preview_lines(items, LIST_PREVIEW, "", |item| {
            format!(
                "{} ({}) - {}",
                field_or(item, "title", NOT_AVAILABLE),
                field_or(item, "event_date", NOT_AVAILABLE),
                field_or(item, "description", NOT_AVAILABLE)
            )
        })
    })
}

/// The fee endpoint answers with either one record or a list of records; only
/// the first record is shown.
pub fn format_fees(payload: &Value) -> Result<Rendered, FormatError> {
    let record = match payload {
        Value::Null => return Ok(Rendered::Empty(Resource::Fees.empty_message())),
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return Ok(Rendered::Empty(Resource::Fees.empty_message())),
        },
        other => other,
    };

    let Some(object) = record.as_object() else {
        return Err(FormatError::NotARecord {
            resource: Resource::Fees.as_str(),
            found: json_kind(record),
        });
    };
    if object.is_empty() {
        return Ok(Rendered::Empty(Resource::Fees.empty_message()));
    }

    let text = format!(
        "Amount: ₹{}, Status: {}, Year: {}",
        field_or(record, "amount", NOT_AVAILABLE),
        field_or(record, "status", NOT_AVAILABLE),
        field_or(record, "year", NOT_AVAILABLE)
    );
    Ok(Rendered::Items { text, count: 1 })
}

/// Students grouped by `year` in first-seen order, each group capped at
/// [`GROUP_PREVIEW`] names.
pub fn format_students(payload: &Value) -> Result<Rendered, FormatError> {
    render_list(Resource::Students, payload, |items| {
        let mut groups: Vec<(String, Vec<&Value>)> = Vec::new();
        for student in items {
            let year = field_or(student, "year", UNKNOWN);
            match groups.iter_mut().find(|(key, _)| *key == year) {
                Some((_, members)) => members.push(student),
                None => groups.push((year, vec![student])),
            }
        }

        let mut text = format!("Student Information (Total: {} students):\n", items.len());
        for (year, members) in &groups {
            text.push('\n');
            text.push_str(&format!("{year} Year ({} students):\n", members.len()));
            for student in members.iter().take(GROUP_PREVIEW) {
                text.push_str(&format!(
                    "• {} ({})\n",
                    field_or(student, "name", UNKNOWN),
                    field_or(student, "roll_no", NO_ID)
                ));
            }
            if members.len() > GROUP_PREVIEW {
                text.push_str(&format!("  ...and {} more\n", members.len() - GROUP_PREVIEW));
            }
        }
        text.trim_end().to_owned()
    })
}

pub fn format_teachers(payload: &Value) -> Result<Rendered, FormatError> {
    render_list(Resource::Teachers, payload, |items| {
        let header = format!("Teacher Information (Total: {} teachers):\n\n", items.len());
        let body = preview_lines(items, LIST_PREVIEW, " teachers", |teacher| {
            let mut line = format!("• {}", field_or(teacher, "name", UNKNOWN));
            if let Some(subject) = field(teacher, "subject") {
                line.push_str(&format!(" - {subject}"));
            }
            if let Some(email) = field(teacher, "email") {
                line.push_str(&format!(" ({email})"));
            }
            line
        });
        header + &body
    })
}

pub fn format_hods(payload: &Value) -> Result<Rendered, FormatError> {
    render_list(Resource::Hods, payload, |items| {
        let header = format!("HOD Information (Total: {} HODs):\n\n", items.len());
        let body = preview_lines(items, LIST_PREVIEW, " HODs", |hod| {
            let name = field(hod, "name")
                .or_else(|| field(hod, "username"))
                .unwrap_or_else(|| UNKNOWN.to_owned());
            let mut line = format!("• {name}");
            if let Some(email) = field(hod, "email") {
                line.push_str(&format!(" ({email})"));
            }
            if let Some(contact) = field(hod, "contact") {
                line.push_str(&format!(", Contact: {contact}"));
            }
            if let Some(branch) = field(hod, "branch") {
                line.push_str(&format!(", Branch: {branch}"));
            }
            line
        });
        header + &body
    })
}

pub fn announcement_posted(draft: &AnnouncementDraft) -> String {
    format!("Announcement \"{}\" has been posted to {}.", draft.title, draft.target_audience)
}

fn render_list<F>(resource: Resource, payload: &Value, render: F) -> Result<Rendered, FormatError>
where
    F: FnOnce(&[Value]) -> String,
{
    match payload {
        Value::Null => Ok(Rendered::Empty(resource.empty_message())),
        Value::Array(items) if items.is_empty() => Ok(Rendered::Empty(resource.empty_message())),
        Value::Array(items) => Ok(Rendered::Items { text: render(items), count: items.len() }),
        other => {
            Err(FormatError::NotAList { resource: resource.as_str(), found: json_kind(other) })
        }
    }
}

fn preview_lines<F>(items: &[Value], limit: usize, noun: &str, line: F) -> String
where
    F: Fn(&Value) -> String,
{
    let mut lines = items.iter().take(limit).map(line).collect::<Vec<_>>();
    if items.len() > limit {
        lines.push(format!("...and {} more{noun}", items.len() - limit));
    }
    lines.join("\n")
}

/// Scalar field as display text; null, blank and structured values count as
/// missing.
fn field(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn field_or(item: &Value, key: &str, placeholder: &str) -> String {
    field(item, key).unwrap_or_else(|| placeholder.to_owned())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
