use thiserror::Error;

pub const TRIGGER_PHRASES: [&str; 5] = [
    "make announcement",
    "announce",
    "create announcement",
    "make an announcement",
    "post announcement",
];

pub const TITLE_MAX_CHARS: usize = 60;
pub const DEFAULT_TITLE: &str = "Announcement";
pub const DEFAULT_TARGET_AUDIENCE: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnouncementDraft {
    pub title: String,
    pub message: String,
    pub target_audience: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnouncementParseError {
    #[error("announcement text is empty")]
    EmptyBody,
}

/// Pulls the announcement body out of a raw utterance.
///
/// The earliest trigger phrase wins; on a tie the longer phrase wins. A phrase
/// only matches on word boundaries, so neither `announcement` nor `preannounce`
/// triggers on `announce`.
pub fn extract_announcement(text: &str) -> Result<AnnouncementDraft, AnnouncementParseError> {
    let body = match find_trigger(text) {
        Some(end) => trim_leading_separators(&text[end..]),
        None => "",
    };
    let body = if body.is_empty() { text.trim() } else { body };

    if body.is_empty() {
        return Err(AnnouncementParseError::EmptyBody);
    }

    Ok(AnnouncementDraft {
        title: title_for(body),
        message: body.to_owned(),
        target_audience: DEFAULT_TARGET_AUDIENCE.to_owned(),
    })
}

/// First sixty characters of the body with trailing whitespace dropped.
pub fn title_for(body: &str) -> String {
    let title = body.chars().take(TITLE_MAX_CHARS).collect::<String>();
    let title = title.trim();
    if title.is_empty() {
        DEFAULT_TITLE.to_owned()
    } else {
        title.to_owned()
    }
}

/// Byte offset just past the winning trigger phrase.
fn find_trigger(text: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lowered = text.to_ascii_lowercase();

    TRIGGER_PHRASES
        .iter()
        .filter_map(|phrase| {
            lowered
                .match_indices(phrase)
                .map(|(start, _)| start)
                .find(|&start| is_word_bounded(&lowered, start, start + phrase.len()))
                .map(|start| (start, phrase.len()))
        })
        .min_by(|left, right| left.0.cmp(&right.0).then(right.1.cmp(&left.1)))
        .map(|(start, len)| start + len)
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Only whitespace, colons and dashes separate a trigger from its body; quotes
/// and other punctuation belong to the body.
fn trim_leading_separators(text: &str) -> &str {
    text.trim_start_matches(|ch: char| {
        ch.is_whitespace() || matches!(ch, ':' | '-' | '–' | '—')
    })
    .trim_end()
}
