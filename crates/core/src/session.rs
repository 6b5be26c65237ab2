//! Per-conversation identity slots.
//!
//! Slots are written once at session start from caller metadata and are read
//! as an immutable snapshot by every later action in the conversation.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SLOT_USER_ROLE: &str = "user_role";
pub const SLOT_BRANCH: &str = "branch";
pub const SLOT_YEAR: &str = "year";
pub const SLOT_ROLL_NO: &str = "roll_no";
pub const SLOT_USERNAME: &str = "username";
pub const SLOT_USER_TOKEN: &str = "user_token";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Teacher,
    Hod,
    Principal,
    Admin,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            "hod" => Some(Self::Hod),
            "principal" => Some(Self::Principal),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Hod => "hod",
            Self::Principal => "principal",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct SessionSlots {
    pub role: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
    pub roll_no: Option<String>,
    pub username: Option<String>,
    pub token: Option<SecretString>,
}

impl SessionSlots {
    /// Reads the identity slots out of a tracker slot map. Null, empty and
    /// non-scalar values count as unset.
    pub fn from_slot_map(slots: &Map<String, Value>) -> Self {
        let read = |name: &str| slots.get(name).and_then(scalar_text);
        Self {
            role: read(SLOT_USER_ROLE),
            branch: read(SLOT_BRANCH),
            year: read(SLOT_YEAR),
            roll_no: read(SLOT_ROLL_NO),
            username: read(SLOT_USERNAME),
            token: read(SLOT_USER_TOKEN).map(SecretString::from),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|token| token.expose_secret()).filter(|t| !t.trim().is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn apply(&mut self, updates: &[SlotUpdate]) {
        for update in updates {
            let value = Some(update.value.clone());
            match update.name {
                SLOT_USER_ROLE => self.role = value,
                SLOT_BRANCH => self.branch = value,
                SLOT_YEAR => self.year = value,
                SLOT_ROLL_NO => self.roll_no = value,
                SLOT_USERNAME => self.username = value,
                SLOT_USER_TOKEN => self.token = value.map(SecretString::from),
                _ => {}
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotUpdate {
    pub name: &'static str,
    pub value: String,
}

/// Caller-supplied identity handed over when a conversation starts.
#[derive(Clone, Default)]
pub struct SessionMetadata {
    pub role: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
    pub roll_no: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
}

impl fmt::Debug for SessionMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionMetadata")
            .field("role", &self.role)
            .field("branch", &self.branch)
            .field("year", &self.year)
            .field("roll_no", &self.roll_no)
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl SessionMetadata {
    /// `role` wins over the `user_role` alias when both are present.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let read = |name: &str| object.get(name).and_then(scalar_text);

        Self {
            role: read("role").or_else(|| read(SLOT_USER_ROLE)),
            branch: read(SLOT_BRANCH),
            year: read(SLOT_YEAR),
            roll_no: read(SLOT_ROLL_NO),
            username: read(SLOT_USERNAME),
            token: read("token").or_else(|| read(SLOT_USER_TOKEN)),
        }
    }

    /// One update per present field, in a fixed order.
    pub fn slot_updates(&self) -> Vec<SlotUpdate> {
        [
            (SLOT_USER_ROLE, &self.role),
            (SLOT_BRANCH, &self.branch),
            (SLOT_YEAR, &self.year),
            (SLOT_ROLL_NO, &self.roll_no),
            (SLOT_USERNAME, &self.username),
            (SLOT_USER_TOKEN, &self.token),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then(|| SlotUpdate { name, value: value.to_owned() })
        })
        .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
