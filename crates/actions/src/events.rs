use serde::Serialize;
use smartedu_core::SlotUpdate;

pub const ACTION_LISTEN: &str = "action_listen";

/// State-update signal handed back to the dialogue engine, serialized in the
/// engine's tracker event shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TurnEvent {
    SessionStarted,
    Slot { name: String, value: String },
    Action { name: String },
}

impl TurnEvent {
    pub fn listen() -> Self {
        Self::Action { name: ACTION_LISTEN.to_owned() }
    }
}

impl From<SlotUpdate> for TurnEvent {
    fn from(update: SlotUpdate) -> Self {
        Self::Slot { name: update.name.to_owned(), value: update.value }
    }
}
