//! Action dispatch for the SmartEdu assistant.
//!
//! - `dispatcher` - authorization, one backend call and formatting per turn
//! - `events` - tracker events handed back to the dialogue engine

pub mod dispatcher;
pub mod events;

pub use dispatcher::{ActionDispatcher, ActionRequest, ActionResponse, TurnOutcome};
pub use events::TurnEvent;
