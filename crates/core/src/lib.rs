pub mod announce;
pub mod authz;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod format;
pub mod session;

pub use announce::{extract_announcement, AnnouncementDraft, AnnouncementParseError};
pub use authz::{AccessDecision, AccessPolicy, AccessRule};
pub use catalog::{ActionName, Resource};
pub use errors::ActionError;
pub use format::{FormatError, Rendered};
pub use session::{Role, SessionMetadata, SessionSlots, SlotUpdate};
