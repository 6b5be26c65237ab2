//! Action names the dialogue engine can invoke and the backend resources they
//! read or write.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionName {
    SessionStart,
    GetAnnouncements,
    GetEvents,
    GetFees,
    GetStudents,
    GetTeachers,
    GetHods,
    GetPrincipalAnnouncements,
    CreateAnnouncement,
    UpdateFromPdf,
}

impl ActionName {
    pub const ALL: [ActionName; 10] = [
        Self::SessionStart,
        Self::GetAnnouncements,
        Self::GetEvents,
        Self::GetFees,
        Self::GetStudents,
        Self::GetTeachers,
        Self::GetHods,
        Self::GetPrincipalAnnouncements,
        Self::CreateAnnouncement,
        Self::UpdateFromPdf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStart => "action_session_start",
            Self::GetAnnouncements => "action_get_announcements",
            Self::GetEvents => "action_get_events",
            Self::GetFees => "action_get_fees",
            Self::GetStudents => "action_get_students",
            Self::GetTeachers => "action_get_teachers",
            Self::GetHods => "action_get_hods",
            Self::GetPrincipalAnnouncements => "action_get_principal_announcements",
            Self::CreateAnnouncement => "action_create_announcement",
            Self::UpdateFromPdf => "action_update_from_pdf",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|action| action.as_str() == normalized)
    }

    /// Resource whose texts are used when this action fails or comes back empty.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Self::GetAnnouncements | Self::GetPrincipalAnnouncements => {
                Some(Resource::Announcements)
            }
            Self::GetEvents => Some(Resource::Events),
            Self::GetFees => Some(Resource::Fees),
            Self::GetStudents => Some(Resource::Students),
            Self::GetTeachers => Some(Resource::Teachers),
            Self::GetHods => Some(Resource::Hods),
            Self::CreateAnnouncement => Some(Resource::NewAnnouncement),
            Self::SessionStart | Self::UpdateFromPdf => None,
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Announcements,
    Events,
    Fees,
    Students,
    Teachers,
    Hods,
    NewAnnouncement,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Announcements => "announcements",
            Self::Events => "events",
            Self::Fees => "fees",
            Self::Students => "students",
            Self::Teachers => "teachers",
            Self::Hods => "hods",
            Self::NewAnnouncement => "new_announcement",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            Self::Announcements => "No announcements available.",
            Self::Events => "No events found.",
            Self::Fees => "No fee records found.",
            Self::Students => "No students found.",
            Self::Teachers => "No teachers found.",
            Self::Hods => "No HODs found.",
            Self::NewAnnouncement => "The announcement was not created.",
        }
    }

    pub fn unavailable_message(&self) -> &'static str {
        match self {
            Self::Announcements => {
                "Sorry, I couldn't fetch announcements. Please try again later."
            }
            Self::Events => "Sorry, I couldn't fetch events. Please try again later.",
            Self::Fees => "Sorry, I couldn't fetch fee records. Please try again later.",
            Self::Students => {
                "Sorry, I couldn't fetch student information. Please try again later."
            }
            Self::Teachers => {
                "Sorry, I couldn't fetch teacher information. Please try again later."
            }
            Self::Hods => "Sorry, I couldn't fetch HOD information. Please try again later.",
            Self::NewAnnouncement => {
                "Sorry, I couldn't post the announcement. Please try again later."
            }
        }
    }

    pub fn formatting_message(&self) -> &'static str {
        match self {
            Self::Announcements => "Sorry, there was an error fetching announcements.",
            Self::Events => "Sorry, there was an error fetching events.",
            Self::Fees => "Sorry, there was an error fetching fee records.",
            Self::Students => "Sorry, there was an error fetching student information.",
            Self::Teachers => "Sorry, there was an error fetching teacher information.",
            Self::Hods => "Sorry, there was an error fetching HOD information.",
            Self::NewAnnouncement => "Sorry, there was an error posting the announcement.",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
