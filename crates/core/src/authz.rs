use crate::catalog::ActionName;
use crate::session::{Role, SessionSlots};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessRule {
    pub action: ActionName,
    pub allowed_roles: &'static [Role],
    pub login_message: &'static str,
    pub denial_message: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny { reason_code: &'static str, user_message: &'static str },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

const PRIVILEGED_RULES: [AccessRule; 6] = [
    AccessRule {
        action: ActionName::GetStudents,
        allowed_roles: &[Role::Hod],
        login_message: "Please log in to view student information.",
        denial_message: "Student information is only available for HODs.",
    },
    AccessRule {
        action: ActionName::GetTeachers,
        allowed_roles: &[Role::Hod],
        login_message: "Please log in to view teacher information.",
        denial_message: "Teacher information is only available for HODs.",
    },
    AccessRule {
        action: ActionName::GetHods,
        allowed_roles: &[Role::Principal],
        login_message: "Please log in to view HOD information.",
        denial_message: "HOD information is only available for the principal.",
    },
    AccessRule {
        action: ActionName::GetPrincipalAnnouncements,
        allowed_roles: &[Role::Principal],
        login_message: "Please log in to view announcements.",
        denial_message: "Announcement management is only available for the principal.",
    },
    AccessRule {
        action: ActionName::CreateAnnouncement,
        allowed_roles: &[Role::Principal],
        login_message: "Please log in to make announcements.",
        denial_message: "Only the principal can make announcements.",
    },
    AccessRule {
        action: ActionName::UpdateFromPdf,
        allowed_roles: &[Role::Admin, Role::Principal],
        login_message: "Please log in to access this feature.",
        denial_message: "PDF data updates are only available for administrators.",
    },
];

/// Role table consulted before any action touches the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self { rules: PRIVILEGED_RULES.to_vec() }
    }
}

impl AccessPolicy {
    pub fn rule(&self, action: ActionName) -> Option<&AccessRule> {
        self.rules.iter().find(|rule| rule.action == action)
    }

    /// Actions without a rule are public.
    pub fn evaluate(&self, action: ActionName, session: &SessionSlots) -> AccessDecision {
        let Some(rule) = self.rule(action) else {
            return AccessDecision::Allow;
        };

        if !session.is_authenticated() {
            return AccessDecision::Deny {
                reason_code: "authentication_missing",
                user_message: rule.login_message,
            };
        }

        match session.role() {
            Some(role) if rule.allowed_roles.contains(&role) => AccessDecision::Allow,
            _ => AccessDecision::Deny {
                reason_code: "role_mismatch",
                user_message: rule.denial_message,
            },
        }
    }
}
