use serde_json::{json, Value};
use smartedu_core::{
    extract_announcement,
    format::{self, Rendered},
    AccessDecision, AccessPolicy, ActionError, ActionName, FormatError, Resource, Role,
    SessionMetadata, SessionSlots,
};
use smartedu_gateway::{BackendGateway, GatewayError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::events::TurnEvent;

pub const ANNOUNCEMENT_PROMPT: &str = "Please tell me what the announcement should say.";
pub const ROLL_NUMBER_PROMPT: &str =
    "I need your roll number to look up fee records. Please log in again.";
pub const PDF_UPDATE_MESSAGE: &str = "PDF data update feature is currently under development. \
    Please contact the system administrator for manual data updates.";

/// One recognized intent plus everything its handler may read.
#[derive(Clone, Debug)]
pub struct ActionRequest {
    pub action: ActionName,
    pub session: SessionSlots,
    pub text: Option<String>,
    pub metadata: Option<SessionMetadata>,
    pub correlation_id: String,
}

impl ActionRequest {
    pub fn new(action: ActionName, session: SessionSlots) -> Self {
        Self {
            action,
            session,
            text: None,
            metadata: None,
            correlation_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_metadata(mut self, metadata: SessionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Answered { count: usize },
    Empty,
    Failed(ActionError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionResponse {
    /// `None` only for session start, which answers with events alone.
    pub text: Option<String>,
    pub events: Vec<TurnEvent>,
    pub outcome: TurnOutcome,
}

impl ActionResponse {
    fn reply(rendered: Rendered) -> Self {
        let outcome = match &rendered {
            Rendered::Items { count, .. } => TurnOutcome::Answered { count: *count },
            Rendered::Empty(_) => TurnOutcome::Empty,
        };
        Self { text: Some(rendered.into_text()), events: Vec::new(), outcome }
    }

    fn failure(error: ActionError) -> Self {
        Self {
            text: Some(error.user_message().to_owned()),
            events: Vec::new(),
            outcome: TurnOutcome::Failed(error),
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match &self.outcome {
            TurnOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Routes each action through the access policy, at most one backend call and
/// the matching formatter.
pub struct ActionDispatcher<G> {
    gateway: G,
    policy: AccessPolicy,
}

impl<G> ActionDispatcher<G>
where
    G: BackendGateway,
{
    pub fn new(gateway: G) -> Self {
        Self { gateway, policy: AccessPolicy::default() }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn dispatch(&self, request: ActionRequest) -> ActionResponse {
        if request.action == ActionName::SessionStart {
            return start_session(&request);
        }

        let response = match self.policy.evaluate(request.action, &request.session) {
            AccessDecision::Allow => match self.run(&request).await {
                Ok(rendered) => ActionResponse::reply(rendered),
                Err(error) => ActionResponse::failure(error),
            },
            AccessDecision::Deny { reason_code, user_message } => {
                let error = if reason_code == "authentication_missing" {
                    ActionError::AuthenticationMissing { action: request.action, user_message }
                } else {
                    ActionError::AuthorizationDenied {
                        action: request.action,
                        role: request.session.role.clone(),
                        user_message,
                    }
                };
                ActionResponse::failure(error)
            }
        };

        log_outcome(&request, &response.outcome);
        response
    }

    async fn run(&self, request: &ActionRequest) -> Result<Rendered, ActionError> {
        let session = &request.session;
        let token = session.token();

        match request.action {
            ActionName::GetAnnouncements => {
                let mut query = Vec::new();
                if session.role() == Some(Role::Teacher) {
                    if let Some(branch) = session.branch.as_deref() {
                        query.push(("branch", branch));
                    }
                }
                let payload =
                    self.fetch(Resource::Announcements, "/announcements", &query, token).await?;
                render(Resource::Announcements, format::format_announcements(&payload))
            }
            ActionName::GetEvents => {
                let payload = self.fetch(Resource::Events, "/events", &[], token).await?;
                render(Resource::Events, format::format_events(&payload))
            }
            ActionName::GetFees => {
                let roll_no =
                    session.roll_no.as_deref().map(str::trim).filter(|roll| !roll.is_empty());
                let Some(roll_no) = roll_no else {
                    return Err(ActionError::MalformedInput {
                        action: request.action,
                        prompt: ROLL_NUMBER_PROMPT,
                    });
                };
                let path = format!("/fees/{}", urlencoding::encode(roll_no));
                match self.gateway.fetch(&path, &[], token).await {
                    Ok(payload) => render(Resource::Fees, format::format_fees(&payload)),
                    // The fee endpoint answers 404 when a student has no records.
                    Err(GatewayError::NotFound { .. }) => {
                        Ok(Rendered::Empty(Resource::Fees.empty_message()))
                    }
                    Err(error) => Err(unavailable(Resource::Fees, error)),
                }
            }
            ActionName::GetStudents => {
                let payload = self.fetch(Resource::Students, "/students/all", &[], token).await?;
                render(Resource::Students, format::format_students(&payload))
            }
            ActionName::GetTeachers => {
                let payload = self.fetch(Resource::Teachers, "/teachers", &[], token).await?;
                render(Resource::Teachers, format::format_teachers(&payload))
            }
            ActionName::GetHods => {
                let payload = self.fetch(Resource::Hods, "/principal/hods", &[], token).await?;
                render(Resource::Hods, format::format_hods(&payload))
            }
            ActionName::GetPrincipalAnnouncements => {
                let payload = self
                    .fetch(Resource::Announcements, "/principal/announcements", &[], token)
                    .await?;
                render(Resource::Announcements, format::format_announcements(&payload))
            }
            ActionName::CreateAnnouncement => {
                let text = request.text.as_deref().unwrap_or_default();
                let draft = extract_announcement(text).map_err(|_| ActionError::MalformedInput {
                    action: request.action,
                    prompt: ANNOUNCEMENT_PROMPT,
                })?;
                let body = json!({
                    "title": draft.title,
                    "message": draft.message,
                    "target_audience": draft.target_audience,
                });
                self.gateway
                    .submit("/principal/announcements", &body, token)
                    .await
                    .map_err(|error| unavailable(Resource::NewAnnouncement, error))?;
                Ok(Rendered::Items { text: format::announcement_posted(&draft), count: 1 })
            }
            ActionName::UpdateFromPdf => {
                Ok(Rendered::Items { text: PDF_UPDATE_MESSAGE.to_owned(), count: 0 })
            }
            // Handled before authorization in `dispatch`.
            ActionName::SessionStart => Ok(Rendered::Items { text: String::new(), count: 0 }),
        }
    }

    async fn fetch(
        &self,
        resource: Resource,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<Value, ActionError> {
        self.gateway.fetch(path, query, token).await.map_err(|error| unavailable(resource, error))
    }
}

fn start_session(request: &ActionRequest) -> ActionResponse {
    let updates = request.metadata.as_ref().map(SessionMetadata::slot_updates).unwrap_or_default();
    let slot_names = updates.iter().map(|update| update.name).collect::<Vec<_>>();

    let mut events = Vec::with_capacity(updates.len() + 2);
    events.push(TurnEvent::SessionStarted);
    events.extend(updates.into_iter().map(TurnEvent::from));
    events.push(TurnEvent::listen());

    debug!(
        event_name = "actions.session.started",
        correlation_id = %request.correlation_id,
        slots = ?slot_names,
        "session initialized"
    );

    ActionResponse {
        text: None,
        events,
        outcome: TurnOutcome::Answered { count: slot_names.len() },
    }
}

fn render(
    resource: Resource,
    result: Result<Rendered, FormatError>,
) -> Result<Rendered, ActionError> {
    result.map_err(|source| ActionError::Formatting { resource, source })
}

fn unavailable(resource: Resource, error: GatewayError) -> ActionError {
    ActionError::BackendUnavailable { resource, detail: error.to_string() }
}

fn log_outcome(request: &ActionRequest, outcome: &TurnOutcome) {
    let action = request.action.as_str();
    let correlation_id = request.correlation_id.as_str();

    match outcome {
        TurnOutcome::Answered { count } => debug!(
            event_name = "actions.turn.answered",
            correlation_id,
            action,
            count,
            "action answered"
        ),
        TurnOutcome::Empty => debug!(
            event_name = "actions.turn.empty",
            correlation_id,
            action,
            "backend returned no records"
        ),
        TurnOutcome::Failed(
            error @ (ActionError::AuthenticationMissing { .. }
            | ActionError::AuthorizationDenied { .. }),
        ) => info!(
            event_name = "actions.turn.denied",
            correlation_id,
            action,
            role = request.session.role.as_deref().unwrap_or("none"),
            error_class = error.error_class(),
            "action denied"
        ),
        TurnOutcome::Failed(error @ ActionError::MalformedInput { .. }) => info!(
            event_name = "actions.turn.malformed_input",
            correlation_id,
            action,
            error_class = error.error_class(),
            "action needs more input"
        ),
        TurnOutcome::Failed(error) => warn!(
            event_name = "actions.turn.failed",
            correlation_id,
            action,
            resource = request.action.resource().map_or("none", |resource| resource.as_str()),
            error_class = error.error_class(),
            error = %error,
            "action failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use smartedu_core::{ActionError, ActionName, Resource, SessionMetadata, SessionSlots};
    use smartedu_gateway::{BackendGateway, GatewayError, StatusCode};

    use super::{
        ActionDispatcher, ActionRequest, TurnOutcome, ANNOUNCEMENT_PROMPT, PDF_UPDATE_MESSAGE,
        ROLL_NUMBER_PROMPT,
    };
    use crate::events::TurnEvent;

    #[derive(Clone, Debug, PartialEq)]
    struct Call {
        method: &'static str,
        path: String,
        query: Vec<(String, String)>,
        token: Option<String>,
        body: Option<Value>,
    }

    struct RecordingGateway {
        reply: Result<Value, GatewayError>,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingGateway {
        fn answering(payload: Value) -> Self {
            Self { reply: Ok(payload), calls: Mutex::new(Vec::new()) }
        }

        fn failing(error: GatewayError) -> Self {
            Self { reply: Err(error), calls: Mutex::new(Vec::new()) }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl BackendGateway for RecordingGateway {
        async fn fetch(
            &self,
            path: &str,
            query: &[(&str, &str)],
            token: Option<&str>,
        ) -> Result<Value, GatewayError> {
            self.calls.lock().expect("calls lock").push(Call {
                method: "GET",
                path: path.to_owned(),
                query: query.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
                token: token.map(str::to_owned),
                body: None,
            });
            self.reply.clone()
        }

        async fn submit(
            &self,
            path: &str,
            body: &Value,
            token: Option<&str>,
        ) -> Result<StatusCode, GatewayError> {
            self.calls.lock().expect("calls lock").push(Call {
                method: "POST",
                path: path.to_owned(),
                query: Vec::new(),
                token: token.map(str::to_owned),
                body: Some(body.clone()),
            });
            self.reply.clone().map(|_| StatusCode::CREATED)
        }
    }

    fn session(metadata: Value) -> SessionSlots {
        let mut slots = SessionSlots::default();
        slots.apply(&SessionMetadata::from_json(&metadata).slot_updates());
        slots
    }

    async fn dispatch(
        gateway: RecordingGateway,
        request: ActionRequest,
    ) -> (super::ActionResponse, Vec<Call>) {
        let dispatcher = ActionDispatcher::new(gateway);
        let response = dispatcher.dispatch(request).await;
        (response, dispatcher.gateway().calls())
    }

    #[tokio::test]
    async fn wrong_role_never_reaches_the_gateway() {
        let cases = [
            (
                ActionName::GetStudents,
                "teacher",
                "Student information is only available for HODs.",
            ),
            (
                ActionName::GetTeachers,
                "principal",
                "Teacher information is only available for HODs.",
            ),
            (ActionName::GetHods, "hod", "HOD information is only available for the principal."),
            (
                ActionName::GetPrincipalAnnouncements,
                "student",
                "Announcement management is only available for the principal.",
            ),
            (
                ActionName::CreateAnnouncement,
                "teacher",
                "Only the principal can make announcements.",
            ),
            (
                ActionName::UpdateFromPdf,
                "student",
                "PDF data updates are only available for administrators.",
            ),
        ];

        for (action, role, denial) in cases {
            let request = ActionRequest::new(action, session(json!({"role": role, "token": "t"})))
                .with_text("make announcement: exams");
            let (response, calls) = dispatch(RecordingGateway::answering(json!([])), request).await;

            assert_eq!(response.text.as_deref(), Some(denial), "{action}");
            assert!(calls.is_empty(), "{action} reached the gateway");
            assert!(matches!(
                response.outcome,
                TurnOutcome::Failed(ActionError::AuthorizationDenied { .. })
            ));
        }
    }

    #[tokio::test]
    async fn missing_token_asks_to_log_in() {
        let request =
            ActionRequest::new(ActionName::GetHods, session(json!({"role": "principal"})));
        let (response, calls) = dispatch(RecordingGateway::answering(json!([])), request).await;

        assert_eq!(response.text.as_deref(), Some("Please log in to view HOD information."));
        assert_eq!(response.error().map(ActionError::error_class), Some("authentication_missing"));
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn teacher_announcements_are_filtered_by_branch() {
        let payload = json!([{"branch": "CSE", "year": "2", "message": "Lab closed"}]);
        let request = ActionRequest::new(
            ActionName::GetAnnouncements,
            session(json!({"role": "Teacher", "branch": "CSE", "token": "jwt"})),
        );
        let (response, calls) = dispatch(RecordingGateway::answering(payload), request).await;

        assert_eq!(response.text.as_deref(), Some("CSE - 2: Lab closed"));
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/announcements");
        assert_eq!(calls[0].query, vec![("branch".to_owned(), "CSE".to_owned())]);
        assert_eq!(calls[0].token.as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn anonymous_announcements_go_unfiltered_without_token() {
        let request = ActionRequest::new(
            ActionName::GetAnnouncements,
            session(json!({"role": "student", "branch": "CSE"})),
        );
        let (response, calls) = dispatch(RecordingGateway::answering(json!([])), request).await;

        assert_eq!(response.text.as_deref(), Some("No announcements available."));
        assert_eq!(response.outcome, TurnOutcome::Empty);
        assert!(calls[0].query.is_empty());
        assert_eq!(calls[0].token, None);
    }

    #[tokio::test]
    async fn backend_timeout_yields_one_apology() {
        let gateway = RecordingGateway::failing(GatewayError::Timeout {
            path: "/events".to_owned(),
            timeout_ms: 10_000,
        });
        let request = ActionRequest::new(ActionName::GetEvents, SessionSlots::default());
        let (response, calls) = dispatch(gateway, request).await;

        assert_eq!(
            response.text.as_deref(),
            Some("Sorry, I couldn't fetch events. Please try again later.")
        );
        assert_eq!(calls.len(), 1);
        assert!(response.events.is_empty());
    }

    #[tokio::test]
    async fn fees_use_first_record_and_encoded_roll_number() {
        let payload = json!([{"amount": 100, "status": "paid"}]);
        let request =
            ActionRequest::new(ActionName::GetFees, session(json!({"roll_no": "21 CS/07"})));
        let (response, calls) = dispatch(RecordingGateway::answering(payload), request).await;

        assert_eq!(response.text.as_deref(), Some("Amount: ₹100, Status: paid, Year: N/A"));
        assert_eq!(calls[0].path, "/fees/21%20CS%2F07");
    }

    #[tokio::test]
    async fn missing_fee_records_are_not_an_error() {
        let gateway =
            RecordingGateway::failing(GatewayError::NotFound { path: "/fees/7".to_owned() });
        let request = ActionRequest::new(ActionName::GetFees, session(json!({"roll_no": 7})));
        let (response, _) = dispatch(gateway, request).await;

        assert_eq!(response.text.as_deref(), Some("No fee records found."));
        assert_eq!(response.outcome, TurnOutcome::Empty);
    }

    #[tokio::test]
    async fn fees_without_roll_number_prompt_instead_of_calling() {
        let request = ActionRequest::new(ActionName::GetFees, session(json!({"role": "student"})));
        let (response, calls) = dispatch(RecordingGateway::answering(json!([])), request).await;

        assert_eq!(response.text.as_deref(), Some(ROLL_NUMBER_PROMPT));
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn non_list_payload_degrades_to_generic_error_text() {
        let request = ActionRequest::new(
            ActionName::GetStudents,
            session(json!({"role": "hod", "token": "t"})),
        );
        let gateway = RecordingGateway::answering(json!({"msg": "Server error"}));
        let (response, calls) = dispatch(gateway, request).await;

        assert_eq!(calls[0].path, "/students/all");
        assert_eq!(
            response.text.as_deref(),
            Some("Sorry, there was an error fetching student information.")
        );
        assert_eq!(response.error().map(ActionError::error_class), Some("formatting"));
    }

    #[tokio::test]
    async fn principal_reads_hods() {
        let payload = json!([{"username": "rao", "email": "rao@college.edu", "branch": "ECE"}]);
        let request = ActionRequest::new(
            ActionName::GetHods,
            session(json!({"role": "principal", "token": "t"})),
        );
        let (response, calls) = dispatch(RecordingGateway::answering(payload), request).await;

        assert_eq!(calls[0].path, "/principal/hods");
        assert_eq!(
            response.text.as_deref(),
            Some("HOD Information (Total: 1 HODs):\n\n• rao (rao@college.edu), Branch: ECE")
        );
    }

    #[tokio::test]
    async fn hod_reads_teachers() {
        let payload = json!([{"name": "Asha", "subject": "Maths", "email": "asha@college.edu"}]);
        let request = ActionRequest::new(
            ActionName::GetTeachers,
            session(json!({"role": "hod", "branch": "CSE", "token": "jwt"})),
        );
        let (response, calls) = dispatch(RecordingGateway::answering(payload), request).await;

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].path, "/teachers");
        assert!(calls[0].query.is_empty());
        assert_eq!(calls[0].token.as_deref(), Some("jwt"));
        assert_eq!(
            response.text.as_deref(),
            Some("Teacher Information (Total: 1 teachers):\n\n• Asha - Maths (asha@college.edu)")
        );
        assert_eq!(response.outcome, TurnOutcome::Answered { count: 1 });
    }

    #[tokio::test]
    async fn principal_reads_managed_announcements_without_branch_filter() {
        let payload = json!([
            {"branch": "CSE", "year": 3, "message": "Exam schedule out"},
            {"branch": "ECE", "year": "1", "message": "Orientation on Monday"}
        ]);
        let request = ActionRequest::new(
            ActionName::GetPrincipalAnnouncements,
            session(json!({"role": "principal", "branch": "CSE", "token": "jwt"})),
        );
        let (response, calls) = dispatch(RecordingGateway::answering(payload), request).await;

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].path, "/principal/announcements");
        assert!(calls[0].query.is_empty());
        assert_eq!(calls[0].token.as_deref(), Some("jwt"));
        assert_eq!(
            response.text.as_deref(),
            Some("CSE - 3: Exam schedule out\nECE - 1: Orientation on Monday")
        );
    }

    #[tokio::test]
    async fn empty_managed_announcements_use_the_empty_text() {
        let request = ActionRequest::new(
            ActionName::GetPrincipalAnnouncements,
            session(json!({"role": "principal", "token": "jwt"})),
        );
        let (response, _) = dispatch(RecordingGateway::answering(json!([])), request).await;

        assert_eq!(response.outcome, TurnOutcome::Empty);
        assert_eq!(response.text.as_deref(), Some(Resource::Announcements.empty_message()));
    }

    #[tokio::test]
    async fn announcement_is_extracted_and_posted() {
        let request = ActionRequest::new(
            ActionName::CreateAnnouncement,
            session(json!({"role": "principal", "token": "jwt"})),
        )
        .with_text("Please make announcement: exams start Monday");
        let (response, calls) = dispatch(RecordingGateway::answering(Value::Null), request).await;

        assert_eq!(
            response.text.as_deref(),
            Some("Announcement \"exams start Monday\" has been posted to all.")
        );
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "/principal/announcements");
        assert_eq!(
            calls[0].body,
            Some(json!({
                "title": "exams start Monday",
                "message": "exams start Monday",
                "target_audience": "all"
            }))
        );
    }

    #[tokio::test]
    async fn blank_announcement_prompts_for_text() {
        let request = ActionRequest::new(
            ActionName::CreateAnnouncement,
            session(json!({"role": "principal", "token": "jwt"})),
        )
        .with_text("   ");
        let (response, calls) = dispatch(RecordingGateway::answering(Value::Null), request).await;

        assert_eq!(response.text.as_deref(), Some(ANNOUNCEMENT_PROMPT));
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn failed_announcement_post_apologizes() {
        let gateway = RecordingGateway::failing(GatewayError::Status {
            path: "/principal/announcements".to_owned(),
            status: 500,
        });
        let request = ActionRequest::new(
            ActionName::CreateAnnouncement,
            session(json!({"role": "principal", "token": "jwt"})),
        )
        .with_text("announce holiday tomorrow");
        let (response, _) = dispatch(gateway, request).await;

        assert_eq!(
            response.text.as_deref(),
            Some("Sorry, I couldn't post the announcement. Please try again later.")
        );
    }

    #[tokio::test]
    async fn pdf_update_answers_without_backend_call() {
        let request = ActionRequest::new(
            ActionName::UpdateFromPdf,
            session(json!({"role": "admin", "token": "t"})),
        );
        let (response, calls) = dispatch(RecordingGateway::answering(json!([])), request).await;

        assert_eq!(response.text.as_deref(), Some(PDF_UPDATE_MESSAGE));
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn session_start_emits_slot_events_between_markers() {
        let metadata = SessionMetadata::from_json(&json!({"role": "hod", "branch": "CS"}));
        let request = ActionRequest::new(ActionName::SessionStart, SessionSlots::default())
            .with_metadata(metadata);
        let (response, calls) = dispatch(RecordingGateway::answering(json!([])), request).await;

        assert_eq!(response.text, None);
        assert!(calls.is_empty());
        assert_eq!(
            response.events,
            vec![
                TurnEvent::SessionStarted,
                TurnEvent::Slot { name: "user_role".to_owned(), value: "hod".to_owned() },
                TurnEvent::Slot { name: "branch".to_owned(), value: "CS".to_owned() },
                TurnEvent::listen(),
            ]
        );
    }

    #[tokio::test]
    async fn session_start_without_role_sets_no_role_slot() {
        let metadata = SessionMetadata::from_json(&json!({"branch": "CS"}));
        let request = ActionRequest::new(ActionName::SessionStart, SessionSlots::default())
            .with_metadata(metadata.clone());
        let (first, _) = dispatch(RecordingGateway::answering(json!([])), request).await;
        let repeat = ActionRequest::new(ActionName::SessionStart, SessionSlots::default())
            .with_metadata(metadata);
        let (second, _) = dispatch(RecordingGateway::answering(json!([])), repeat).await;

        assert!(!first
            .events
            .iter()
            .any(|event| matches!(event, TurnEvent::Slot { name, .. } if name == "user_role")));
        assert_eq!(first.events, second.events);
    }

    #[tokio::test]
    async fn session_start_without_metadata_is_not_a_failure() {
        let request = ActionRequest::new(ActionName::SessionStart, SessionSlots::default());
        let (response, _) = dispatch(RecordingGateway::answering(json!([])), request).await;

        assert_eq!(response.events, vec![TurnEvent::SessionStarted, TurnEvent::listen()]);
        assert_eq!(response.error(), None);
    }
}
