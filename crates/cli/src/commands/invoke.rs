use clap::Args;
use smartedu_actions::{ActionDispatcher, ActionRequest, ActionResponse, TurnEvent};
use smartedu_core::config::{AppConfig, LoadOptions};
use smartedu_core::{ActionName, SessionMetadata, SessionSlots};
use smartedu_gateway::HttpBackendGateway;

use super::CommandResult;

const COMMAND: &str = "invoke";

#[derive(Debug, Clone, Default, Args)]
pub struct InvokeArgs {
    #[arg(help = "Action name, e.g. action_get_events")]
    pub action: String,
    #[arg(long, help = "Caller role (student, teacher, hod, principal, admin)")]
    pub role: Option<String>,
    #[arg(long, help = "Backend session token")]
    pub token: Option<String>,
    #[arg(long)]
    pub branch: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub roll_no: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long, help = "Raw utterance text, used by action_create_announcement")]
    pub text: Option<String>,
    #[arg(long, help = "Emit machine-readable JSON output including tracker events")]
    pub json: bool,
}

impl InvokeArgs {
    fn metadata(&self) -> SessionMetadata {
        SessionMetadata {
            role: self.role.clone(),
            branch: self.branch.clone(),
            year: self.year.clone(),
            roll_no: self.roll_no.clone(),
            username: self.username.clone(),
            token: self.token.clone(),
        }
    }
}

pub fn run(args: InvokeArgs) -> CommandResult {
    let Some(action) = ActionName::parse(&args.action) else {
        return CommandResult::failure(
            COMMAND,
            "unknown_action",
            format!("No registered action found for name '{}'.", args.action),
            2,
        );
    };

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), 2)
        }
    };

    let gateway = match HttpBackendGateway::from_config(&config.backend) {
        Ok(gateway) => gateway,
        Err(error) => return CommandResult::failure(COMMAND, "gateway", error.to_string(), 3),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure(COMMAND, "runtime", error.to_string(), 3),
    };

    let metadata = args.metadata();
    let mut session = SessionSlots::default();
    session.apply(&metadata.slot_updates());

    let mut request = ActionRequest::new(action, session).with_metadata(metadata);
    if let Some(text) = args.text.as_deref() {
        request = request.with_text(text);
    }

    let dispatcher = ActionDispatcher::new(gateway);
    let response = runtime.block_on(dispatcher.dispatch(request));
    render(&response, args.json)
}

fn render(response: &ActionResponse, json_output: bool) -> CommandResult {
    let message = response.text.clone().unwrap_or_else(|| describe_events(&response.events));
    let error_class = response.error().map(|error| error.error_class());
    let exit_code = if error_class.is_some() { 1 } else { 0 };

    if json_output {
        let events = serde_json::to_value(&response.events).unwrap_or_default();
        return CommandResult::with_events(COMMAND, error_class, message, events, exit_code);
    }

    CommandResult { exit_code, output: message }
}

fn describe_events(events: &[TurnEvent]) -> String {
    let slots = events
        .iter()
        .filter_map(|event| match event {
            TurnEvent::Slot { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>();

    if slots.is_empty() {
        "session started; no slots set".to_string()
    } else {
        format!("session started; slots set: {}", slots.join(", "))
    }
}
