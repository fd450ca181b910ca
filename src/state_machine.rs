//! # Feature: Conversation Flow
//!
//! Pure transition function for the lead-capture dialogue. Given the current
//! state and one visitor event it decides the next step, what to record about
//! the visitor, and what the bot says back. No I/O, no clock, no randomness.
//!
//! ```text
//! greeting --initialize--> faq_mode <--> (free-text FAQ answers)
//!     any --demo--> ask_project_type --personal|business--> ask_name
//!     ask_name --text--> ask_email --valid email--> ask_reason --text--> collected
//! ```
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial flow with project type, name, email and reason capture

use serde::{Deserialize, Serialize};

use crate::faq::{self, FaqTopic};
use crate::quick_replies::{self, QuickReply};
use crate::responses;
use crate::validation::is_valid_email;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Greeting,
    FaqMode,
    AskProjectType,
    AskName,
    AskEmail,
    AskReason,
    Collected,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Greeting => "greeting",
            Step::FaqMode => "faq_mode",
            Step::AskProjectType => "ask_project_type",
            Step::AskName => "ask_name",
            Step::AskEmail => "ask_email",
            Step::AskReason => "ask_reason",
            Step::Collected => "collected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Personal,
    Business,
}

impl ProjectType {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            quick_replies::PERSONAL => Some(ProjectType::Personal),
            quick_replies::BUSINESS => Some(ProjectType::Business),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Personal => quick_replies::PERSONAL,
            ProjectType::Business => quick_replies::BUSINESS,
        }
    }
}

/// Everything the flow can learn about a visitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub project_type: Option<ProjectType>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub reason: Option<String>,
}

impl UserInfo {
    /// Record one collected attribute. Fields are only ever set, never cleared.
    pub fn apply(&mut self, update: ProfileUpdate) {
        match update {
            ProfileUpdate::None => {}
            ProfileUpdate::ProjectType(kind) => self.project_type = Some(kind),
            ProfileUpdate::Name(name) => self.name = Some(name),
            ProfileUpdate::Email(email) => self.email = Some(email),
            ProfileUpdate::Reason(reason) => self.reason = Some(reason),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.project_type.is_some()
            && self.name.is_some()
            && self.email.is_some()
            && self.reason.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileUpdate {
    None,
    ProjectType(ProjectType),
    Name(String),
    Email(String),
    Reason(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub step: Step,
    pub user_info: UserInfo,
    pub is_typing: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a transition's step and profile change
    pub fn apply(&mut self, step: Step, update: ProfileUpdate) {
        self.step = step;
        self.user_info.apply(update);
    }
}

/// Visitor-side input to the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// First activation of the widget
    Initialize { welcome_message: String },
    /// Free text typed by the visitor
    Text(String),
    /// A quick-reply button was clicked
    QuickReply(QuickReply),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    pub content: String,
    pub quick_replies: Vec<QuickReply>,
}

impl BotReply {
    pub fn new(content: impl Into<String>, quick_replies: Vec<QuickReply>) -> Self {
        BotReply {
            content: content.into(),
            quick_replies,
        }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, Vec::new())
    }
}

/// Result of feeding one event to the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub step: Step,
    pub update: ProfileUpdate,
    pub reply: BotReply,
}

impl Transition {
    fn stay(state: &ConversationState, reply: BotReply) -> Self {
        Transition {
            step: state.step,
            update: ProfileUpdate::None,
            reply,
        }
    }

    fn to(step: Step, update: ProfileUpdate, reply: BotReply) -> Self {
        Transition {
            step,
            update,
            reply,
        }
    }
}

/// Quick-reply values the flow routes on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuickReplyRoute {
    Faq(FaqTopic),
    Demo,
    ProjectType(ProjectType),
    Bye,
}

fn route_quick_reply(state: &ConversationState, value: &str) -> Option<QuickReplyRoute> {
    match value {
        quick_replies::PRICING => Some(QuickReplyRoute::Faq(FaqTopic::Pricing)),
        quick_replies::FEATURES => Some(QuickReplyRoute::Faq(FaqTopic::Features)),
        quick_replies::SUPPORT => Some(QuickReplyRoute::Faq(FaqTopic::Support)),
        quick_replies::DEMO => Some(QuickReplyRoute::Demo),
        quick_replies::BYE => Some(QuickReplyRoute::Bye),
        // Project type only means something while the flow is asking for it
        other if state.step == Step::AskProjectType => {
            ProjectType::from_value(other).map(QuickReplyRoute::ProjectType)
        }
        _ => None,
    }
}

/// Decide the next step, profile change and bot reply for `event`
pub fn advance(state: &ConversationState, event: Event) -> Transition {
    match event {
        Event::Initialize { welcome_message } => Transition::to(
            Step::FaqMode,
            ProfileUpdate::None,
            BotReply::new(welcome_message, quick_replies::initial()),
        ),
        Event::Text(input) => advance_text(state, &input),
        Event::QuickReply(reply) => match route_quick_reply(state, &reply.value) {
            Some(QuickReplyRoute::Faq(topic)) => {
                Transition::stay(state, BotReply::new(topic.response(), quick_replies::initial()))
            }
            Some(QuickReplyRoute::Demo) => Transition::to(
                Step::AskProjectType,
                ProfileUpdate::None,
                BotReply::new(responses::PROJECT_TYPE_PROMPT, quick_replies::project_type()),
            ),
            Some(QuickReplyRoute::ProjectType(kind)) => Transition::to(
                Step::AskName,
                ProfileUpdate::ProjectType(kind),
                BotReply::plain(responses::ASK_NAME),
            ),
            Some(QuickReplyRoute::Bye) => {
                Transition::stay(state, BotReply::plain(responses::GOODBYE_MESSAGE))
            }
            None => advance_text(state, &reply.label),
        },
    }
}

fn advance_text(state: &ConversationState, input: &str) -> Transition {
    let input = input.trim();

    match state.step {
        Step::FaqMode | Step::Collected => {
            let offers = if state.step == Step::Collected {
                quick_replies::post_collection()
            } else {
                quick_replies::initial()
            };
            let content = faq::match_faq(input).unwrap_or(responses::FALLBACK);
            Transition::stay(state, BotReply::new(content, offers))
        }
        Step::AskName => Transition::to(
            Step::AskEmail,
            ProfileUpdate::Name(input.to_string()),
            BotReply::plain(responses::ask_email(input)),
        ),
        Step::AskEmail => {
            if is_valid_email(input) {
                Transition::to(
                    Step::AskReason,
                    ProfileUpdate::Email(input.to_string()),
                    BotReply::plain(responses::ASK_REASON),
                )
            } else {
                Transition::stay(state, BotReply::plain(responses::INVALID_EMAIL))
            }
        }
        Step::AskReason => {
            let name = state
                .user_info
                .name
                .as_deref()
                .unwrap_or(responses::DEFAULT_VISITOR_NAME);
            Transition::to(
                Step::Collected,
                ProfileUpdate::Reason(input.to_string()),
                BotReply::new(responses::collected(name), quick_replies::post_collection()),
            )
        }
        // Free text is not expected here; answer with the fallback and the starting options
        Step::Greeting | Step::AskProjectType => Transition::stay(
            state,
            BotReply::new(responses::FALLBACK, quick_replies::initial()),
        ),
    }
}
