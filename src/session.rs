//! # Feature: Chat Session
//!
//! The controller a host UI talks to. A session owns the message log, the
//! conversation state and the offered quick replies, runs the conversation
//! flow synchronously on every submission and hands the bot's answer to the
//! reply scheduler so it appears after a typing delay.
//!
//! Submissions are serialized: the flow always sees the state left by the
//! previous submission, and replies are appended in submission order even when
//! the visitor types faster than the bot answers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial controller with greet-once, reset and cancellable replies

use anyhow::Result;
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::{Position, WidgetConfig};
use crate::message::{Message, MessageLog};
use crate::quick_replies::QuickReply;
use crate::scheduler::{ReplyScheduler, ScheduledReply};
use crate::state_machine::{advance, BotReply, ConversationState, Event, Step, UserInfo};
use crate::timing::TypingDelay;

struct SessionInner {
    log: MessageLog,
    state: ConversationState,
    quick_replies: Vec<QuickReply>,
    has_greeted: bool,
    pending_replies: usize,
    epoch: CancellationToken,
}

/// Everything a host needs to render the widget, in one serializable value
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub bot_name: String,
    pub position: Position,
    pub primary_color: Option<String>,
    pub messages: Vec<Message>,
    pub quick_replies: Vec<QuickReply>,
    pub is_typing: bool,
    pub step: Step,
    pub user_info: UserInfo,
}

pub struct ChatSession {
    id: String,
    config: WidgetConfig,
    typing_delay: TypingDelay,
    inner: Arc<Mutex<SessionInner>>,
    typing: Arc<watch::Sender<bool>>,
    scheduler: ReplyScheduler,
}

impl ChatSession {
    /// Create a session with a random id. Must be called inside a tokio runtime.
    pub fn new(config: WidgetConfig) -> Result<Self> {
        Self::with_id(Uuid::new_v4().to_string(), config)
    }

    pub fn with_id(id: impl Into<String>, config: WidgetConfig) -> Result<Self> {
        config.validate()?;
        let id = id.into();

        let (typing, _) = watch::channel(false);
        let typing = Arc::new(typing);
        let teardown = CancellationToken::new();
        let inner = Arc::new(Mutex::new(SessionInner {
            log: MessageLog::new(),
            state: ConversationState::new(),
            quick_replies: Vec::new(),
            has_greeted: false,
            pending_replies: 0,
            epoch: teardown.child_token(),
        }));

        let scheduler = {
            let inner = inner.clone();
            let typing = typing.clone();
            ReplyScheduler::spawn(teardown, move |job| {
                deliver(inner.clone(), typing.clone(), job)
            })?
        };

        debug!("🆕 Chat session {} created for {}", id, config.bot_name);

        Ok(ChatSession {
            id,
            typing_delay: config.typing_delay(),
            config,
            inner,
            typing,
            scheduler,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Greet the visitor. Only the first call in a session does anything;
    /// returns whether this call greeted.
    pub async fn initialize(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.has_greeted {
            return false;
        }
        inner.has_greeted = true;

        let transition = advance(
            &inner.state,
            Event::Initialize {
                welcome_message: self.config.welcome_message.clone(),
            },
        );
        inner.state.apply(transition.step, transition.update);
        self.enqueue(&mut inner, transition.reply);

        info!("👋 Session {} greeted the visitor", self.id);
        true
    }

    /// Back to a fresh, un-greeted session. Replies still waiting to be
    /// delivered are dropped.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.epoch.cancel();
        inner.epoch = self.scheduler.new_epoch();

        inner.log.clear();
        inner.quick_replies.clear();
        inner.state = ConversationState::new();
        inner.has_greeted = false;
        inner.pending_replies = 0;
        self.typing.send_replace(false);

        info!("🔄 Session {} reset", self.id);
    }

    /// Submit free text typed by the visitor. Blank input is ignored and
    /// returns false.
    pub async fn submit_text(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            debug!("Ignoring blank input in session {}", self.id);
            return false;
        }
        self.dispatch(text.to_string(), Event::Text(text.to_string()))
            .await;
        true
    }

    /// Submit a clicked quick reply. Its label is what shows up in the log.
    pub async fn submit_quick_reply(&self, reply: QuickReply) {
        self.dispatch(reply.label.clone(), Event::QuickReply(reply))
            .await;
    }

    async fn dispatch(&self, echo: String, event: Event) {
        let mut inner = self.inner.lock().await;
        inner.log.push(Message::user(echo));
        inner.quick_replies.clear();

        let previous = inner.state.step;
        let transition = advance(&inner.state, event);
        inner.state.apply(transition.step, transition.update);

        if previous != inner.state.step {
            debug!(
                "Session {} moved {} -> {}",
                self.id,
                previous.as_str(),
                inner.state.step.as_str()
            );
            if inner.state.step == Step::Collected {
                info!("📇 Session {} collected visitor details", self.id);
            }
        }

        self.enqueue(&mut inner, transition.reply);
    }

    fn enqueue(&self, inner: &mut SessionInner, reply: BotReply) {
        if inner.epoch.is_cancelled() {
            debug!("Session {} is shut down, not replying", self.id);
            return;
        }

        let job = ScheduledReply {
            reply,
            delay: self.typing_delay.sample(),
            token: inner.epoch.clone(),
        };
        if self.scheduler.schedule(job) {
            inner.pending_replies += 1;
            inner.state.is_typing = true;
            self.typing.send_replace(true);
        }
    }

    /// Stop delivering replies. Anything still typing is dropped silently.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        self.scheduler.shutdown();
        inner.pending_replies = 0;
        inner.state.is_typing = false;
        self.typing.send_replace(false);
        info!("⏹️ Session {} shut down", self.id);
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.log.messages().to_vec()
    }

    /// Quick replies currently on offer
    pub async fn quick_replies(&self) -> Vec<QuickReply> {
        self.inner.lock().await.quick_replies.clone()
    }

    pub async fn is_typing(&self) -> bool {
        self.inner.lock().await.state.is_typing
    }

    pub async fn state(&self) -> ConversationState {
        self.inner.lock().await.state.clone()
    }

    pub async fn user_info(&self) -> UserInfo {
        self.inner.lock().await.state.user_info.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock().await;
        SessionSnapshot {
            session_id: self.id.clone(),
            bot_name: self.config.bot_name.clone(),
            position: self.config.position,
            primary_color: self.config.primary_color.clone(),
            messages: inner.log.messages().to_vec(),
            quick_replies: inner.quick_replies.clone(),
            is_typing: inner.state.is_typing,
            step: inner.state.step,
            user_info: inner.state.user_info.clone(),
        }
    }

    /// Observe the typing indicator without polling
    pub fn typing_updates(&self) -> watch::Receiver<bool> {
        self.typing.subscribe()
    }

    /// Wait until every scheduled reply has been delivered or dropped
    pub async fn wait_until_idle(&self) {
        let mut updates = self.typing.subscribe();
        // The sender lives as long as the session, so this cannot fail
        let _ = updates.wait_for(|typing| !*typing).await;
    }
}

async fn deliver(inner: Arc<Mutex<SessionInner>>, typing: Arc<watch::Sender<bool>>, job: ScheduledReply) {
    let mut inner = inner.lock().await;
    // A reset may have happened between the delay elapsing and taking the lock
    if job.token.is_cancelled() {
        debug!("🗑️ Dropping reply from a previous conversation");
        return;
    }

    let BotReply {
        content,
        quick_replies,
    } = job.reply;
    inner.log.push(Message::bot(content, quick_replies.clone()));
    inner.quick_replies = quick_replies;
    inner.pending_replies = inner.pending_replies.saturating_sub(1);
    inner.state.is_typing = inner.pending_replies > 0;
    typing.send_replace(inner.state.is_typing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faq;
    use crate::quick_replies;
    use crate::responses;
    use crate::state_machine::ProjectType;
    use std::time::Duration;
    use tokio::time::sleep;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn session() -> ChatSession {
        init_logging();
        ChatSession::new(WidgetConfig::default()).unwrap()
    }

    fn offered(value: &str) -> QuickReply {
        quick_replies::initial()
            .into_iter()
            .chain(quick_replies::post_collection())
            .chain(quick_replies::project_type())
            .find(|r| r.value == value)
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_greets_once() {
        let session = session();
        assert!(session.initialize().await);
        assert!(!session.initialize().await);

        session.wait_until_idle().await;
        let messages = session.messages().await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_from_bot());
        assert_eq!(messages[0].content(), responses::WELCOME_MESSAGE);
        assert_eq!(messages[0].quick_replies().len(), 4);
        assert_eq!(session.quick_replies().await, quick_replies::initial());
        assert_eq!(session.state().await.step, Step::FaqMode);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_appears_after_typing_delay() {
        let session = session();
        session.initialize().await;
        session.wait_until_idle().await;

        assert!(session.submit_text("  What does it cost?  ").await);
        let messages = session.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content(), "  What does it cost?  ");
        assert!(session.quick_replies().await.is_empty());
        assert!(session.is_typing().await);

        // Still typing before the minimum delay
        sleep(Duration::from_millis(600)).await;
        assert!(session.is_typing().await);
        assert_eq!(session.messages().await.len(), 2);

        sleep(Duration::from_millis(400)).await;
        assert!(!session.is_typing().await);
        let messages = session.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].content(), faq::PRICING_RESPONSE);
        assert_eq!(session.quick_replies().await, quick_replies::initial());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_is_ignored() {
        let session = session();
        assert!(!session.submit_text("   ").await);
        assert!(session.messages().await.is_empty());
        assert!(!session.is_typing().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_scenario() {
        let session = session();
        session.initialize().await;
        session.wait_until_idle().await;
        assert_eq!(session.messages().await.len(), 1);

        session.submit_quick_reply(offered("demo")).await;
        assert_eq!(session.state().await.step, Step::AskProjectType);

        session.wait_until_idle().await;
        let messages = session.messages().await;
        assert_eq!(messages.len(), 3);
        assert!(!messages[1].is_from_bot());
        assert_eq!(messages[1].content(), "🚀 Request Demo");
        assert_eq!(messages[2].content(), responses::PROJECT_TYPE_PROMPT);
        assert_eq!(session.quick_replies().await, quick_replies::project_type());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_lead_capture() {
        let session = session();
        session.initialize().await;
        session.submit_quick_reply(offered("demo")).await;
        session.submit_quick_reply(offered("personal")).await;
        session.submit_text("Alice").await;
        session.submit_text("not an email").await;
        assert_eq!(session.state().await.step, Step::AskEmail);
        session.submit_text("alice@x.com").await;
        session.submit_text("testing").await;
        session.wait_until_idle().await;

        let state = session.state().await;
        assert_eq!(state.step, Step::Collected);
        assert_eq!(
            state.user_info,
            UserInfo {
                project_type: Some(ProjectType::Personal),
                name: Some("Alice".to_string()),
                email: Some("alice@x.com".to_string()),
                reason: Some("testing".to_string()),
            }
        );

        // welcome + 6 submissions each echoed and answered
        let messages = session.messages().await;
        assert_eq!(messages.len(), 13);
        let bot_replies: Vec<_> = messages
            .iter()
            .filter(|m| m.is_from_bot())
            .map(|m| m.content().to_string())
            .collect();
        assert_eq!(bot_replies[4], responses::INVALID_EMAIL);
        assert_eq!(bot_replies[6], responses::collected("Alice"));
        assert_eq!(session.quick_replies().await, quick_replies::post_collection());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_submissions_reply_in_order() {
        let session = session();
        session.initialize().await;
        session.submit_text("pricing?").await;
        session.submit_text("features?").await;
        assert!(session.is_typing().await);

        session.wait_until_idle().await;
        let contents: Vec<_> = session
            .messages()
            .await
            .iter()
            .map(|m| m.content().to_string())
            .collect();
        assert_eq!(
            contents,
            vec![
                "pricing?".to_string(),
                "features?".to_string(),
                responses::WELCOME_MESSAGE.to_string(),
                faq::PRICING_RESPONSE.to_string(),
                faq::FEATURES_RESPONSE.to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_and_cancels() {
        let session = session();
        session.initialize().await;
        session.wait_until_idle().await;
        session.submit_quick_reply(offered("demo")).await;
        session.submit_quick_reply(offered("business")).await;
        assert_eq!(
            session.user_info().await.project_type,
            Some(ProjectType::Business)
        );

        session.reset().await;
        assert!(!session.is_typing().await);
        sleep(Duration::from_secs(5)).await;

        let state = session.state().await;
        assert_eq!(state.step, Step::Greeting);
        assert_eq!(state.user_info, UserInfo::default());
        assert!(session.messages().await.is_empty());
        assert!(session.quick_replies().await.is_empty());

        assert!(session.initialize().await);
        session.wait_until_idle().await;
        assert_eq!(session.messages().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_pending_replies() {
        let session = session();
        session.initialize().await;
        session.shutdown().await;
        sleep(Duration::from_secs(2)).await;
        assert!(session.messages().await.is_empty());

        session.submit_text("hello").await;
        assert!(!session.is_typing().await);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(session.messages().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_updates_and_snapshot() {
        let session = session();
        let mut typing = session.typing_updates();
        assert!(!*typing.borrow());

        session.initialize().await;
        assert!(*typing.borrow_and_update());
        typing.changed().await.unwrap();
        assert!(!*typing.borrow());

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.bot_name, "Assistant");
        assert_eq!(snapshot.step, Step::FaqMode);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["step"], "faq_mode");
        assert_eq!(value["position"], "bottom-right");
        assert_eq!(value["isTyping"], false);
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
        assert_eq!(value["quickReplies"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = WidgetConfig {
            bot_name: String::new(),
            ..WidgetConfig::default()
        };
        assert!(ChatSession::new(config).is_err());
    }
}
