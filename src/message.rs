use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use crate::quick_replies::QuickReply;
use crate::validation::sanitize_input;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in the conversation log. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: String,
    content: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
    quick_replies: Vec<QuickReply>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content.into(), Vec::new())
    }

    pub fn bot(content: impl Into<String>, quick_replies: Vec<QuickReply>) -> Self {
        Self::new(Sender::Bot, content.into(), quick_replies)
    }

    fn new(sender: Sender, content: String, quick_replies: Vec<QuickReply>) -> Self {
        Message {
            id: Uuid::new_v4().to_string(),
            content,
            sender,
            timestamp: Utc::now(),
            quick_replies,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn quick_replies(&self) -> &[QuickReply] {
        &self.quick_replies
    }

    pub fn is_from_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    /// Content with HTML-significant characters escaped
    pub fn escaped_content(&self) -> String {
        sanitize_input(&self.content)
    }

    /// Timestamp in the host's local time, e.g. `03:07 PM`
    pub fn display_time(&self) -> String {
        format_timestamp(&self.timestamp.with_timezone(&Local))
    }
}

pub fn format_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    timestamp.format("%I:%M %p").to_string()
}

/// Append-only, ordered record of the exchange. Only a session reset clears it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
    }
}
