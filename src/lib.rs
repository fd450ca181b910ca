pub mod config;
pub mod faq;
pub mod message;
pub mod quick_replies;
pub mod registry;
pub mod responses;
pub mod scheduler;
pub mod session;
pub mod state_machine;
pub mod timing;
pub mod validation;

pub use config::{Position, WidgetConfig};
pub use message::{Message, MessageLog, Sender};
pub use quick_replies::QuickReply;
pub use registry::SessionRegistry;
pub use session::{ChatSession, SessionSnapshot};
pub use state_machine::{advance, ConversationState, Event, ProjectType, Step, UserInfo};
