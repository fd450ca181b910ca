use serde::{Deserialize, Serialize};

/// A button-style shortcut offered alongside a bot message.
///
/// `value` is the routing token the conversation flow switches on; `label` is
/// what the visitor sees, and what gets echoed into the log when clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl QuickReply {
    pub fn new(id: &str, label: &str, value: &str) -> Self {
        QuickReply {
            id: id.to_string(),
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

// Routing tokens
pub const PRICING: &str = "pricing";
pub const FEATURES: &str = "features";
pub const SUPPORT: &str = "support";
pub const DEMO: &str = "demo";
pub const PERSONAL: &str = "personal";
pub const BUSINESS: &str = "business";
pub const BYE: &str = "bye";

fn pricing() -> QuickReply {
    QuickReply::new(PRICING, "💰 Pricing", PRICING)
}

fn features() -> QuickReply {
    QuickReply::new(FEATURES, "✨ Features", FEATURES)
}

/// Offered with the welcome message and after every FAQ answer
pub fn initial() -> Vec<QuickReply> {
    vec![
        pricing(),
        features(),
        QuickReply::new(SUPPORT, "🎧 Contact Support", SUPPORT),
        QuickReply::new(DEMO, "🚀 Request Demo", DEMO),
    ]
}

/// Offered once the visitor's details have been collected
pub fn post_collection() -> Vec<QuickReply> {
    vec![
        pricing(),
        features(),
        QuickReply::new(BYE, "👋 That's all, thanks!", BYE),
    ]
}

pub fn project_type() -> Vec<QuickReply> {
    vec![
        QuickReply::new(PERSONAL, "🧑‍💻 Personal Project", PERSONAL),
        QuickReply::new(BUSINESS, "🏢 Business Website", BUSINESS),
    ]
}
