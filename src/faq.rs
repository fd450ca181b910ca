//! # Feature: FAQ Keyword Matching
//!
//! Maps free text to a canned answer by case-insensitive substring search over
//! a fixed keyword table. Entries and keywords are checked in table order and
//! the first hit wins.
//!
//! Matching is deliberately naive: a short keyword inside an unrelated word or
//! phrase still matches ("I need to plan a trip" hits `plan` and answers with
//! pricing). Callers that need better precision must put a classifier in front.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial keyword table with pricing, features, support and demo entries

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqTopic {
    Pricing,
    Features,
    Support,
    Demo,
}

impl FaqTopic {
    pub fn response(&self) -> &'static str {
        match self {
            FaqTopic::Pricing => PRICING_RESPONSE,
            FaqTopic::Features => FEATURES_RESPONSE,
            FaqTopic::Support => SUPPORT_RESPONSE,
            FaqTopic::Demo => DEMO_RESPONSE,
        }
    }
}

/// Static pairing of trigger keywords to a topic. Keywords are lowercase.
#[derive(Debug, Clone)]
pub struct FaqItem {
    pub topic: FaqTopic,
    pub keywords: &'static [&'static str],
}

impl FaqItem {
    pub fn response(&self) -> &'static str {
        self.topic.response()
    }
}

/// Priority order matters: earlier entries win when input hits several.
pub const FAQ_ITEMS: &[FaqItem] = &[
    FaqItem {
        topic: FaqTopic::Pricing,
        keywords: &[
            "price", "pricing", "cost", "how much", "subscription", "plan", "plans", "payment",
        ],
    },
    FaqItem {
        topic: FaqTopic::Features,
        keywords: &[
            "feature", "features", "what can", "capabilities", "functionality", "does it",
        ],
    },
    FaqItem {
        topic: FaqTopic::Support,
        keywords: &[
            "support", "help", "contact", "reach", "speak", "human", "agent", "phone", "email",
        ],
    },
    FaqItem {
        topic: FaqTopic::Demo,
        keywords: &["demo", "trial", "try", "test", "see", "show me"],
    },
];

/// Find the first FAQ topic whose keyword occurs in `input`
pub fn match_topic(input: &str) -> Option<FaqTopic> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    FAQ_ITEMS
        .iter()
        .find(|item| item.keywords.iter().any(|&keyword| normalized.contains(keyword)))
        .map(|item| item.topic)
}

/// Canned answer for `input`, or `None` when nothing matches
pub fn match_faq(input: &str) -> Option<&'static str> {
    match_topic(input).map(|topic| topic.response())
}

pub const PRICING_RESPONSE: &str = "Our pricing is flexible to fit your needs:

• **Starter**: $29/month - Perfect for small teams
• **Professional**: $79/month - Most popular choice
• **Enterprise**: Custom pricing - For large organizations

All plans include a 14-day free trial. Would you like to know more about any specific plan?";

pub const FEATURES_RESPONSE: &str = "Here are our key features:

• 🔄 **Real-time Sync** - Stay updated across all devices
• 🔒 **Enterprise Security** - SOC2 & GDPR compliant
• 📊 **Advanced Analytics** - Deep insights into your data
• 🔗 **Integrations** - Connect with 100+ tools
• 👥 **Team Collaboration** - Work together seamlessly

Want me to elaborate on any specific feature?";

pub const SUPPORT_RESPONSE: &str = "I'd be happy to connect you with our support team!

You can reach us through:
• 📧 Email: support@company.com
• 💬 Live Chat: Available 24/7
• 📞 Phone: 1-800-XXX-XXXX (9am-6pm EST)

Would you like me to collect your information so our team can reach out to you?";

pub const DEMO_RESPONSE: &str = "Great choice! 🎉 Our product demo showcases all the powerful features we offer.

I'll need to collect a few details to schedule your personalized demo. Let's start with your name - what should we call you?";
