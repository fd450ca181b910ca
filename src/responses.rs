//! Bot-side conversation copy. Content may carry `**bold**` markers and
//! newlines; rendering them is left to the host UI.

pub const WELCOME_MESSAGE: &str = "Hi there! 👋 I'm your virtual assistant. I can help you with questions about our services, pricing, and more.

How can I assist you today?";

pub const PROJECT_TYPE_PROMPT: &str =
    "Is this chatbot for a personal project or a business website?";

pub const ASK_NAME: &str = "Quick question — is this chatbot for a personal project or a business website? Also, what should I call you?";

pub const INVALID_EMAIL: &str =
    "Hmm, that doesn't look like a valid email. Could you please try again?";

pub const ASK_REASON: &str =
    "Great! And what brings you here today? (Just a brief description is fine)";

pub const FALLBACK: &str = "I'm not quite sure I understand. Could you rephrase that, or choose one of the options below?";

pub const GOODBYE_MESSAGE: &str = "You're welcome! Have a wonderful day! 🌟

Feel free to reach out anytime if you have more questions. The chat will always be here to help!";

/// Name used in the thank-you message when none was collected
pub const DEFAULT_VISITOR_NAME: &str = "friend";

pub fn ask_email(name: &str) -> String {
    format!("Nice to meet you, {}! 😊 What's the best email to reach you at?", name)
}

pub fn collected(name: &str) -> String {
    format!(
        "Thank you, {}! 🎉 Our team will be in touch with you shortly at the email you provided.\n\n\
        Is there anything else I can help you with in the meantime?",
        name
    )
}
