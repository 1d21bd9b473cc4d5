//! Outbound reply payloads, independent of the platform's wire format.

/// Largest carousel the platform renders
pub const MAX_CAROUSEL_BUBBLES: usize = 12;
/// Most quick-reply buttons the platform accepts on one message
pub const MAX_QUICK_REPLY_ITEMS: usize = 13;
/// Longest quick-reply button label the platform accepts
pub const MAX_CHOICE_LABEL_CHARS: usize = 20;
/// Records listed in a plain-text answer
pub const MAX_TEXT_RESULTS: usize = 5;

/// Exactly one of these is sent per inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text {
        text: String,
    },
    /// Text with tappable follow-up buttons
    Choices {
        text: String,
        choices: Vec<Choice>,
    },
    Carousel {
        alt_text: String,
        bubbles: Vec<FacilityBubble>,
    },
}

/// One quick-reply button; `data` is the action token echoed back on tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub data: String,
}

/// One carousel card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityBubble {
    pub title: String,
    pub address_line: String,
    pub phone_line: String,
    pub map_button_label: String,
    pub map_button_uri: String,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text { text: text.into() }
    }

    /// Text shown to the user, or the carousel's alternative text
    pub fn summary(&self) -> &str {
        match self {
            Reply::Text { text } | Reply::Choices { text, .. } => text,
            Reply::Carousel { alt_text, .. } => alt_text,
        }
    }
}
