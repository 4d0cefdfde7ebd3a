use serde::{Deserialize, Serialize};

/// Color assigned to prompts created without an explicit choice. First entry
/// of [`PROMPT_COLORS`].
pub const DEFAULT_COLOR: &str = "#10a37f";

/// Icon assigned to prompts created without an explicit choice. First entry
/// of [`PROMPT_ICONS`].
pub const DEFAULT_ICON: &str = "text-box-outline";

/// Palette offered by prompt editors.
pub const PROMPT_COLORS: [&str; 10] = [
    "#10a37f", // green
    "#3b82f6", // blue
    "#ef4444", // red
    "#f59e0b", // amber
    "#8b5cf6", // purple
    "#ec4899", // pink
    "#6366f1", // indigo
    "#14b8a6", // teal
    "#f97316", // orange
    "#4b5563", // gray
];

/// Glyph names prompt editors may choose from (Material Community Icons).
pub const PROMPT_ICONS: [&str; 26] = [
    "text-box-outline",
    "brain",
    "lightbulb-on-outline",
    "code-tags",
    "console",
    "format-quote-close",
    "robot-outline",
    "chat-outline",
    "comment-question-outline",
    "format-list-bulleted",
    "format-list-text",
    "help-circle-outline",
    "school-outline",
    "flask-outline",
    "cogs",
    "wrench-outline",
    "palette-outline",
    "earth",
    "translate",
    "email-outline",
    "script-text-outline",
    "calculator-variant",
    "history",
    "leaf",
    "book-open-page-variant-outline",
    "database-outline",
];

/// A stored text snippet with its display metadata.
///
/// `id` and `text` are required when decoding persisted data; the display
/// fields fall back to defaults so older or hand-edited files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Opaque unique identifier, assigned at creation and immutable after.
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// Input for creating a prompt; the store assigns the id.
#[derive(Debug, Clone, Default)]
pub struct PromptDraft {
    pub name: String,
    pub text: String,
    pub category: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl PromptDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Display name for a prompt saved without one: the first five words of the
/// text, with an ellipsis when the text runs past 30 characters.
pub fn default_name(text: &str) -> String {
    let trimmed = text.trim();
    let head: Vec<&str> = trimmed.split_whitespace().take(5).collect();
    let mut name = head.join(" ");
    if trimmed.chars().count() > 30 {
        name.push_str("...");
    }
    name
}
