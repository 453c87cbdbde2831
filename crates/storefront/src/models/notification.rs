//! Toast notifications shown after cart changes.

use serde::{Deserialize, Serialize};

/// How long a toast stays on screen before dismissing itself.
pub const AUTO_CLOSE_MS: u32 = 2000;

/// Visual style of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// CSS modifier class used by the toast template.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast--success",
            Self::Error => "toast--error",
        }
    }
}

/// A one-shot message queued in the session and shown on the next render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    /// "`title` added to cart!"
    #[must_use]
    pub fn added(title: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: format!("{title} added to cart!"),
        }
    }

    /// "`title` removed from cart!"
    #[must_use]
    pub fn removed(title: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: format!("{title} removed from cart!"),
        }
    }
}
