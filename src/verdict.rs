//! Verdicts returned from policy callbacks to the login dispatcher.

use serde::{Deserialize, Serialize};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

/// A message the dispatcher should surface to the user on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Outcome of a policy callback.
///
/// A verdict either lets the login flow proceed or redirects the browser,
/// and may carry notices and cookie-clearing directives either way. The
/// dispatcher applies the directives; the policy never touches the
/// response itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyVerdict {
    /// Notices to flash to the user.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,

    /// Absolute URL to redirect to instead of continuing the flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,

    /// Cookie-name prefixes whose cookies the dispatcher should expire.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clear_cookie_prefixes: Vec<String>,
}

impl PolicyVerdict {
    /// Let the login flow continue to the next step.
    pub fn proceed() -> Self {
        Self::default()
    }

    /// Stop the flow and send the browser to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            redirect: Some(location.into()),
            ..Self::default()
        }
    }

    /// Attach a notice.
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    /// Ask the dispatcher to expire every cookie matching one of `prefixes`.
    pub fn clearing_cookies(mut self, prefixes: &[String]) -> Self {
        self.clear_cookie_prefixes.extend_from_slice(prefixes);
        self
    }

    /// Whether this verdict interrupts the flow with a redirect.
    pub fn is_redirect(&self) -> bool {
        self.redirect.is_some()
    }
}
