//! Identity assertion supplied by the upstream SSO agent.
//!
//! The Shibboleth SP (or an equivalent SSO proxy) authenticates the user
//! before the request reaches the application and injects the resulting
//! identity attributes into the request environment. This module turns that
//! ambient environment into an explicit [`Assertion`] value that is passed
//! into every policy callback.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request-environment names under which the SSO agent injects identity
/// attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssertionAttributes {
    /// Attribute carrying the unique federated username.
    #[serde(default = "default_username_attribute")]
    pub username: String,

    /// Attribute carrying the user's display name.
    #[serde(default = "default_display_name_attribute")]
    pub display_name: String,

    /// Attribute carrying the user's email address.
    #[serde(default = "default_email_attribute")]
    pub email: String,
}

fn default_username_attribute() -> String {
    "shib-uid".to_string()
}

fn default_display_name_attribute() -> String {
    "shib-fullname".to_string()
}

fn default_email_attribute() -> String {
    "shib-mail".to_string()
}

impl Default for AssertionAttributes {
    fn default() -> Self {
        Self {
            username: default_username_attribute(),
            display_name: default_display_name_attribute(),
            email: default_email_attribute(),
        }
    }
}

/// Identity claims asserted by the upstream SSO agent for one request.
///
/// Read-only and ephemeral; absent attributes stay `None` rather than
/// failing, since the policy decides per callback how to treat a missing
/// field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// Unique federated username.
    pub username: Option<String>,

    /// Display name for registration.
    pub display_name: Option<String>,

    /// Email address for registration.
    pub email: Option<String>,
}

impl Assertion {
    /// Extract an assertion from a request header map.
    ///
    /// Header names are matched case-insensitively; for multi-valued
    /// headers the first value wins. Empty values are treated as absent.
    pub fn from_headers(
        headers: &HashMap<String, Vec<String>>,
        attributes: &AssertionAttributes,
    ) -> Self {
        Self {
            username: first_header_value(headers, &attributes.username),
            display_name: first_header_value(headers, &attributes.display_name),
            email: first_header_value(headers, &attributes.email),
        }
    }

    /// The asserted username, or empty string when absent.
    pub fn username_or_empty(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }
}

/// Get the first value of a header, matching the name case-insensitively.
fn first_header_value(headers: &HashMap<String, Vec<String>>, name: &str) -> Option<String> {
    let name_lower = name.to_lowercase();
    headers
        .iter()
        .find(|(key, _)| key.to_lowercase() == name_lower)
        .and_then(|(_, values)| values.first())
        .filter(|value| !value.is_empty())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
            .collect()
    }

    #[test]
    fn test_default_attribute_names() {
        let attrs = AssertionAttributes::default();
        assert_eq!(attrs.username, "shib-uid");
        assert_eq!(attrs.display_name, "shib-fullname");
        assert_eq!(attrs.email, "shib-mail");
    }

    #[test]
    fn test_extraction() {
        let headers = headers(&[
            ("shib-uid", "alice"),
            ("shib-fullname", "Alice Liddell"),
            ("shib-mail", "alice@example.org"),
        ]);

        let assertion = Assertion::from_headers(&headers, &AssertionAttributes::default());
        assert_eq!(assertion.username.as_deref(), Some("alice"));
        assert_eq!(assertion.display_name.as_deref(), Some("Alice Liddell"));
        assert_eq!(assertion.email.as_deref(), Some("alice@example.org"));
    }

    #[test]
    fn test_extraction_is_case_insensitive() {
        let headers = headers(&[("Shib-UID", "alice")]);

        let assertion = Assertion::from_headers(&headers, &AssertionAttributes::default());
        assert_eq!(assertion.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_missing_attributes_stay_absent() {
        let headers = headers(&[("shib-uid", "alice")]);

        let assertion = Assertion::from_headers(&headers, &AssertionAttributes::default());
        assert_eq!(assertion.username.as_deref(), Some("alice"));
        assert!(assertion.display_name.is_none());
        assert!(assertion.email.is_none());
    }

    #[test]
    fn test_empty_value_treated_as_absent() {
        let headers = headers(&[("shib-uid", "")]);

        let assertion = Assertion::from_headers(&headers, &AssertionAttributes::default());
        assert!(assertion.username.is_none());
        assert_eq!(assertion.username_or_empty(), "");
    }

    #[test]
    fn test_first_value_wins() {
        let mut headers = HashMap::new();
        headers.insert(
            "shib-uid".to_string(),
            vec!["alice".to_string(), "bob".to_string()],
        );

        let assertion = Assertion::from_headers(&headers, &AssertionAttributes::default());
        assert_eq!(assertion.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_custom_attribute_names() {
        let attrs = AssertionAttributes {
            username: "remote-user".to_string(),
            display_name: "cn".to_string(),
            email: "mail".to_string(),
        };
        let headers = headers(&[("remote-user", "bob"), ("cn", "Bob"), ("mail", "b@x.org")]);

        let assertion = Assertion::from_headers(&headers, &attrs);
        assert_eq!(assertion.username.as_deref(), Some("bob"));
        assert_eq!(assertion.display_name.as_deref(), Some("Bob"));
        assert_eq!(assertion.email.as_deref(), Some("b@x.org"));
    }
}
