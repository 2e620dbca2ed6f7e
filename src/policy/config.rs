//! Login policy configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::assertion::AssertionAttributes;

/// Configuration for the Shibboleth login policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShibConfig {
    /// Base URL of the terms-of-use service.
    #[serde(default)]
    pub tandc_server: String,

    /// URL the terms prompt sends users to when they accept.
    #[serde(default)]
    pub accept_url: String,

    /// URL the terms prompt sends users to when they decline.
    #[serde(default)]
    pub decline_url: String,

    /// Base URL of this site, used for post-login redirects.
    #[serde(default)]
    pub site_url: String,

    /// Site name shown in the registration notice.
    #[serde(default)]
    pub site_name: String,

    /// Only accept accounts that carry the federated-registration marker.
    ///
    /// When disabled, any existing local account with a matching username
    /// is treated as owned by this provider.
    #[serde(default = "default_true")]
    pub strict_ownership: bool,

    /// Let logins continue when the terms service cannot be reached.
    ///
    /// Off by default: an unreachable service blocks the login rather
    /// than waving through users whose acceptance is unknown.
    #[serde(default)]
    pub fail_open: bool,

    /// Request-environment attribute names to read the assertion from.
    #[serde(default)]
    pub attributes: AssertionAttributes,

    /// Cookie-name prefixes of the SP's session cookies, expired at logout.
    #[serde(default = "default_sp_cookie_prefixes")]
    pub sp_cookie_prefixes: Vec<String>,

    /// Timeout for terms service requests, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_sp_cookie_prefixes() -> Vec<String> {
    vec!["_shibsession_".to_string(), "_shibstate_".to_string()]
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ShibConfig {
    fn default() -> Self {
        Self {
            tandc_server: String::new(),
            accept_url: String::new(),
            decline_url: String::new(),
            site_url: String::new(),
            site_name: String::new(),
            strict_ownership: true,
            fail_open: false,
            attributes: AssertionAttributes::default(),
            sp_cookie_prefixes: default_sp_cookie_prefixes(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ShibConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.tandc_server.is_empty() {
            return Err("tandc_server is required".to_string());
        }

        if self.accept_url.is_empty() {
            return Err("accept_url is required".to_string());
        }

        if self.decline_url.is_empty() {
            return Err("decline_url is required".to_string());
        }

        if self.site_url.is_empty() {
            return Err("site_url is required".to_string());
        }

        if self.site_name.is_empty() {
            return Err("site_name is required".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".to_string());
        }

        Ok(())
    }

    /// Timeout for terms service requests.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// URL of the terms prompt for `username`, localized for French accounts.
    ///
    /// The accept and decline return URLs are percent-encoded so the
    /// prompt gets them back exactly as configured.
    pub fn terms_prompt_url(&self, locale: Option<&str>, username: &str) -> String {
        let locale_segment = if locale == Some("fr") { "fr/" } else { "" };
        format!(
            "{}/{}tc/?user={}&accept={}&decline={}",
            self.tandc_server.trim_end_matches('/'),
            locale_segment,
            urlencoding::encode(username),
            urlencoding::encode(&self.accept_url),
            urlencoding::encode(&self.decline_url)
        )
    }

    /// URL of the site's activity page, shown to already-logged-in users.
    pub fn activity_url(&self) -> String {
        format!("{}/activity", self.site_url.trim_end_matches('/'))
    }
}

/// Build a Set-Cookie value that expires the named cookie.
pub fn expire_cookie(name: &str) -> String {
    format!(
        "{}=deleted; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0",
        name
    )
}
