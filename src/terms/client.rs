//! HTTP client for the terms-of-use service.

use std::time::Duration;

use tracing::debug;

use crate::terms::types::{SignedStatus, TermsError};

/// User agent sent on every terms service request.
const USER_AGENT: &str = concat!("shib-login-policy/", env!("CARGO_PKG_VERSION"));

/// Source of signed-status answers for the login policy.
///
/// [`TermsClient`] is the production implementation; hosts and tests can
/// substitute their own when the real service is out of reach.
#[async_trait::async_trait]
pub trait TermsService: Send + Sync {
    /// Look up whether `username` has accepted the current terms of use.
    async fn signed_status(&self, username: &str) -> Result<SignedStatus, TermsError>;
}

/// Client for the terms-of-use service's signed-status endpoint.
#[derive(Debug, Clone)]
pub struct TermsClient {
    base_url: String,
    http: reqwest::Client,
}

impl TermsClient {
    /// Create a client for the service at `base_url`.
    ///
    /// A trailing slash on `base_url` is tolerated. Every request is
    /// bounded by `timeout` end to end.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TermsError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TermsError::Config {
                message: "terms server URL is empty".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| TermsError::Config {
                message: format!("failed to build HTTP client: {err}"),
            })?;

        Ok(Self { base_url, http })
    }

    /// The service base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl TermsService for TermsClient {
    async fn signed_status(&self, username: &str) -> Result<SignedStatus, TermsError> {
        let url = format!(
            "{}/utils/signed?user={}",
            self.base_url,
            urlencoding::encode(username)
        );

        debug!(url = %url, "Querying terms service");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TermsError::Status {
                status: status.as_u16(),
            });
        }

        let signed: SignedStatus = response
            .json()
            .await
            .map_err(|err| TermsError::InvalidResponse {
                message: err.to_string(),
            })?;

        Ok(signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = TermsClient::new("https://tandc.example.org/", Duration::from_secs(5))
            .unwrap();
        assert_eq!(client.base_url(), "https://tandc.example.org");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = TermsClient::new("", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, TermsError::Config { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
