//! Wire types and errors for the terms-of-use service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signed-status record returned by `GET {server}/utils/signed?user=...`.
///
/// Extra fields in the response are ignored; `signed` must be a real JSON
/// boolean. Truthy stand-ins like `"yes"` or `1` are rejected so that a
/// misbehaving service reads as an error, never as an acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedStatus {
    /// Username the service looked up, echoed back.
    pub user: String,

    /// Whether that user has accepted the current terms of use.
    pub signed: bool,
}

/// Errors from querying the terms-of-use service.
#[derive(Debug, Error)]
pub enum TermsError {
    /// The request never produced an HTTP response.
    #[error("terms service request failed: {message}")]
    Network { message: String },

    /// The service answered with a non-success status.
    #[error("terms service returned HTTP {status}")]
    Status { status: u16 },

    /// The response body was not a usable signed-status record.
    #[error("terms service returned an unusable response: {message}")]
    InvalidResponse { message: String },

    /// The client was configured with unusable parameters.
    #[error("invalid terms service configuration: {message}")]
    Config { message: String },
}

impl TermsError {
    /// Nagios-style exit code for the monitoring probe.
    pub fn exit_code(&self) -> i32 {
        match self {
            TermsError::Network { .. }
            | TermsError::Status { .. }
            | TermsError::InvalidResponse { .. } => 2,
            TermsError::Config { .. } => 3,
        }
    }
}

impl From<reqwest::Error> for TermsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TermsError::Network {
                message: format!("request timed out: {err}"),
            }
        } else {
            TermsError::Network {
                message: err.to_string(),
            }
        }
    }
}
