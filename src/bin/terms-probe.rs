//! Nagios-style probe for the terms-of-use service.
//!
//! Issues the signed-status request for a canary username and reports the
//! service's health on stdout in the classic plugin format
//! (`<STATUS> - <details>`, exit code 0/1/2/3). The answer's `signed`
//! value does not matter; any well-formed response for the probe user
//! counts as healthy. Usage errors are reported the same way, as UNKNOWN.

use std::process::ExitCode;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;

use shib_login_policy::terms::{SignedStatus, TermsClient, TermsError, TermsService};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "terms-probe")]
#[command(about = "Nagios-style probe for the terms-of-use service")]
struct Args {
    /// Base URL of the terms-of-use service
    #[arg(long, env = "TERMS_SERVER")]
    server: String,

    /// Username to probe with
    #[arg(long, default_value = "nagios-probe", env = "TERMS_PROBE_USER")]
    user: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, env = "TERMS_PROBE_TIMEOUT")]
    timeout: u64,

    /// Enable verbose logging on stderr
    #[arg(short, long, env = "TERMS_PROBE_VERBOSE")]
    verbose: bool,
}

/// Nagios plugin status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeStatus {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ProbeStatus {
    fn exit_code(self) -> u8 {
        match self {
            ProbeStatus::Ok => 0,
            ProbeStatus::Warning => 1,
            ProbeStatus::Critical => 2,
            ProbeStatus::Unknown => 3,
        }
    }
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Ok => write!(f, "OK"),
            ProbeStatus::Warning => write!(f, "WARNING"),
            ProbeStatus::Critical => write!(f, "CRITICAL"),
            ProbeStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Turn the probe request's outcome into a plugin status and detail line.
fn evaluate(username: &str, result: Result<SignedStatus, TermsError>) -> (ProbeStatus, String) {
    match result {
        Ok(status) if status.user == username => (
            ProbeStatus::Ok,
            format!("signed status for '{}' is {}", username, status.signed),
        ),
        Ok(status) => (
            ProbeStatus::Warning,
            format!(
                "service echoed username '{}', expected '{}'",
                status.user, username
            ),
        ),
        Err(err) => {
            let status = match err.exit_code() {
                3 => ProbeStatus::Unknown,
                _ => ProbeStatus::Critical,
            };
            (status, err.to_string())
        }
    }
}

/// Collapse a command line usage error into a single detail line.
fn usage_error_detail(err: &clap::Error) -> String {
    let line = err
        .to_string()
        .lines()
        .next()
        .unwrap_or("invalid arguments")
        .trim_start_matches("error: ")
        .to_string();
    format!("usage error: {}", line)
}

fn report(status: ProbeStatus, detail: &str) -> ExitCode {
    println!("{} - {}", status, detail);
    ExitCode::from(status.exit_code())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => return report(ProbeStatus::Unknown, &usage_error_detail(&err)),
        },
    };

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(format!(
                "{}=debug,shib_login_policy=debug",
                env!("CARGO_CRATE_NAME")
            ))
            .with_writer(std::io::stderr)
            .init();
    }

    if args.timeout == 0 {
        return report(ProbeStatus::Unknown, "timeout must be at least 1 second");
    }

    let client = match TermsClient::new(&args.server, Duration::from_secs(args.timeout)) {
        Ok(client) => client,
        Err(err) => return report(ProbeStatus::Unknown, &err.to_string()),
    };

    debug!(server = %client.base_url(), user = %args.user, "Probing terms service");

    let result = client.signed_status(&args.user).await;
    let (status, detail) = evaluate(&args.user, result);
    report(status, &detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed(user: &str, signed: bool) -> SignedStatus {
        SignedStatus {
            user: user.to_string(),
            signed,
        }
    }

    #[test]
    fn test_ok_when_username_echoes() {
        let (status, detail) = evaluate("nagios-probe", Ok(signed("nagios-probe", false)));
        assert_eq!(status, ProbeStatus::Ok);
        assert!(detail.contains("false"));

        let (status, _) = evaluate("nagios-probe", Ok(signed("nagios-probe", true)));
        assert_eq!(status, ProbeStatus::Ok);
    }

    #[test]
    fn test_warning_on_echo_mismatch() {
        let (status, detail) = evaluate("nagios-probe", Ok(signed("someone-else", true)));
        assert_eq!(status, ProbeStatus::Warning);
        assert!(detail.contains("someone-else"));
        assert!(detail.contains("nagios-probe"));
    }

    #[test]
    fn test_critical_on_service_errors() {
        let network = TermsError::Network {
            message: "connection refused".to_string(),
        };
        let (status, _) = evaluate("nagios-probe", Err(network));
        assert_eq!(status, ProbeStatus::Critical);

        let http = TermsError::Status { status: 503 };
        let (status, detail) = evaluate("nagios-probe", Err(http));
        assert_eq!(status, ProbeStatus::Critical);
        assert!(detail.contains("503"));
    }

    #[test]
    fn test_unknown_on_misconfiguration() {
        let config = TermsError::Config {
            message: "terms server URL is empty".to_string(),
        };
        let (status, _) = evaluate("nagios-probe", Err(config));
        assert_eq!(status, ProbeStatus::Unknown);
    }

    #[test]
    fn test_usage_errors_collapse_to_one_line() {
        let err = Args::try_parse_from([
            "terms-probe",
            "--server",
            "https://tandc.example.org",
            "--timeout",
            "abc",
        ])
        .unwrap_err();

        let detail = usage_error_detail(&err);
        assert!(detail.starts_with("usage error: "));
        assert!(detail.contains("abc"));
        assert!(!detail.contains('\n'));
    }

    #[test]
    fn test_help_is_not_a_usage_error() {
        let err = Args::try_parse_from(["terms-probe", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ProbeStatus::Ok.exit_code(), 0);
        assert_eq!(ProbeStatus::Warning.exit_code(), 1);
        assert_eq!(ProbeStatus::Critical.exit_code(), 2);
        assert_eq!(ProbeStatus::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ProbeStatus::Ok.to_string(), "OK");
        assert_eq!(ProbeStatus::Critical.to_string(), "CRITICAL");
    }
}
