//! The login policy trait and its Shibboleth implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::account::Account;
use crate::assertion::Assertion;
use crate::policy::config::ShibConfig;
use crate::terms::{TermsClient, TermsError, TermsService};
use crate::verdict::{Notice, PolicyVerdict};

/// Name and email pulled from an assertion for account registration.
///
/// Absent attributes come back as empty strings; the dispatcher decides
/// whether an empty field blocks registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDetails {
    pub name: String,
    pub email: String,
}

/// Decision callbacks the login dispatcher invokes over the life of a
/// federated login.
///
/// The dispatcher owns the flow (resolve the account, check ownership,
/// check terms, establish the session) and calls into the policy at each
/// step; the policy only ever answers with a [`PolicyVerdict`]. Callbacks
/// are infallible by contract: anything that goes wrong is expressed as a
/// verdict, never as an error the dispatcher would have to interpret.
#[async_trait::async_trait]
pub trait LoginPolicy: Send + Sync {
    /// Whether the dispatcher should offer a persistent session.
    fn persistent_session(&self) -> bool {
        false
    }

    /// Whether an email address already used by another account is
    /// acceptable at registration.
    fn allow_duplicate_email(&self) -> bool {
        false
    }

    /// Pull name and email out of the assertion for registration.
    fn registration_details(&self, assertion: &Assertion) -> RegistrationDetails;

    /// The asserted username, or empty string when absent.
    fn username(&self, assertion: &Assertion) -> String;

    /// Whether an existing account may be logged in through this provider.
    fn owns_account(&self, account: &dyn Account) -> bool;

    /// Called once, right after the dispatcher created a new account.
    fn on_registered(&self, account: &mut dyn Account) -> PolicyVerdict;

    /// Called after the session was established.
    fn on_login(&self, account: &dyn Account) -> PolicyVerdict;

    /// Called after the session was torn down.
    fn on_logout(&self) -> PolicyVerdict;

    /// The resolved account failed the ownership check.
    fn on_ownership_failed(&self, assertion: &Assertion, account: &dyn Account) -> PolicyVerdict;

    /// A login was attempted while a session already exists.
    fn on_already_logged_in(&self) -> PolicyVerdict;

    /// The dispatcher could not create the account.
    fn on_registration_failed(&self, assertion: &Assertion) -> PolicyVerdict;

    /// The assertion carried no username.
    fn on_username_missing(&self) -> PolicyVerdict;

    /// The assertion carried no email address at registration time.
    fn on_registration_email_missing(&self) -> PolicyVerdict;

    /// The assertion carried no display name at registration time.
    fn on_registration_name_missing(&self) -> PolicyVerdict;

    /// Last gate before the dispatcher establishes the session.
    ///
    /// This is where the terms-of-use check runs; a redirect verdict here
    /// means the user is not logged in on this request.
    async fn before_login(&self, assertion: &Assertion, account: &dyn Account) -> PolicyVerdict;

    /// First step of a logout.
    async fn before_logout(&self, _account: &dyn Account) -> PolicyVerdict {
        PolicyVerdict::proceed()
    }
}

/// Login policy for Shibboleth-fronted sites with a remote terms-of-use
/// service.
pub struct ShibPolicy {
    config: ShibConfig,
    terms: Arc<dyn TermsService>,
}

impl ShibPolicy {
    /// Build a policy from validated configuration, with a real HTTP
    /// terms client.
    pub fn new(config: ShibConfig) -> Result<Self, TermsError> {
        config
            .validate()
            .map_err(|message| TermsError::Config { message })?;

        let terms = TermsClient::new(&config.tandc_server, config.request_timeout())?;
        Ok(Self {
            config,
            terms: Arc::new(terms),
        })
    }

    /// Build a policy around an existing terms service.
    ///
    /// The configuration is taken as given; callers embedding their own
    /// service are expected to have validated it.
    pub fn with_terms_service(config: ShibConfig, terms: Arc<dyn TermsService>) -> Self {
        Self { config, terms }
    }

    /// The policy's configuration.
    pub fn config(&self) -> &ShibConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl LoginPolicy for ShibPolicy {
    fn registration_details(&self, assertion: &Assertion) -> RegistrationDetails {
        RegistrationDetails {
            name: assertion.display_name.clone().unwrap_or_default(),
            email: assertion.email.clone().unwrap_or_default(),
        }
    }

    fn username(&self, assertion: &Assertion) -> String {
        assertion.username_or_empty().to_string()
    }

    fn owns_account(&self, account: &dyn Account) -> bool {
        !self.config.strict_ownership || account.federated_marker()
    }

    fn on_registered(&self, account: &mut dyn Account) -> PolicyVerdict {
        account.set_federated_marker();
        PolicyVerdict::proceed().with_notice(Notice::success(format!(
            "You have successfully registered for {}.",
            self.config.site_name
        )))
    }

    fn on_login(&self, _account: &dyn Account) -> PolicyVerdict {
        PolicyVerdict::proceed().with_notice(Notice::success("You have been logged in."))
    }

    fn on_logout(&self) -> PolicyVerdict {
        PolicyVerdict::proceed().clearing_cookies(&self.config.sp_cookie_prefixes)
    }

    fn on_ownership_failed(&self, assertion: &Assertion, _account: &dyn Account) -> PolicyVerdict {
        let username = assertion.username_or_empty();
        warn!(user = %username, "Account exists but was not registered through federated login");

        PolicyVerdict::redirect(self.config.site_url.clone()).with_notice(Notice::error(format!(
            "The system failed to log you in as '{}'. \
             Please ask your site administrator for assistance.",
            username
        )))
    }

    fn on_already_logged_in(&self) -> PolicyVerdict {
        debug!("Login attempted with an active session");
        PolicyVerdict::redirect(self.config.activity_url())
    }

    fn on_registration_failed(&self, assertion: &Assertion) -> PolicyVerdict {
        let username = assertion.username_or_empty();
        warn!(user = %username, "Account registration failed");

        PolicyVerdict::redirect(self.config.site_url.clone()).with_notice(Notice::error(format!(
            "The system failed to register you as '{}'. \
             Please ask your site administrator for assistance.",
            username
        )))
    }

    fn on_username_missing(&self) -> PolicyVerdict {
        warn!("Assertion carried no username");

        PolicyVerdict::redirect(self.config.site_url.clone()).with_notice(Notice::error(
            "Shibboleth is not correctly configured. \
             Please ask your site administrator for assistance.",
        ))
    }

    fn on_registration_email_missing(&self) -> PolicyVerdict {
        PolicyVerdict::proceed().with_notice(Notice::error(
            "Shibboleth is not correctly configured to include your e-mail address.",
        ))
    }

    fn on_registration_name_missing(&self) -> PolicyVerdict {
        PolicyVerdict::proceed().with_notice(Notice::error(
            "Shibboleth is not correctly configured to include your name.",
        ))
    }

    async fn before_login(&self, assertion: &Assertion, account: &dyn Account) -> PolicyVerdict {
        let username = self.username(assertion);

        match self.terms.signed_status(&username).await {
            Ok(status) if status.user == username && status.signed => {
                debug!(user = %username, "Terms of use accepted");
                PolicyVerdict::proceed()
            }
            Ok(status) => {
                info!(
                    user = %username,
                    echoed_user = %status.user,
                    signed = status.signed,
                    "Terms of use not accepted, redirecting to prompt"
                );
                PolicyVerdict::redirect(
                    self.config.terms_prompt_url(account.locale(), &username),
                )
            }
            Err(err) if self.config.fail_open => {
                warn!(user = %username, error = %err, "Terms check failed, continuing (fail-open)");
                PolicyVerdict::proceed()
            }
            Err(err) => {
                warn!(user = %username, error = %err, "Terms check failed, blocking login");
                PolicyVerdict::redirect(self.config.site_url.clone()).with_notice(Notice::error(
                    "The terms of use service is currently unavailable. \
                     Please try again later.",
                ))
            }
        }
    }
}
