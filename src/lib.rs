//! Login policy provider for Shibboleth-fronted sites.
//!
//! The host application's login dispatcher owns the federated login flow
//! (resolving accounts, creating sessions); this crate supplies the
//! decisions. [`LoginPolicy`] is the callback seam the dispatcher invokes,
//! [`ShibPolicy`] the implementation for sites behind a Shibboleth SP
//! whose users must accept a terms-of-use document tracked by a remote
//! service. Every callback answers with a [`PolicyVerdict`] carrying user
//! notices and, where called for, a redirect or cookie-clearing
//! directives.
//!
//! The terms-of-use service is reached through the [`terms`] module's
//! [`TermsService`] seam; the crate also ships a `terms-probe` binary
//! that monitors that service with Nagios plugin conventions.

pub mod account;
pub mod assertion;
pub mod policy;
pub mod terms;
pub mod verdict;

pub use account::Account;
pub use assertion::{Assertion, AssertionAttributes};
pub use policy::{expire_cookie, LoginPolicy, RegistrationDetails, ShibConfig, ShibPolicy};
pub use terms::{SignedStatus, TermsClient, TermsError, TermsService};
pub use verdict::{Notice, PolicyVerdict, Severity};
