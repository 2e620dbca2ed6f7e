//! Login policy: configuration, trait, and the Shibboleth implementation.

pub mod config;
pub mod provider;

pub use config::{expire_cookie, ShibConfig};
pub use provider::{LoginPolicy, RegistrationDetails, ShibPolicy};
