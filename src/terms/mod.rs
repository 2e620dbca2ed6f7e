//! Terms-of-use service integration.

pub mod client;
pub mod types;

pub use client::{TermsClient, TermsService};
pub use types::{SignedStatus, TermsError};
