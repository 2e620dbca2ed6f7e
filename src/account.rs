//! Host-application account seam.

/// Minimal view of a local user account, implemented by the host
/// application.
///
/// The policy only ever reads the federated marker and the locale, and
/// sets the marker once at registration. The marker records that the
/// account was created through federated login; there is deliberately no
/// way to clear it again, so ownership checks stay stable for the life of
/// the account.
pub trait Account: Send + Sync {
    /// Whether this account carries the federated-registration marker.
    fn federated_marker(&self) -> bool;

    /// Record that this account was registered through federated login.
    ///
    /// Implementations must persist the marker; it is set exactly once,
    /// right after account creation.
    fn set_federated_marker(&mut self);

    /// The account's preferred locale, e.g. `"fr"`, if one is set.
    fn locale(&self) -> Option<&str>;
}
