use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User exists")]
    Conflict,
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Session capability: accounts, bearer tokens, and their lookup.
///
/// The inference path only ever calls [`validate`](AuthGate::validate),
/// once per request, before any work happens.
pub trait AuthGate: Send + Sync {
    /// Registers a new identity and opens a session for it.
    fn signup(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Opens a new session for an existing identity.
    fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Identity behind `token`, if the session is live.
    fn validate(&self, token: &str) -> Option<String>;

    /// Ends a session. Returns whether it existed.
    fn revoke(&self, token: &str) -> bool;
}
