use std::collections::HashMap;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use parking_lot::RwLock;
use rand::Rng;

use crate::auth::domain::auth_gate::{AuthError, AuthGate};

const TOKEN_BYTES: usize = 24;

/// Argon2 hash in PHC string form; algorithm, parameters and salt travel
/// inside the string.
struct PasswordDigest(String);

impl PasswordDigest {
    fn new(hasher: &Argon2<'_>, password: &str) -> Result<Self, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self(phc.to_string()))
    }

    fn matches(&self, hasher: &Argon2<'_>, password: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => hasher.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                log::error!("Stored password hash is unreadable: {e}");
                false
            }
        }
    }
}

/// 24 random bytes as 48 lowercase hex characters.
fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Process-local accounts and sessions. Nothing survives a restart.
pub struct InMemoryAuthGate {
    hasher: Argon2<'static>,
    users: RwLock<HashMap<String, PasswordDigest>>,
    sessions: RwLock<HashMap<String, String>>,
}

impl InMemoryAuthGate {
    /// Argon2id with the crate's recommended cost parameters.
    pub fn new() -> Self {
        Self::with_hasher(Argon2::default())
    }

    pub fn with_hasher(hasher: Argon2<'static>) -> Self {
        Self {
            hasher,
            users: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn open_session(&self, email: &str) -> String {
        let token = new_token();
        self.sessions.write().insert(token.clone(), email.to_string());
        token
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Default for InMemoryAuthGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthGate for InMemoryAuthGate {
    fn signup(&self, email: &str, password: &str) -> Result<String, AuthError> {
        if self.users.read().contains_key(email) {
            return Err(AuthError::Conflict);
        }
        // Hash outside the write lock; the key is re-checked before insert.
        let digest = PasswordDigest::new(&self.hasher, password)?;
        {
            let mut users = self.users.write();
            if users.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            users.insert(email.to_string(), digest);
        }
        log::info!("New account registered: {email}");
        Ok(self.open_session(email))
    }

    fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let verified = self
            .users
            .read()
            .get(email)
            .is_some_and(|digest| digest.matches(&self.hasher, password));
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(self.open_session(email))
    }

    fn validate(&self, token: &str) -> Option<String> {
        self.sessions.read().get(token).cloned()
    }

    fn revoke(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }
}
