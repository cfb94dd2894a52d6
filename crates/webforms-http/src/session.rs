//! Per-session state the form layer depends on: the CSRF token.

use std::sync::OnceLock;

use rand::RngCore;

/// The length of a CSRF token in bytes (produces a 40-char hex string).
const CSRF_TOKEN_LENGTH: usize = 20;

/// A session holding the anti-forgery token.
///
/// The token is generated lazily on first access and stays stable for the
/// lifetime of the session, so every form rendered for the session carries
/// the same value the validator will later compare against.
#[derive(Debug, Default)]
pub struct Session {
    csrf_token: OnceLock<String>,
}

impl Session {
    /// Creates a session without a token; one is generated on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with a known token.
    pub fn with_csrf_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        // A fresh OnceLock is always empty.
        let _ = session.csrf_token.set(token.into());
        session
    }

    /// Returns the session's CSRF token, generating it if needed.
    pub fn get_csrf_token(&self) -> &str {
        self.csrf_token.get_or_init(generate_csrf_token)
    }

    /// Replaces the session's CSRF token with a fresh one and returns it.
    pub fn new_csrf_token(&mut self) -> &str {
        self.csrf_token = OnceLock::new();
        self.get_csrf_token()
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        match self.csrf_token.get() {
            Some(token) => Self::with_csrf_token(token.clone()),
            None => Self::new(),
        }
    }
}

/// Generates a random CSRF token as a hex string.
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; CSRF_TOKEN_LENGTH];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
