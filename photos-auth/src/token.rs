use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Conservative lifetime applied to every access token. Providers issue
/// one-hour tokens; we stop using them five minutes early.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::minutes(55);

#[derive(Clone)]
pub struct Token {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        let value: String = value.into();
        Self {
            value: SecretString::from(value),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// In-memory holder of the current access token. Lives for the session.
#[derive(Debug, Default)]
pub struct TokenStore {
    token: Option<Token>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, value: impl Into<String>, ttl: Duration) -> Token {
        self.set_at(value, ttl, Utc::now())
    }

    pub fn set_at(&mut self, value: impl Into<String>, ttl: Duration, now: DateTime<Utc>) -> Token {
        let token = Token::new(value, now + ttl);
        self.token = Some(token.clone());
        token
    }

    pub fn get(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn take(&mut self) -> Option<Token> {
        self.token.take()
    }

    pub fn clear(&mut self) {
        self.token = None;
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.token.as_ref().is_some_and(|t| t.is_valid_at(now))
    }

    /// The stored token, if it is still usable at `now`.
    pub fn valid_token_at(&self, now: DateTime<Utc>) -> Option<Token> {
        self.token.as_ref().filter(|t| t.is_valid_at(now)).cloned()
    }
}
