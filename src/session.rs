// Session model
//
// The client's record of who is signed in. A session lives in memory only;
// restarting the client starts anonymous again.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque `Authorization` header value produced at login time
///
/// Either a Basic credential built from a username/password pair, or a
/// server-issued token that is already a complete header value. Attached
/// verbatim to every privileged request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Build a Basic credential: `Basic base64(username:password)`
    pub fn basic(username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        Self(format!("Basic {}", encoded))
    }

    /// Wrap a header value handed out by the server
    pub fn from_header(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn header_value(&self) -> &str {
        &self.0
    }

    /// Short SHA-256 prefix, safe to log
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        digest[..4].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.fingerprint())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Member,
    Admin,
}

impl Role {
    /// Staff accounts are admins no matter how they signed in
    pub fn from_login(is_staff: bool, guest: bool) -> Self {
        match (is_staff, guest) {
            (true, _) => Role::Admin,
            (false, true) => Role::Guest,
            (false, false) => Role::Member,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: String,
    pub role: Role,
    pub credential: Credential,
}

impl Session {
    pub fn new(identity: impl Into<String>, role: Role, credential: Credential) -> Self {
        Self {
            identity: identity.into(),
            role,
            credential,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Delete affordance: authors and admins. The server enforces the same
    /// rule; this only decides what the UI offers.
    pub fn can_delete(&self, author_username: &str) -> bool {
        self.identity == author_username || self.is_admin()
    }
}

/// A sign-in attempt as entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Login {
    /// Claim a display name; the server issues the token
    Guest(String),
    /// Existing account, verified against `GET /me/`
    Password { user: String, password: String },
}
