use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Maximum accepted credential length.
/// Generous enough for pasted keys and JWT-style tokens.
pub const MAX_CREDENTIAL_LENGTH: usize = 512;

/// The admin API key. Always non-empty, never printed.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Validate user input. Surrounding whitespace is dropped; input that is
    /// empty afterwards is rejected.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(SecretString::from(trimmed.to_string())))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Check if a character may be typed into the credential field
pub fn can_add_credential_char(current_len: usize, c: char) -> bool {
    current_len < MAX_CREDENTIAL_LENGTH && !c.is_control()
}
