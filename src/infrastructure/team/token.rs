//! Invite token generation
//!
//! Generates opaque signup tokens for team member invites.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

/// Generator for invite signup tokens
#[derive(Debug, Clone)]
pub struct InviteTokenGenerator {
    /// Number of random bytes per token
    token_bytes: usize,
}

impl InviteTokenGenerator {
    /// Create a new token generator
    pub fn new() -> Self {
        Self { token_bytes: 32 }
    }

    /// Set the number of random bytes
    pub fn with_token_bytes(mut self, bytes: usize) -> Self {
        self.token_bytes = bytes;
        self
    }

    /// Generate a new URL-safe token
    pub fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.token_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        URL_SAFE_NO_PAD.encode(&random_bytes)
    }
}

impl Default for InviteTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
