//! Signed administrative command envelope
//!
//! An admin command arrives as a JSON envelope from an untrusted channel:
//! the claimed issuer key, a creation timestamp, tag groups naming the
//! subjects to grant (`add`) or revoke (`remove`), and an Ed25519 signature
//! over the envelope's canonical content. Nothing in the envelope is trusted
//! until the signature verifies against the issuer key itself.

use crate::error::{Result, WardenError};
use crate::subject::SubjectKey;
use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Tag group name granting relay access
pub const TAG_ADD: &str = "add";

/// Tag group name revoking relay access
pub const TAG_REMOVE: &str = "remove";

/// One inbound administrative command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCommand {
    /// Hex-encoded public key of the claimed issuer
    pub issuer: String,
    /// Unix seconds at which the issuer created the command
    pub created_at: i64,
    /// Tag groups; the first element names the group, the rest are subject
    /// keys. Unknown group names are ignored.
    pub tags: Vec<Vec<String>>,
    /// Hex-encoded Ed25519 signature over [`canonical_content`](Self::canonical_content)
    pub sig: String,
}

impl AdminCommand {
    /// Decode a command from its JSON wire form
    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| WardenError::Validation(format!("failed to decode admin command: {}", e)))
    }

    /// The byte content the signature covers: compact JSON of
    /// `[0, issuer, created_at, tags]`, with no whitespace and fields in
    /// that fixed order.
    pub fn canonical_content(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&(0u8, &self.issuer, self.created_at, &self.tags))
            .map_err(|e| WardenError::Validation(format!("failed to canonicalize command: {}", e)))
    }

    /// Verify the signature against the claimed issuer, returning the
    /// verified issuer key.
    pub fn verify(&self) -> Result<SubjectKey> {
        let issuer = SubjectKey::from_hex(&self.issuer)?;

        let key_bytes: [u8; 32] = hex::decode(issuer.as_str())
            .ok()
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| WardenError::Auth("issuer is not a valid public key".into()))?;
        let key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| WardenError::Auth(format!("issuer is not a valid public key: {}", e)))?;

        let sig_bytes: [u8; 64] = hex::decode(&self.sig)
            .ok()
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| WardenError::Auth("malformed signature".into()))?;
        let sig = Signature::from_bytes(&sig_bytes);

        key.verify_strict(&self.canonical_content()?, &sig)
            .map_err(|e| WardenError::Auth(format!("invalid signature: {}", e)))?;

        debug!(issuer = %issuer, "admin command signature verified");
        Ok(issuer)
    }

    /// Subjects named by the given tag group. Malformed keys are logged and
    /// skipped; one bad target does not reject the whole command.
    fn targets(&self, group: &str) -> Vec<SubjectKey> {
        let mut targets = Vec::new();
        for tag in self.tags.iter().filter(|t| t.first().map(String::as_str) == Some(group)) {
            for raw in &tag[1..] {
                match SubjectKey::from_hex(raw) {
                    Ok(key) => targets.push(key),
                    Err(e) => warn!("skipping malformed {} target: {}", group, e),
                }
            }
        }
        targets
    }

    /// Subjects to grant relay access
    pub fn add_targets(&self) -> Vec<SubjectKey> {
        self.targets(TAG_ADD)
    }

    /// Subjects to revoke relay access from
    pub fn remove_targets(&self) -> Vec<SubjectKey> {
        self.targets(TAG_REMOVE)
    }
}
