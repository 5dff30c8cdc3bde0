//! Shared helpers for integration tests
#![allow(dead_code)]

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use relay_warden::{AdminCommand, SubjectKey};

/// Fresh keypair: (signing key, validated subject key)
pub fn keypair() -> (SigningKey, SubjectKey) {
    let signing = SigningKey::generate(&mut OsRng);
    let subject = SubjectKey::from_hex(&hex::encode(signing.verifying_key().to_bytes())).unwrap();
    (signing, subject)
}

/// Build the JSON wire form of a validly signed admin command
pub fn signed_command_json(signing: &SigningKey, tags: Vec<Vec<String>>) -> String {
    let mut command = AdminCommand {
        issuer: hex::encode(signing.verifying_key().to_bytes()),
        created_at: 1_700_000_000,
        tags,
        sig: String::new(),
    };
    let content = command.canonical_content().unwrap();
    command.sig = hex::encode(signing.sign(&content).to_bytes());
    serde_json::to_string(&command).unwrap()
}

/// Deterministic subject key from a small index
pub fn numbered_subject(i: usize) -> SubjectKey {
    SubjectKey::from_hex(&format!("{:064x}", i)).unwrap()
}
