//! Administrative authority
//!
//! Decides whether an issuer may administer the whitelist and applies signed
//! Add/Remove commands. A command passes three gates in order (decode,
//! signature, issuer authorization), and each gate rejects with a notice on
//! the originating channel without touching any state. Application is not
//! atomic across targets: one failing target is logged and the rest proceed.

use crate::command::AdminCommand;
use crate::error::Result;
use crate::registry::AccessRegistry;
use crate::subject::SubjectKey;
use crate::whitelist::WhitelistCache;
use std::collections::HashSet;
use tracing::{info, warn};

/// Destination for user-visible notices on the originating channel.
///
/// The wire protocol that carries notices back to the issuer is an external
/// collaborator; the authority only needs somewhere to put the text.
pub trait NoticeSink {
    /// Deliver one notice to the channel the command arrived on
    fn notice(&self, message: &str);
}

/// Issuer-eligibility checks and whitelist mutation on behalf of verified
/// administrators.
pub struct AdminAuthority {
    /// Built-in administrators fixed at startup; consulted before any store
    /// I/O and never persisted.
    builtin: HashSet<SubjectKey>,
    /// Admin-domain registry for runtime-granted administrators
    registry: AccessRegistry,
}

impl AdminAuthority {
    /// Create an authority with the given built-in admin set
    pub fn new(registry: AccessRegistry, builtin: impl IntoIterator<Item = SubjectKey>) -> Self {
        AdminAuthority {
            builtin: builtin.into_iter().collect(),
            registry,
        }
    }

    /// Is this subject an administrator?
    ///
    /// Built-ins answer true regardless of store reachability. Otherwise the
    /// admin registry decides, failing closed on store errors.
    pub fn is_admin(&self, subject: &SubjectKey) -> bool {
        if self.builtin.contains(subject) {
            return true;
        }
        match self.registry.is_authorized(subject) {
            Ok(granted) => granted,
            Err(e) => {
                warn!("admin check failed closed: {}", e);
                false
            }
        }
    }

    /// Process one inbound admin command against the whitelist.
    ///
    /// Rejections at the decode, signature, and authorization gates emit a
    /// notice and halt the command. After the gates, every `add` target is
    /// granted and every `remove` target revoked; per-target failures are
    /// logged and skipped. A final notice acknowledges what was applied.
    pub fn handle_command(
        &self,
        raw: &str,
        whitelist: &WhitelistCache,
        notices: &dyn NoticeSink,
    ) {
        let command = match AdminCommand::decode(raw) {
            Ok(command) => command,
            Err(e) => {
                notices.notice(&e.to_string());
                return;
            }
        };

        let issuer = match command.verify() {
            Ok(issuer) => issuer,
            Err(e) => {
                notices.notice(&e.to_string());
                return;
            }
        };

        if !self.is_admin(&issuer) {
            warn!(issuer = %issuer, "admin command from non-admin issuer");
            notices.notice("authorization error: issuer is not an administrator");
            return;
        }

        let applied = self.apply(&command, whitelist);
        info!(
            issuer = %issuer,
            granted = applied.granted,
            revoked = applied.revoked,
            failed = applied.failed,
            "admin command applied"
        );
        notices.notice(&format!(
            "admin update applied: {} granted, {} revoked",
            applied.granted, applied.revoked
        ));
    }

    fn apply(&self, command: &AdminCommand, whitelist: &WhitelistCache) -> Applied {
        let mut applied = Applied::default();
        for subject in command.add_targets() {
            match whitelist.set_allowed(&subject) {
                Ok(()) => applied.granted += 1,
                Err(e) => {
                    applied.failed += 1;
                    warn!(subject = %subject, "grant failed: {}", e);
                }
            }
        }
        for subject in command.remove_targets() {
            match whitelist.deactivate(&subject) {
                Ok(()) => applied.revoked += 1,
                Err(e) => {
                    applied.failed += 1;
                    warn!(subject = %subject, "revoke failed: {}", e);
                }
            }
        }
        applied
    }

    /// Grant admin status at runtime (admin-domain registry write)
    pub fn grant_admin(&self, subject: &SubjectKey) -> Result<()> {
        self.registry.authorize(subject)
    }

    /// Revoke runtime-granted admin status. Built-in admins are unaffected.
    pub fn revoke_admin(&self, subject: &SubjectKey) -> Result<()> {
        self.registry.revoke(subject)
    }
}

#[derive(Default)]
struct Applied {
    granted: usize,
    revoked: usize,
    failed: usize,
}
