//! Authoritative access registry
//!
//! The durable record of which subjects hold a capability. Two capability
//! domains exist (relay whitelist, admin status) with structurally identical
//! tables, so one registry implementation is parameterized by domain rather
//! than duplicated per table.
//!
//! Records are never hard-deleted: revocation sets `deleted_at`, re-granting
//! clears it. A record is active iff `deleted_at IS NULL`; activity is never
//! decided by comparing the deletion timestamp against the current time.

use crate::error::{Result, WardenError};
use crate::store::Store;
use crate::subject::SubjectKey;
use std::sync::Arc;

/// Capability domain, selecting the backing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Subjects allowed to interact with the relay
    Whitelist,
    /// Subjects allowed to administer the whitelist
    Admin,
}

impl Domain {
    /// Backing table name for this domain
    pub fn table(self) -> &'static str {
        match self {
            Domain::Whitelist => "relay_whitelist",
            Domain::Admin => "relay_admins",
        }
    }
}

/// Durable, queryable record of capability grants for one domain.
///
/// All operations are idempotent; concurrent callers need no coordination
/// beyond the store's own statement atomicity.
pub struct AccessRegistry {
    store: Arc<dyn Store>,
    domain: Domain,
}

impl AccessRegistry {
    /// Create a registry over the given store and domain
    pub fn new(store: Arc<dyn Store>, domain: Domain) -> Self {
        AccessRegistry { store, domain }
    }

    /// The domain this registry serves
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Idempotently create the backing table.
    ///
    /// Callers treat a failure here as fatal at startup.
    pub fn ensure_schema(&self) -> Result<()> {
        let stmt = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                subject_key CHAR(64) NOT NULL PRIMARY KEY,
                created_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                deleted_at  TIMESTAMP NULL
            )",
            self.domain.table()
        );
        self.store
            .execute(&stmt, &[])
            .map_err(|e| WardenError::store("ensure_schema", self.domain.table(), e))?;
        Ok(())
    }

    /// True iff an active (not soft-deleted) record exists for the subject
    pub fn is_authorized(&self, subject: &SubjectKey) -> Result<bool> {
        let stmt = format!(
            "SELECT COUNT(*) FROM {} WHERE subject_key = ?1 AND deleted_at IS NULL",
            self.domain.table()
        );
        let count = self
            .store
            .query_scalar(&stmt, &[&subject.as_str()])
            .map_err(|e| WardenError::store("is_authorized", subject.as_str(), e))?;
        Ok(count > 0)
    }

    /// Grant the capability: insert a fresh record, or revive a soft-deleted
    /// one. Safe to call repeatedly.
    pub fn authorize(&self, subject: &SubjectKey) -> Result<()> {
        let stmt = format!(
            "INSERT INTO {} (subject_key, deleted_at) VALUES (?1, NULL)
             ON CONFLICT(subject_key)
             DO UPDATE SET deleted_at = NULL, updated_at = CURRENT_TIMESTAMP",
            self.domain.table()
        );
        self.store
            .execute(&stmt, &[&subject.as_str()])
            .map_err(|e| WardenError::store("authorize", subject.as_str(), e))?;
        Ok(())
    }

    /// Revoke the capability by soft delete. Revoking an absent or
    /// already-revoked subject is a no-op success.
    pub fn revoke(&self, subject: &SubjectKey) -> Result<()> {
        let stmt = format!(
            "UPDATE {} SET deleted_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
             WHERE subject_key = ?1",
            self.domain.table()
        );
        self.store
            .execute(&stmt, &[&subject.as_str()])
            .map_err(|e| WardenError::store("revoke", subject.as_str(), e))?;
        Ok(())
    }
}
