//! Relay-facing facade
//!
//! The surface the relay process consumes: construct from an explicit
//! config, lazily initialize the admission cache, and gate inbound actors
//! with `accept_subject` / `accept_message`. Admin commands from the wire
//! are routed through here to the authority.

use crate::admin::{AdminAuthority, NoticeSink};
use crate::error::{Result, WardenError};
use crate::registry::{AccessRegistry, Domain};
use crate::store::Store;
use crate::subject::SubjectKey;
use crate::whitelist::{WhitelistCache, WhitelistCacheConfig};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Ceiling on accepted message size when none is configured
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 100_000;

/// Relay gate configuration.
///
/// Optional fields default; the store handle is required and validated at
/// construction, not at first use.
pub struct RelayConfig {
    /// Service name (informational)
    pub name: String,
    /// Service description (informational)
    pub description: String,
    /// Operator contact (informational)
    pub contact: String,
    /// Public key identifying the service itself (informational)
    pub service_pubkey: String,
    /// Largest message accepted from a whitelisted subject, in bytes
    pub max_message_size: usize,
    /// Admission cache sizing
    pub cache: WhitelistCacheConfig,
    /// Built-in administrator subject keys, immutable for the process
    pub admins: Vec<SubjectKey>,
    /// Persistent store backing both capability domains (required)
    pub store: Option<Arc<dyn Store>>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            name: String::new(),
            description: String::new(),
            contact: String::new(),
            service_pubkey: String::new(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            cache: WhitelistCacheConfig::default(),
            admins: Vec::new(),
            store: None,
        }
    }
}

/// Admission gate for one relay process
pub struct Relay {
    name: String,
    description: String,
    contact: String,
    service_pubkey: String,
    max_message_size: usize,
    cache_config: WhitelistCacheConfig,
    store: Arc<dyn Store>,
    authority: AdminAuthority,
    whitelist: OnceLock<WhitelistCache>,
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("contact", &self.contact)
            .field("service_pubkey", &self.service_pubkey)
            .field("max_message_size", &self.max_message_size)
            .finish_non_exhaustive()
    }
}

impl Relay {
    /// Build the gate, validating required dependencies and ensuring both
    /// domain schemas. Schema failure here is fatal at startup.
    pub fn new(config: RelayConfig) -> Result<Self> {
        let store = config
            .store
            .ok_or_else(|| WardenError::Config("relay requires a persistent store".into()))?;

        let whitelist_registry = AccessRegistry::new(store.clone(), Domain::Whitelist);
        whitelist_registry.ensure_schema()?;
        let admin_registry = AccessRegistry::new(store.clone(), Domain::Admin);
        admin_registry.ensure_schema()?;

        let authority = AdminAuthority::new(admin_registry, config.admins);

        let name = if config.name.is_empty() {
            "whitelist-relay".to_string()
        } else {
            config.name
        };

        info!(name = %name, "relay gate configured");

        Ok(Relay {
            name,
            description: config.description,
            contact: config.contact,
            service_pubkey: config.service_pubkey,
            max_message_size: config.max_message_size,
            cache_config: config.cache,
            store,
            authority,
            whitelist: OnceLock::new(),
        })
    }

    /// Idempotently construct the admission cache. Admission checks also
    /// initialize on first use, so calling this is optional but lets the
    /// process pay the cost at startup.
    pub fn init(&self) {
        let _ = self.whitelist();
    }

    fn whitelist(&self) -> &WhitelistCache {
        self.whitelist.get_or_init(|| {
            WhitelistCache::new(
                AccessRegistry::new(self.store.clone(), Domain::Whitelist),
                self.cache_config.clone(),
            )
        })
    }

    /// The admission predicate: may this subject interact with the relay?
    pub fn accept_subject(&self, subject: &SubjectKey) -> bool {
        self.whitelist().allowed(subject)
    }

    /// Admission plus the size ceiling for one inbound message
    pub fn accept_message(&self, subject: &SubjectKey, size: usize) -> bool {
        size <= self.max_message_size && self.accept_subject(subject)
    }

    /// Route one raw admin command from the wire
    pub fn handle_admin_command(&self, raw: &str, notices: &dyn NoticeSink) {
        self.authority.handle_command(raw, self.whitelist(), notices);
    }

    /// Issuer-eligibility check, exposed for the wire layer
    pub fn is_admin(&self, subject: &SubjectKey) -> bool {
        self.authority.is_admin(subject)
    }

    /// Service name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Operator contact
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Public key identifying the service
    pub fn service_pubkey(&self) -> &str {
        &self.service_pubkey
    }
}
