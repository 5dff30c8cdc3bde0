//! Relay Warden
//!
//! Whitelist admission control for a shared messaging relay. The relay asks
//! one question per inbound actor, "may this subject interact?", and a
//! small set of administrators changes the answer set at runtime through
//! signed commands.
//!
//! ## Components
//!
//! - [`store`] - Two-operation persistent-store contract and the SQLite
//!   implementation
//! - [`registry`] - Authoritative capability grants per domain (whitelist,
//!   admin), soft-deleted and revivable
//! - [`whitelist`] - Bounded LRU cache of admission decisions over the
//!   registry; fail-closed reads, positive-only caching
//! - [`command`] - Signed admin command envelope with Ed25519 verification
//! - [`admin`] - Issuer eligibility and command application with rejection
//!   notices
//! - [`relay`] - The facade a relay process consumes
//!
//! ## Example
//!
//! ```rust
//! use relay_warden::{Relay, RelayConfig, SqliteStore, SubjectKey};
//! use std::sync::Arc;
//!
//! let store = Arc::new(SqliteStore::open_in_memory().unwrap());
//! let relay = Relay::new(RelayConfig {
//!     name: "my-relay".into(),
//!     store: Some(store),
//!     ..RelayConfig::default()
//! })
//! .unwrap();
//! relay.init();
//!
//! let subject = SubjectKey::from_hex(&"ab".repeat(32)).unwrap();
//! assert!(!relay.accept_subject(&subject));
//! ```

pub mod admin;
pub mod command;
pub mod error;
pub mod registry;
pub mod relay;
pub mod store;
pub mod subject;
pub mod whitelist;

pub use admin::{AdminAuthority, NoticeSink};
pub use command::AdminCommand;
pub use error::{Result, WardenError};
pub use registry::{AccessRegistry, Domain};
pub use relay::{Relay, RelayConfig, DEFAULT_MAX_MESSAGE_SIZE};
pub use store::{SqliteStore, Store, StoreError};
pub use subject::SubjectKey;
pub use whitelist::{
    WhitelistCache, WhitelistCacheConfig, DEFAULT_CACHE_CAPACITY, MAX_CACHE_CAPACITY,
    MIN_CACHE_CAPACITY,
};
