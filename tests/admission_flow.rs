//! End-to-end admission flow: schema bootstrap, signed grant/revoke
//! commands, cache visibility, and rejection paths leaving state unchanged.

mod common;

use common::{keypair, numbered_subject, signed_command_json};
use parking_lot::Mutex;
use relay_warden::{NoticeSink, Relay, RelayConfig, SqliteStore, Store, WhitelistCacheConfig};
use std::sync::Arc;

#[derive(Default)]
struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl NoticeSink for RecordingSink {
    fn notice(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

fn relay_over(store: Arc<SqliteStore>, admins: Vec<relay_warden::SubjectKey>) -> Relay {
    let relay = Relay::new(RelayConfig {
        name: "test-relay".into(),
        admins,
        store: Some(store),
        ..RelayConfig::default()
    })
    .unwrap();
    relay.init();
    relay
}

#[test]
fn test_grant_then_accept_then_revoke() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (signing, admin) = keypair();
    let relay = relay_over(store, vec![admin]);
    let sink = RecordingSink::default();

    let actor = numbered_subject(1);
    assert!(!relay.accept_subject(&actor));

    let grant = signed_command_json(&signing, vec![vec!["add".into(), actor.to_string()]]);
    relay.handle_admin_command(&grant, &sink);
    assert_eq!(sink.take(), vec!["admin update applied: 1 granted, 0 revoked"]);
    assert!(relay.accept_subject(&actor));

    let revoke = signed_command_json(&signing, vec![vec!["remove".into(), actor.to_string()]]);
    relay.handle_admin_command(&revoke, &sink);
    assert_eq!(sink.take(), vec!["admin update applied: 0 granted, 1 revoked"]);
    assert!(!relay.accept_subject(&actor));
}

#[test]
fn test_grants_survive_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warden.db");
    let (signing, admin) = keypair();
    let actor = numbered_subject(2);

    {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let relay = relay_over(store, vec![admin.clone()]);
        let sink = RecordingSink::default();
        let grant = signed_command_json(&signing, vec![vec!["add".into(), actor.to_string()]]);
        relay.handle_admin_command(&grant, &sink);
        assert!(relay.accept_subject(&actor));
    }

    // fresh process: empty cache, decision reloaded from the registry
    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let relay = relay_over(store, vec![admin]);
    assert!(relay.accept_subject(&actor));
}

#[test]
fn test_rejected_commands_leave_registry_unchanged() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (signing, admin) = keypair();
    let relay = relay_over(store.clone(), vec![admin]);
    let sink = RecordingSink::default();
    let actor = numbered_subject(3);

    // garbage payload
    relay.handle_admin_command("{nope", &sink);

    // valid shape, broken signature
    let mut tampered: serde_json::Value = serde_json::from_str(&signed_command_json(
        &signing,
        vec![vec!["add".into(), actor.to_string()]],
    ))
    .unwrap();
    tampered["created_at"] = serde_json::json!(99);
    relay.handle_admin_command(&tampered.to_string(), &sink);

    // well-signed but from a non-admin key
    let (outsider, _) = keypair();
    let unauthorized =
        signed_command_json(&outsider, vec![vec!["add".into(), actor.to_string()]]);
    relay.handle_admin_command(&unauthorized, &sink);

    let notices = sink.take();
    assert_eq!(notices.len(), 3);
    assert!(notices[0].contains("validation error"));
    assert!(notices[1].contains("authorization error"));
    assert!(notices[2].contains("not an administrator"));

    assert!(!relay.accept_subject(&actor));
    let rows = store
        .query_scalar("SELECT COUNT(*) FROM relay_whitelist", &[])
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn test_batch_is_not_atomic() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (signing, admin) = keypair();
    let relay = relay_over(store, vec![admin]);
    let sink = RecordingSink::default();

    // one malformed target among good ones: the command still applies the rest
    let good_a = numbered_subject(4);
    let good_b = numbered_subject(5);
    let grant = signed_command_json(
        &signing,
        vec![vec![
            "add".into(),
            good_a.to_string(),
            "not-a-subject-key".into(),
            good_b.to_string(),
        ]],
    );
    relay.handle_admin_command(&grant, &sink);

    assert_eq!(sink.take(), vec!["admin update applied: 2 granted, 0 revoked"]);
    assert!(relay.accept_subject(&good_a));
    assert!(relay.accept_subject(&good_b));
}

#[test]
fn test_cache_bound_respected_under_grants() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let relay = Relay::new(RelayConfig {
        cache: WhitelistCacheConfig { max_capacity: 16 },
        store: Some(store.clone()),
        ..RelayConfig::default()
    })
    .unwrap();
    relay.init();

    // grant far more subjects than the cache holds; all stay durably allowed
    let whitelist_registry =
        relay_warden::AccessRegistry::new(store, relay_warden::Domain::Whitelist);
    for i in 0..100 {
        whitelist_registry.authorize(&numbered_subject(i)).unwrap();
    }
    for i in 0..100 {
        assert!(relay.accept_subject(&numbered_subject(i)));
    }
}
