use notekeep_core::{
    AccountId, CoreConfig, CoreContext, CoreError, DatabaseConfig, EntityRef, ErrorKind,
    PasswordHashConfig, ValidationError,
};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn register_then_verify_returns_same_id() {
    let (_dir, core) = open_core();
    let store = core.credentials();

    let id = store.register("alice", "secret1", "Alice A").unwrap();
    assert!(id.as_str().starts_with("user-"));

    let verified = store.verify_credential("alice", "secret1").unwrap();
    assert_eq!(verified, id);

    let account = store.get_account(&id).unwrap();
    assert_eq!(account.username, "alice");
    assert_eq!(account.fullname, "Alice A");
}

#[test]
fn duplicate_username_conflicts_and_keeps_first_account() {
    let (_dir, core) = open_core();
    let store = core.credentials();

    let first = store.register("alice", "secret1", "Alice A").unwrap();
    let err = store
        .register("alice", "another-pass", "Alice B")
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict("username")));

    let account = store.get_account(&first).unwrap();
    assert_eq!(account.fullname, "Alice A");
    assert_eq!(store.verify_credential("alice", "secret1").unwrap(), first);
    assert_eq!(
        store
            .verify_credential("alice", "another-pass")
            .unwrap_err()
            .kind(),
        ErrorKind::Authentication
    );
}

#[test]
fn wrong_password_and_unknown_username_are_indistinguishable() {
    let (_dir, core) = open_core();
    let store = core.credentials();
    store.register("alice", "secret1", "Alice A").unwrap();

    let wrong_password = store.verify_credential("alice", "secret2").unwrap_err();
    let unknown_user = store.verify_credential("mallory", "secret1").unwrap_err();

    assert!(matches!(wrong_password, CoreError::Authentication));
    assert!(matches!(unknown_user, CoreError::Authentication));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[test]
fn username_match_is_exact_for_login() {
    let (_dir, core) = open_core();
    let store = core.credentials();
    store.register("alice", "secret1", "Alice A").unwrap();

    let err = store.verify_credential("Alice", "secret1").unwrap_err();
    assert!(matches!(err, CoreError::Authentication));
}

#[test]
fn invalid_registration_is_rejected_before_storage() {
    let (_dir, core) = open_core();
    let store = core.credentials();

    let too_long = "u".repeat(51);
    let cases = [
        ("", "secret1", "Alice"),
        (too_long.as_str(), "secret1", "Alice"),
        ("alice", "12345", "Alice"),
        ("alice", "secret1", "   "),
    ];
    for (username, password, fullname) in cases {
        let err = store.register(username, password, fullname).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    let err = store.register("bob", "12345", "Bob").unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::TooShort {
            field: "password",
            ..
        })
    ));

    let count: i64 = core
        .pool()
        .get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM accounts;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn stored_password_is_a_salted_hash() {
    let (_dir, core) = open_core();
    let store = core.credentials();
    let first = store.register("alice", "secret1", "Alice A").unwrap();
    let second = store.register("bob", "secret1", "Bob B").unwrap();

    let conn = core.pool().get().unwrap();
    let hash_of = |id: &AccountId| -> String {
        conn.query_row(
            "SELECT password_hash FROM accounts WHERE id = ?1;",
            [id.as_str()],
            |row| row.get(0),
        )
        .unwrap()
    };
    let first_hash = hash_of(&first);
    let second_hash = hash_of(&second);

    assert!(first_hash.starts_with("$argon2id$"));
    assert!(!first_hash.contains("secret1"));
    assert_ne!(first_hash, second_hash);
}

#[test]
fn get_account_reports_missing_account() {
    let (_dir, core) = open_core();
    let missing = AccountId::from("user-missing");

    let err = core.credentials().get_account(&missing).unwrap_err();
    assert!(matches!(err, CoreError::NotFound(EntityRef::Account(id)) if id == missing));
}

#[test]
fn username_search_is_case_sensitive_substring_match() {
    let (_dir, core) = open_core();
    let store = core.credentials();
    store.register("alice", "secret1", "Alice A").unwrap();
    store.register("malice", "secret1", "Mal Ice").unwrap();
    store.register("ALICE_UPPER", "secret1", "Loud Alice").unwrap();
    store.register("bob", "secret1", "Bob B").unwrap();

    let found = store.find_accounts_by_username_substring("lic").unwrap();
    let mut usernames: Vec<_> = found.iter().map(|a| a.username.as_str()).collect();
    usernames.sort_unstable();
    assert_eq!(usernames, vec!["alice", "malice"]);

    assert_eq!(store.find_accounts_by_username_substring("").unwrap().len(), 4);
    assert!(store
        .find_accounts_by_username_substring("%")
        .unwrap()
        .is_empty());
}

#[test]
fn concurrent_registrations_of_one_username_admit_exactly_one() {
    let (_dir, core) = open_core();
    let core = Arc::new(core);

    let handles: Vec<_> = (0..6)
        .map(|idx| {
            let core = Arc::clone(&core);
            thread::spawn(move || {
                core.credentials()
                    .register("contested", "secret1", &format!("Racer {idx}"))
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    let successes = results.iter().filter(|result| result.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|result| matches!(result, Err(CoreError::Conflict("username"))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 5);
}

fn open_core() -> (TempDir, CoreContext) {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        database: DatabaseConfig {
            path: dir.path().join("notekeep.db"),
            pool_max_size: 4,
            ..DatabaseConfig::default()
        },
        password_hash: PasswordHashConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
        ..CoreConfig::default()
    };
    let core = CoreContext::open(&config).unwrap();
    (dir, core)
}
