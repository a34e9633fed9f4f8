use notekeep_core::{
    AccessGrant, AccountId, BootstrapError, CollaborationAccess, CollaborationDelegate,
    ConfigError, CoreConfig, CoreContext, CoreError, DatabaseConfig, DelegateFailure, EntityRef,
    ErrorKind, NoteId, NotePayload, PasswordHashConfig, SharedDelegate,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

struct ScriptedDelegate {
    answer: Result<CollaborationAccess, DelegateFailure>,
    calls: AtomicUsize,
}

impl CollaborationDelegate for ScriptedDelegate {
    fn is_collaborator(
        &self,
        _note_id: &NoteId,
        _actor_id: &AccountId,
    ) -> Result<CollaborationAccess, DelegateFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

#[test]
fn owner_stranger_and_missing_note_scenario() {
    let delegate = scripted(Ok(CollaborationAccess::Denied));
    let (_dir, core) = open_core_with(Arc::clone(&delegate) as SharedDelegate);

    let alice = core
        .credentials()
        .register("alice", "secret1", "Alice A")
        .unwrap();
    let note = core
        .notes()
        .create(&NotePayload::new("Plan", "Ship it", Vec::new()), &alice)
        .unwrap();

    assert_eq!(
        core.access().authorize(&note, &alice).unwrap(),
        AccessGrant::Owner
    );
    assert_eq!(delegate.calls.load(Ordering::SeqCst), 0);

    let other = AccountId::from("user-other");
    let err = core.access().authorize(&note, &other).unwrap_err();
    assert!(matches!(err, CoreError::Authorization(ref id) if *id == note));
    assert_eq!(delegate.calls.load(Ordering::SeqCst), 1);

    let missing = NoteId::from("note-missing");
    let err = core.access().authorize(&missing, &alice).unwrap_err();
    assert!(matches!(err, CoreError::NotFound(EntityRef::Note(ref id)) if *id == missing));
    assert_eq!(delegate.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn granted_delegate_answer_authorizes_non_owner() {
    let (_dir, core) = open_core_with(scripted(Ok(CollaborationAccess::Granted)));
    let alice = core
        .credentials()
        .register("alice", "secret1", "Alice A")
        .unwrap();
    let note = core
        .notes()
        .create(&NotePayload::new("Plan", "Ship it", Vec::new()), &alice)
        .unwrap();

    let grant = core
        .access()
        .authorize(&note, &AccountId::from("user-other"))
        .unwrap();
    assert_eq!(grant, AccessGrant::Collaborator);
}

#[test]
fn delegate_failure_is_not_reported_as_denial() {
    let (_dir, core) = open_core_with(scripted(Err(DelegateFailure::new("upstream timeout"))));
    let alice = core
        .credentials()
        .register("alice", "secret1", "Alice A")
        .unwrap();
    let note = core
        .notes()
        .create(&NotePayload::new("Plan", "Ship it", Vec::new()), &alice)
        .unwrap();

    let err = core
        .access()
        .authorize(&note, &AccountId::from("user-other"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CollaborationUnavailable);
    assert!(!err.to_string().contains("upstream timeout"));

    // The owner path never reaches the failing delegate.
    assert_eq!(
        core.access().authorize(&note, &alice).unwrap(),
        AccessGrant::Owner
    );
}

#[test]
fn collaboration_registry_drives_default_delegate() {
    let (_dir, core) = open_core();
    let alice = register(&core, "alice");
    let bob = register(&core, "bob");
    let note = core
        .notes()
        .create(&NotePayload::new("Plan", "Ship it", Vec::new()), &alice)
        .unwrap();

    let err = core.access().authorize(&note, &bob).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    core.access().authorize_owner(&note, &alice).unwrap();
    let grant_id = core.collaborations().add_collaborator(&note, &bob).unwrap();
    assert!(grant_id.as_str().starts_with("collab-"));
    assert_eq!(
        core.access().authorize(&note, &bob).unwrap(),
        AccessGrant::Collaborator
    );

    // Collaborators may edit but not manage the note.
    let err = core.access().authorize_owner(&note, &bob).unwrap_err();
    assert!(matches!(err, CoreError::Authorization(_)));

    let err = core
        .collaborations()
        .add_collaborator(&note, &bob)
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict("collaboration")));

    core.collaborations()
        .remove_collaborator(&note, &bob)
        .unwrap();
    let err = core.access().authorize(&note, &bob).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = core
        .collaborations()
        .remove_collaborator(&note, &bob)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::NotFound(EntityRef::Collaboration { .. })
    ));
}

#[test]
fn broken_collaboration_store_is_unavailable_not_denied() {
    let (_dir, core) = open_core();
    let alice = register(&core, "alice");
    let bob = register(&core, "bob");
    let note = core
        .notes()
        .create(&NotePayload::new("Plan", "Ship it", Vec::new()), &alice)
        .unwrap();
    core.collaborations().add_collaborator(&note, &bob).unwrap();

    core.pool()
        .get()
        .unwrap()
        .execute_batch("DROP TABLE collaborations;")
        .unwrap();

    let err = core.access().authorize(&note, &bob).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CollaborationUnavailable);
    assert!(matches!(err, CoreError::CollaborationUnavailable(ref id) if *id == note));
    assert_eq!(
        core.access().authorize(&note, &alice).unwrap(),
        AccessGrant::Owner
    );
}

#[test]
fn adding_collaborator_reports_which_reference_is_missing() {
    let (_dir, core) = open_core();
    let alice = register(&core, "alice");
    let note = core
        .notes()
        .create(&NotePayload::new("Plan", "Ship it", Vec::new()), &alice)
        .unwrap();

    let ghost = AccountId::from("user-ghost");
    let err = core
        .collaborations()
        .add_collaborator(&note, &ghost)
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(EntityRef::Account(ref id)) if *id == ghost));

    let missing = NoteId::from("note-missing");
    let err = core
        .collaborations()
        .add_collaborator(&missing, &alice)
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(EntityRef::Note(ref id)) if *id == missing));
}

#[test]
fn invalid_config_is_rejected_before_opening_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.db");
    let mut config = core_config(&path);
    config.database.pool_max_size = 0;

    let err = match CoreContext::open(&config) {
        Ok(_) => panic!("zero-sized pool must be rejected"),
        Err(err) => err,
    };
    assert!(matches!(
        err,
        BootstrapError::Config(ConfigError::InvalidPoolSize)
    ));
    assert!(!path.exists());
}

#[test]
fn context_reopens_existing_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = core_config(&dir.path().join("notekeep.db"));

    let alice = {
        let core = CoreContext::open(&config).unwrap();
        core.credentials()
            .register("alice", "secret1", "Alice A")
            .unwrap()
    };

    let core = CoreContext::open(&config).unwrap();
    assert_eq!(
        core.credentials()
            .verify_credential("alice", "secret1")
            .unwrap(),
        alice
    );
}

fn scripted(answer: Result<CollaborationAccess, DelegateFailure>) -> Arc<ScriptedDelegate> {
    Arc::new(ScriptedDelegate {
        answer,
        calls: AtomicUsize::new(0),
    })
}

fn register(core: &CoreContext, username: &str) -> AccountId {
    core.credentials()
        .register(username, "secret1", "Test User")
        .unwrap()
}

fn open_core() -> (TempDir, CoreContext) {
    let dir = tempfile::tempdir().unwrap();
    let core = CoreContext::open(&core_config(&dir.path().join("notekeep.db"))).unwrap();
    (dir, core)
}

fn open_core_with(delegate: SharedDelegate) -> (TempDir, CoreContext) {
    let dir = tempfile::tempdir().unwrap();
    let core =
        CoreContext::open_with_delegate(&core_config(&dir.path().join("notekeep.db")), delegate)
            .unwrap();
    (dir, core)
}

fn core_config(path: &Path) -> CoreConfig {
    CoreConfig {
        database: DatabaseConfig {
            path: path.to_path_buf(),
            pool_max_size: 2,
            ..DatabaseConfig::default()
        },
        password_hash: PasswordHashConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
        ..CoreConfig::default()
    }
}
