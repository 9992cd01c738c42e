//! Cross-context convergence tests.
//!
//! Contexts in one process share an in-memory or file origin; "processes"
//! are simulated by opening the same origin directory through independent
//! `FileStorage` handles, each with its own bus and watcher.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use session_store::{
    FileStorage, FileWatcher, Origin, SessionHook, SessionStore, SessionView, Storage, UserRecord,
    keys,
};
use tempfile::TempDir;

fn user(id: i64, username: &str, is_admin: bool) -> UserRecord {
    UserRecord {
        id,
        username: username.to_owned(),
        full_name: Some(format!("{username} tester")),
        is_admin,
        require_password_change: !is_admin,
        created_at: "2025-07-01T08:00:00Z".to_owned(),
        updated_at: "2025-07-01T08:00:00Z".to_owned(),
    }
}

struct FileOrigin {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl FileOrigin {
    fn process(&self) -> (Origin, Arc<FileStorage>) {
        let storage = Arc::new(FileStorage::open(&self.root).expect("open origin directory"));
        (Origin::new(storage.clone()), storage)
    }
}

#[fixture]
fn file_origin() -> FileOrigin {
    let temp = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().join("origin")).expect("utf-8 path");
    FileOrigin { _temp: temp, root }
}

async fn wait_until(view: &mut tokio::sync::watch::Receiver<SessionView>, authenticated: bool) {
    tokio::time::timeout(
        Duration::from_secs(2),
        view.wait_for(|current| current.is_authenticated() == authenticated),
    )
    .await
    .expect("context converged in time")
    .map(drop)
    .expect("hook still alive");
}

#[rstest]
fn login_logout_and_relogin_fully_replace_the_user() {
    let origin = Origin::in_memory();
    let hook = SessionHook::new(SessionStore::new(&origin));

    let alice = user(1, "alice", true);
    hook.login("token-alice", &alice);
    assert_eq!(hook.store().initialize().map(|s| s.user().clone()), Some(alice));

    hook.logout();
    assert_eq!(hook.store().initialize(), None);

    let bob = user(2, "bob", false);
    hook.login("token-bob", &bob);
    let session = hook.store().initialize().expect("bob signed in");
    assert_eq!(session.token(), "token-bob");
    assert_eq!(session.user(), &bob);

    let stored = origin
        .storage()
        .get(keys::USER_INFO_KEY)
        .expect("read user")
        .expect("user stored");
    assert!(!stored.contains("alice"));
}

#[rstest]
#[tokio::test]
async fn every_live_context_agrees_with_storage_after_racing_writes() {
    let origin = Origin::in_memory();
    let open = || Arc::new(SessionHook::new(SessionStore::new(&origin)));
    let hooks = [open(), open(), open(), open()];
    let listeners: Vec<_> = hooks.iter().map(SessionHook::listen).collect();

    let [zero, one, two, three] = &hooks;
    zero.login("token-0", &user(10, "zero", false));
    one.login("token-1", &user(11, "one", false));
    two.logout();
    three.login("token-3", &user(13, "three", true));

    let expected = SessionStore::new(&origin).initialize();
    for hook in &hooks {
        let mut view = hook.subscribe();
        tokio::time::timeout(
            Duration::from_secs(2),
            view.wait_for(|current| current.session == expected),
        )
        .await
        .expect("context converged in time")
        .map(drop)
        .expect("hook still alive");
    }

    for listener in listeners {
        listener.abort();
    }
}

#[rstest]
#[tokio::test]
async fn another_process_converges_through_the_file_watcher(file_origin: FileOrigin) {
    let (origin_a, _storage_a) = file_origin.process();
    let (origin_b, storage_b) = file_origin.process();

    let process_a = SessionHook::new(SessionStore::new(&origin_a));
    let process_b = Arc::new(SessionHook::new(SessionStore::new(&origin_b)));
    let watcher = FileWatcher::new(&origin_b, storage_b).spawn(Duration::from_millis(10));
    let listener = process_b.listen();
    let mut view_b = process_b.subscribe();

    process_a.login("token-a", &user(1, "alice", true));
    wait_until(&mut view_b, true).await;
    assert_eq!(process_b.session(), process_a.session());

    process_a.logout();
    wait_until(&mut view_b, false).await;

    watcher.abort();
    listener.abort();
}

#[rstest]
#[tokio::test]
async fn a_foreign_logout_matching_an_own_logout_still_reaches_the_watcher(
    file_origin: FileOrigin,
) {
    let (origin_a, storage_a) = file_origin.process();
    let (origin_b, _storage_b) = file_origin.process();

    let process_a = Arc::new(SessionHook::new(SessionStore::new(&origin_a)));
    let process_b = SessionHook::new(SessionStore::new(&origin_b));
    let watcher = FileWatcher::new(&origin_a, storage_a).spawn(Duration::from_millis(10));
    let listener = process_a.listen();
    let mut view_a = process_a.subscribe();

    process_a.login("token-a", &user(1, "alice", true));
    process_a.logout();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(process_a.session(), None);

    process_b.login("token-b", &user(2, "bob", false));
    wait_until(&mut view_a, true).await;
    assert_eq!(
        process_a.session().map(|session| session.token().to_owned()),
        Some("token-b".to_owned())
    );

    process_b.logout();
    wait_until(&mut view_a, false).await;
    assert_eq!(process_a.session(), None);
    assert_eq!(SessionStore::new(&origin_a).initialize(), None);

    watcher.abort();
    listener.abort();
}

#[rstest]
fn corrupt_documents_start_logged_out(file_origin: FileOrigin) {
    let (origin, storage) = file_origin.process();
    std::fs::write(storage.document_path(), "][").expect("write garbage");

    let hook = SessionHook::new(SessionStore::new(&origin));
    assert!(!hook.is_loading());
    assert_eq!(hook.session(), None);
}
