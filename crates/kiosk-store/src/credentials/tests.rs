//! Unit tests for the credential store.

use rstest::{fixture, rstest};

use super::*;
use crate::document::InMemoryDocument;
use crate::password::hash_password;

fn load(document: InMemoryDocument) -> CredentialStore<InMemoryDocument> {
    CredentialStore::load(document, PersistPolicy::default()).expect("load store")
}

fn stored_json(store: &CredentialStore<InMemoryDocument>) -> serde_json::Value {
    let contents = store.document().contents().expect("document written");
    serde_json::from_str(&contents).expect("valid json")
}

fn stored_field(store: &CredentialStore<InMemoryDocument>, pointer: &str) -> Option<String> {
    stored_json(store)
        .pointer(pointer)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

#[fixture]
fn store() -> CredentialStore<InMemoryDocument> {
    load(InMemoryDocument::new())
}

#[rstest]
fn fresh_store_seeds_admin_and_persists(store: CredentialStore<InMemoryDocument>) {
    assert!(store.is_admin("admin"));
    assert_eq!(store.len(), 1);
    assert!(!store.is_empty());
    assert_eq!(store.document().write_count(), 1);
    assert_eq!(stored_field(&store, "/admin/Role").as_deref(), Some("Admin"));
}

#[rstest]
fn bootstrap_password_logs_in(mut store: CredentialStore<InMemoryDocument>) {
    assert_eq!(store.validate("admin", "admin123"), Ok(true));
    assert_eq!(store.validate("Admin", "admin123"), Ok(true));
    assert_eq!(store.validate("admin", "wrong"), Ok(false));
}

#[test]
fn existing_admin_is_not_rewritten() {
    let hash = hash_password("changed");
    let document = InMemoryDocument::with_contents(format!(
        r#"{{"admin":{{"PasswordHash":"{hash}","Role":"Admin"}}}}"#
    ));

    let mut store = load(document);

    assert_eq!(store.document().write_count(), 0);
    assert_eq!(store.validate("admin", "changed"), Ok(true));
    assert_eq!(store.validate("admin", "admin123"), Ok(false));
}

#[test]
fn demoted_admin_on_disk_is_restored_at_load() {
    let hash = hash_password("admin123");
    let document = InMemoryDocument::with_contents(format!(
        r#"{{"ADMIN":{{"PasswordHash":"{hash}","Role":"User"}}}}"#
    ));

    let store = load(document);

    assert!(store.is_admin("admin"));
    assert_eq!(store.document().write_count(), 1);
    assert_eq!(stored_field(&store, "/ADMIN/Role").as_deref(), Some("Admin"));
    assert!(stored_json(&store).get("admin").is_none());
}

#[rstest]
fn register_rejects_case_insensitive_duplicates(mut store: CredentialStore<InMemoryDocument>) {
    assert_eq!(store.register("Alice", "first"), Ok(true));
    assert_eq!(store.register("ALICE", "second"), Ok(false));

    assert_eq!(store.validate("alice", "first"), Ok(true));
    assert_eq!(store.validate("alice", "second"), Ok(false));
    assert_eq!(
        store.list_users().into_iter().collect::<Vec<_>>(),
        vec![("Alice".to_owned(), Role::User), ("admin".to_owned(), Role::Admin)]
    );
}

#[rstest]
fn register_cannot_shadow_admin(mut store: CredentialStore<InMemoryDocument>) {
    assert_eq!(store.register("AdMiN", "x"), Ok(false));
    assert_eq!(store.validate("admin", "admin123"), Ok(true));
}

#[rstest]
fn unknown_users_are_neither_valid_nor_admin(mut store: CredentialStore<InMemoryDocument>) {
    assert_eq!(store.validate("ghost", "admin123"), Ok(false));
    assert!(!store.is_admin("ghost"));
    assert!(!store.contains("ghost"));
}

#[rstest]
#[case("admin")]
#[case("ADMIN")]
#[case("Admin")]
fn admin_cannot_be_deleted_or_demoted(
    mut store: CredentialStore<InMemoryDocument>,
    #[case] username: &str,
) {
    assert_eq!(store.delete_user(username), Ok(false));
    assert_eq!(store.update_role(username, Role::User), Ok(false));
    assert_eq!(store.toggle_role(username), Ok(None));

    assert!(store.is_admin("admin"));
    assert_eq!(store.document().write_count(), 1);
}

#[rstest]
fn delete_removes_user(mut store: CredentialStore<InMemoryDocument>) {
    store.register("bob", "pw").expect("register");

    assert_eq!(store.delete_user("BOB"), Ok(true));
    assert_eq!(store.delete_user("bob"), Ok(false));

    assert!(!store.contains("bob"));
    assert!(stored_json(&store).get("bob").is_none());
}

#[rstest]
fn update_and_toggle_role(mut store: CredentialStore<InMemoryDocument>) {
    store.register("carol", "pw").expect("register");

    assert_eq!(store.update_role("carol", Role::Admin), Ok(true));
    assert!(store.is_admin("Carol"));
    assert_eq!(store.toggle_role("carol"), Ok(Some(Role::User)));
    assert!(!store.is_admin("carol"));
    assert_eq!(store.update_role("nobody", Role::Admin), Ok(false));

    assert_eq!(stored_field(&store, "/carol/Role").as_deref(), Some("User"));
}

#[test]
fn legacy_document_is_migrated_and_rewritten() {
    let alice = hash_password("wonderland");
    let document = InMemoryDocument::with_contents(format!(r#"{{"alice":"{alice}"}}"#));

    let mut store = load(document);

    assert!(!store.is_admin("alice"));
    assert_eq!(store.validate("alice", "wonderland"), Ok(true));
    assert_eq!(stored_field(&store, "/alice/Role").as_deref(), Some("User"));
    assert_eq!(
        stored_field(&store, "/alice/PasswordHash").as_deref(),
        Some(alice.as_str())
    );
    assert_eq!(stored_field(&store, "/admin/Role").as_deref(), Some("Admin"));
}

#[rstest]
#[case::garbage("{{{ not json")]
#[case::array("[1, 2, 3]")]
fn undecodable_document_starts_empty(#[case] contents: &str) {
    let store = load(InMemoryDocument::with_contents(contents));

    assert_eq!(store.len(), 1);
    assert!(store.is_admin("admin"));
}

#[test]
fn unknown_stored_role_reads_as_user() {
    let hash = hash_password("pw");
    let document = InMemoryDocument::with_contents(format!(
        r#"{{"dave":{{"PasswordHash":"{hash}","Role":"Superuser"}}}}"#
    ));

    let store = load(document);

    assert!(store.contains("dave"));
    assert!(!store.is_admin("dave"));
}

#[test]
fn malformed_stored_hash_fails_login_quietly() {
    let document =
        InMemoryDocument::with_contents(r#"{"eve":{"PasswordHash":"%%%","Role":"User"}}"#);

    let mut store = load(document);

    assert_eq!(store.validate("eve", "anything"), Ok(false));
}

#[rstest]
fn write_failures_are_logged_and_ignored_by_default(
    mut store: CredentialStore<InMemoryDocument>,
) {
    store.document().set_fail_writes(true);

    assert_eq!(store.register("frank", "pw"), Ok(true));

    assert!(store.contains("frank"));
    assert!(stored_json(&store).get("frank").is_none());
}

#[test]
fn propagate_policy_returns_write_failures() {
    let mut store =
        CredentialStore::load(InMemoryDocument::new(), PersistPolicy::Propagate).expect("load");
    store.document().set_fail_writes(true);

    let result = store.register("grace", "pw");

    assert!(matches!(result, Err(DocumentError::WriteError { .. })));
    assert!(store.contains("grace"));
    assert_eq!(store.policy(), PersistPolicy::Propagate);
}

#[test]
fn propagate_policy_fails_load_when_bootstrap_cannot_be_saved() {
    let document = InMemoryDocument::new();
    document.set_fail_writes(true);

    let result = CredentialStore::load(document, PersistPolicy::Propagate);

    assert!(matches!(result, Err(DocumentError::WriteError { .. })));
}
