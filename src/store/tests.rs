// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Arc;

use super::{FileEditRecord, FileStore, KvStore, MemoryStore, Storage};
use crate::auth::Credential;
use crate::error::{PadError, StorageError};
use crate::github::{RepositoryRef, User};

fn repo() -> RepositoryRef {
    RepositoryRef::new("octo", "game")
}

#[test]
fn test_memory_keys_by_prefix() {
    let store = MemoryStore::new();
    store.set("a:1", "x").unwrap();
    store.set("a:2", "y").unwrap();
    store.set("b:1", "z").unwrap();

    assert_eq!(store.keys("a:").unwrap(), vec!["a:1", "a:2"]);
    assert!(store.keys("c:").unwrap().is_empty());

    store.delete("a:1").unwrap();
    store.delete("missing").unwrap();
    assert_eq!(store.keys("a:").unwrap(), vec!["a:2"]);
}

#[test]
fn test_memory_quota() {
    let store = MemoryStore::with_quota(10);
    store.set("k", "12345").unwrap();
    // overwriting counts the replaced value out
    store.set("k", "123456789").unwrap();

    let err = store.set("other", "12345").unwrap_err();
    assert!(matches!(
        err,
        PadError::Storage(ref e) if matches!(**e, StorageError::QuotaExceeded { .. })
    ));
    assert_eq!(store.get("k").unwrap().as_deref(), Some("123456789"));
    assert_eq!(store.get("other").unwrap(), None);
}

#[test]
fn test_edit_record_keys_are_namespaced() {
    let backend = Arc::new(MemoryStore::new());
    let storage = Storage::new(backend.clone(), "gitpad");

    storage
        .save_edit_record(&repo(), &FileEditRecord::new("Scripts/Player.cs", "x"))
        .unwrap();

    assert_eq!(
        backend.keys("").unwrap(),
        vec!["gitpad:edit:octo/game:Scripts/Player.cs"]
    );
}

#[test]
fn test_edit_records_scoped_by_repository() {
    let storage = Storage::in_memory("gitpad");
    let other = RepositoryRef::new("octo", "gamex");

    storage
        .save_edit_record(&repo(), &FileEditRecord::new("b.txt", "b"))
        .unwrap();
    storage
        .save_edit_record(&repo(), &FileEditRecord::new("a.txt", "a"))
        .unwrap();
    storage
        .save_edit_record(&other, &FileEditRecord::new("c.txt", "c"))
        .unwrap();

    let paths: Vec<_> = storage
        .edit_records(&repo())
        .unwrap()
        .into_iter()
        .map(|r| r.path)
        .collect();
    assert_eq!(paths, vec!["a.txt", "b.txt"]);
    assert_eq!(storage.edit_record_count(&repo()).unwrap(), 2);
    assert_eq!(storage.edit_record_count(&other).unwrap(), 1);

    storage.delete_edit_record(&repo(), "a.txt").unwrap();
    assert!(storage.edit_record(&repo(), "a.txt").unwrap().is_none());
    assert_eq!(
        storage.edit_record(&repo(), "b.txt").unwrap().unwrap().content,
        "b"
    );
}

#[test]
fn test_namespaces_do_not_collide() {
    let backend: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let work = Storage::new(backend.clone(), "work");
    let home = Storage::new(backend, "home");

    work.set_last_branch(&repo(), "develop").unwrap();
    assert_eq!(work.last_branch(&repo()).unwrap().as_deref(), Some("develop"));
    assert_eq!(home.last_branch(&repo()).unwrap(), None);
}

#[test]
fn test_credential_and_profile_cleared_together() {
    let storage = Storage::in_memory("gitpad");
    storage.set_credential(&Credential::new("gho_secret")).unwrap();
    storage
        .set_user_profile(&User {
            login: "octocat".to_string(),
            name: None,
            avatar_url: None,
        })
        .unwrap();
    storage
        .save_edit_record(&repo(), &FileEditRecord::new("a.txt", "a"))
        .unwrap();

    assert_eq!(storage.credential().unwrap().unwrap().expose(), "gho_secret");
    storage.clear_credential().unwrap();

    assert!(storage.credential().unwrap().is_none());
    assert!(storage.user_profile().unwrap().is_none());
    assert_eq!(storage.edit_record_count(&repo()).unwrap(), 1);
}

#[test]
fn test_pins_keep_order_and_reject_duplicates() {
    let storage = Storage::in_memory("gitpad");
    assert!(storage.pin(&repo(), "README.md").unwrap());
    assert!(storage.pin(&repo(), "Scripts/Player.cs").unwrap());
    assert!(!storage.pin(&repo(), "README.md").unwrap());

    assert_eq!(
        storage.pinned_files(&repo()).unwrap(),
        vec!["README.md", "Scripts/Player.cs"]
    );

    assert!(storage.unpin(&repo(), "README.md").unwrap());
    assert!(!storage.unpin(&repo(), "README.md").unwrap());
    assert!(storage.unpin(&repo(), "Scripts/Player.cs").unwrap());
    assert!(storage.pinned_files(&repo()).unwrap().is_empty());
}

#[test]
fn test_active_repository_round_trip() {
    let storage = Storage::in_memory("gitpad");
    assert!(storage.active_repository().unwrap().is_none());
    storage.set_active_repository(&repo()).unwrap();
    assert_eq!(storage.active_repository().unwrap(), Some(repo()));
}

#[test]
fn test_corrupt_value_is_storage_error() {
    let backend = Arc::new(MemoryStore::new());
    backend.set("gitpad:active-repo", "{not json").unwrap();
    let storage = Storage::new(backend, "gitpad");

    let err = storage.active_repository().unwrap_err();
    assert!(matches!(
        err,
        PadError::Storage(ref e) if matches!(**e, StorageError::Serialize { .. })
    ));
}

#[test]
fn test_file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    let store = FileStore::open(&path).unwrap();
    store.set("gitpad:user", "{}").unwrap();
    store.set("gitpad:token", "t").unwrap();
    store.delete("gitpad:user").unwrap();
    drop(store);

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("gitpad:token").unwrap().as_deref(), Some("t"));
    assert_eq!(reopened.get("gitpad:user").unwrap(), None);
    assert_eq!(reopened.path(), path.as_path());
}

#[test]
fn test_file_store_empty_file_is_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "  \n").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert!(store.keys("").unwrap().is_empty());
}

#[test]
fn test_file_store_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "[1, 2").unwrap();

    assert!(FileStore::open(&path).is_err());
}

#[test]
fn test_file_store_quota() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap().with_quota(Some(8));

    store.set("k", "v").unwrap();
    assert!(store.set("k2", "too long value").is_err());

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("k2").unwrap(), None);
}
