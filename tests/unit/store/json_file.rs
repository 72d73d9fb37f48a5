use super::*;

#[test]
fn missing_file_opens_empty_and_is_created_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("panels.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    assert!(store.snapshot().unwrap().is_empty());
    assert!(!path.exists());

    store.reserve_identity(PanelId(1), MarkerIdentity(31)).unwrap();
    assert!(path.exists());

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(
        reopened.identity_of(PanelId(1)).unwrap(),
        Some(MarkerIdentity(31))
    );
}

#[test]
fn failed_mutation_leaves_file_and_memory_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panels.json");
    let mut store = JsonFileStore::open(&path).unwrap();
    store.reserve_identity(PanelId(1), MarkerIdentity(4)).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    assert!(store.reserve_identity(PanelId(2), MarkerIdentity(4)).is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert_eq!(store.snapshot().unwrap().len(), 1);
}

#[test]
fn reassign_and_release_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panels.json");
    let mut store = JsonFileStore::open(&path).unwrap();
    store.reserve_identity(PanelId(1), MarkerIdentity(40)).unwrap();
    store.reserve_identity(PanelId(2), MarkerIdentity(7)).unwrap();
    store
        .reassign_identity(PanelId(1), MarkerIdentity(40), MarkerIdentity(0))
        .unwrap();
    assert_eq!(
        store.release_identity(PanelId(2)).unwrap(),
        Some(MarkerIdentity(7))
    );
    assert_eq!(store.release_identity(PanelId(2)).unwrap(), None);

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(
        reopened.snapshot().unwrap(),
        vec![StoredIdentity {
            panel: PanelId(1),
            identity: MarkerIdentity(0),
        }]
    );
}

#[test]
fn duplicate_identities_on_disk_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panels.json");
    std::fs::write(
        &path,
        r#"{"version":1,"panels":[{"panel":1,"identity":3},{"panel":2,"identity":3}]}"#,
    )
    .unwrap();
    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, MarkerError::Store(_)));
}

#[test]
fn unknown_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panels.json");
    std::fs::write(&path, r#"{"version":9,"panels":[]}"#).unwrap();
    assert!(JsonFileStore::open(&path).is_err());
}
